use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => anyhow::bail!("unknown log level {other:?}"),
        }
    }
}

#[derive(Debug, FromRow)]
pub struct LogRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub level: String,
    pub message: String,
    pub context: Option<serde_json::Value>,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub level: LogLevel,
    pub message: String,
    pub context: Option<serde_json::Value>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl TryFrom<LogRow> for LogEntry {
    type Error = anyhow::Error;

    fn try_from(r: LogRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: r.id,
            user_id: r.user_id,
            level: r.level.parse()?,
            message: r.message,
            context: r.context,
            created_at: r.created_at,
        })
    }
}

#[derive(Debug, Clone)]
pub struct NewLogEntry {
    pub level: LogLevel,
    pub message: String,
    pub context: Option<serde_json::Value>,
}

/// `user_id: None` means every user's entries.
#[derive(Debug, Clone)]
pub struct LogFilter {
    pub user_id: Option<Uuid>,
    pub level: Option<LogLevel>,
    pub limit: i64,
    pub offset: i64,
}
