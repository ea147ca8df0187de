use serde::Deserialize;

use super::repo_types::LogLevel;

#[derive(Debug, Deserialize)]
pub struct CreateLogRequest {
    #[serde(default)]
    pub level: LogLevel,
    pub message: String,
    #[serde(default)]
    pub context: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct LogQuery {
    pub level: Option<LogLevel>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
    /// Every user's entries; admins only.
    #[serde(default)]
    pub all: bool,
}

fn default_limit() -> i64 {
    50
}
