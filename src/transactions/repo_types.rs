use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            other => anyhow::bail!("unknown transaction type {other:?}"),
        }
    }
}

#[derive(Debug, FromRow)]
pub struct TransactionRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category_id: Uuid,
    pub amount: f64,
    pub kind: String,
    pub description: String,
    pub date: Date,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category_id: Uuid,
    pub amount: f64,
    pub kind: TransactionKind,
    pub description: String,
    pub date: Date,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl TryFrom<TransactionRow> for Transaction {
    type Error = anyhow::Error;

    fn try_from(r: TransactionRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: r.id,
            user_id: r.user_id,
            category_id: r.category_id,
            amount: r.amount,
            kind: r.kind.parse()?,
            description: r.description,
            date: r.date,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

/// A validated transaction ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub category_id: Uuid,
    pub amount: f64,
    pub kind: TransactionKind,
    pub description: String,
    pub date: Date,
}

/// Query filter for listing a user's transactions. Date bounds are inclusive.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub from: Option<Date>,
    pub to: Option<Date>,
    pub category_id: Option<Uuid>,
    pub kind: Option<TransactionKind>,
    pub limit: Option<i64>,
    pub offset: i64,
}

impl TransactionFilter {
    pub fn range(from: Date, to: Date) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
            ..Self::default()
        }
    }

    pub fn matches(&self, t: &Transaction) -> bool {
        self.from.map_or(true, |from| t.date >= from)
            && self.to.map_or(true, |to| t.date <= to)
            && self.category_id.map_or(true, |c| t.category_id == c)
            && self.kind.map_or(true, |k| t.kind == k)
    }
}
