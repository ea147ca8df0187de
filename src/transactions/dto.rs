use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use super::repo_types::{Transaction, TransactionKind};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(alias = "category")]
    pub category_id: Uuid,
    #[serde(default)]
    pub description: Option<String>,
    /// Defaults to today when omitted.
    #[serde(default, with = "crate::dates::iso::option")]
    pub date: Option<Date>,
}

/// Partial update; omitted fields keep their current value.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTransactionRequest {
    pub amount: Option<f64>,
    #[serde(rename = "type")]
    pub kind: Option<TransactionKind>,
    #[serde(alias = "category")]
    pub category_id: Option<Uuid>,
    pub description: Option<String>,
    #[serde(default, with = "crate::dates::iso::option")]
    pub date: Option<Date>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionQuery {
    #[serde(default, with = "crate::dates::iso::option")]
    pub from: Option<Date>,
    #[serde(default, with = "crate::dates::iso::option")]
    pub to: Option<Date>,
    pub category_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub kind: Option<TransactionKind>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    100
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    pub id: Uuid,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub category_id: Uuid,
    pub category_name: Option<String>,
    pub description: String,
    #[serde(with = "crate::dates::iso")]
    pub date: Date,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl TransactionResponse {
    pub fn new(t: Transaction, category_name: Option<String>) -> Self {
        Self {
            id: t.id,
            amount: t.amount,
            kind: t.kind,
            category_id: t.category_id,
            category_name,
            description: t.description,
            date: t.date,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeletedTransactionResponse {
    pub id: Uuid,
}
