use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::Date;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    #[serde(default, with = "crate::dates::iso::option")]
    pub from: Option<Date>,
    #[serde(default, with = "crate::dates::iso::option")]
    pub to: Option<Date>,
}

#[derive(Debug, Deserialize)]
pub struct MonthlyQuery {
    #[serde(default = "default_months")]
    pub months: u32,
}

fn default_months() -> u32 {
    6
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    pub category_id: Uuid,
    pub name: String,
    pub color: Option<String>,
    pub total: f64,
    /// Percentage of total expense, 0-100.
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    #[serde(with = "crate::dates::iso")]
    pub from: Date,
    #[serde(with = "crate::dates::iso")]
    pub to: Date,
    pub total_income: f64,
    pub total_expense: f64,
    pub balance: f64,
    pub by_category: BTreeMap<String, f64>,
    pub categories: Vec<CategoryTotal>,
    pub goal: f64,
    pub remaining: f64,
    pub goal_exceeded: bool,
    pub transaction_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthTotals {
    /// `YYYY-MM`
    pub month: String,
    pub income: f64,
    pub expense: f64,
    pub balance: f64,
}
