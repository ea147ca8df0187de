use axum::{extract::State, routing::get, Json, Router};
use tracing::{debug, instrument};

use super::{
    dto::{DashboardQuery, DashboardSummary, MonthTotals, MonthlyQuery},
    services::{monthly_totals, summarize},
};
use crate::{
    auth::extractors::AuthUser,
    categories::repo::CategoryRepo,
    dates,
    error::ApiError,
    extract::ApiQuery,
    state::AppState,
    transactions::{repo::TransactionRepo, repo_types::TransactionFilter},
};

const MAX_MONTHS: u32 = 24;

pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(get_summary))
        .route("/dashboard/monthly", get(get_monthly))
}

/// Summary for `from..=to`. A missing bound defaults to the calendar month
/// of the other bound, or of today when neither is given.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn get_summary(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiQuery(q): ApiQuery<DashboardQuery>,
) -> Result<Json<DashboardSummary>, ApiError> {
    let (month_start, month_end) = dates::month_bounds(q.from.or(q.to).unwrap_or_else(dates::today));
    let from = q.from.unwrap_or(month_start);
    let to = q.to.unwrap_or(month_end);
    if from > to {
        return Err(ApiError::validation("`from` must not be after `to`"));
    }

    let transactions = state
        .store
        .list_transactions(user.id, &TransactionFilter::range(from, to))
        .await?;
    let categories = state.store.list_categories(user.id).await?;

    let summary = summarize(&transactions, &categories, user.monthly_goal, from, to);
    debug!(
        transactions = summary.transaction_count,
        total_expense = summary.total_expense,
        "dashboard summary built"
    );
    Ok(Json(summary))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn get_monthly(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiQuery(q): ApiQuery<MonthlyQuery>,
) -> Result<Json<Vec<MonthTotals>>, ApiError> {
    if q.months == 0 || q.months > MAX_MONTHS {
        return Err(ApiError::validation(format!(
            "months must be between 1 and {MAX_MONTHS}"
        )));
    }

    let today = dates::today();
    let first = dates::months_back(today, q.months - 1);
    let (_, last) = dates::month_bounds(today);
    let transactions = state
        .store
        .list_transactions(user.id, &TransactionFilter::range(first, last))
        .await?;

    Ok(Json(monthly_totals(&transactions, first, q.months)))
}
