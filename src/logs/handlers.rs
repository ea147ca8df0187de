use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use tracing::{info, instrument, warn};

use super::{
    dto::{CreateLogRequest, LogQuery},
    repo::LogRepo,
    repo_types::{LogEntry, LogFilter, NewLogEntry},
    services::validate_message,
};
use crate::{
    auth::extractors::AuthUser,
    error::ApiError,
    extract::{ApiJson, ApiQuery},
    state::AppState,
};

const MAX_PAGE: i64 = 500;

pub fn log_routes() -> Router<AppState> {
    Router::new().route("/logs", get(list_logs).post(create_log))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn list_logs(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiQuery(q): ApiQuery<LogQuery>,
) -> Result<Json<Vec<LogEntry>>, ApiError> {
    if q.all && !user.is_admin() {
        warn!("non-admin asked for all logs");
        return Err(ApiError::forbidden("Admin role required"));
    }
    if q.limit < 1 || q.offset < 0 {
        return Err(ApiError::validation("limit must be positive and offset non-negative"));
    }

    let filter = LogFilter {
        user_id: (!q.all).then_some(user.id),
        level: q.level,
        limit: q.limit.min(MAX_PAGE),
        offset: q.offset,
    };
    let entries = state.store.list_logs(&filter).await?;
    Ok(Json(entries))
}

#[instrument(skip(state, user, body), fields(user_id = %user.id))]
pub async fn create_log(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiJson(body): ApiJson<CreateLogRequest>,
) -> Result<(StatusCode, Json<LogEntry>), ApiError> {
    let entry = NewLogEntry {
        level: body.level,
        message: validate_message(&body.message)?,
        context: body.context,
    };
    let created = state.store.append_log(user.id, entry).await?;
    info!(log_id = %created.id, level = created.level.as_str(), "log appended");
    Ok((StatusCode::CREATED, Json(created)))
}
