use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

use super::repo::LogRepo;
use super::repo_types::{LogLevel, NewLogEntry};
use crate::{error::ApiError, state::AppState};

pub const MAX_MESSAGE_LEN: usize = 1000;

/// Records an audit entry for a completed mutation. A failed write is
/// logged and swallowed; the mutation it describes has already happened.
pub async fn audit(state: &AppState, user_id: Uuid, action: &str, context: Value) {
    let entry = NewLogEntry {
        level: LogLevel::Info,
        message: action.to_string(),
        context: Some(context),
    };
    if let Err(e) = state.store.append_log(user_id, entry).await {
        warn!(error = %e, %user_id, action, "audit log write failed");
    }
}

pub fn validate_message(raw: &str) -> Result<String, ApiError> {
    let message = raw.trim();
    if message.is_empty() {
        return Err(ApiError::validation("Log message is required"));
    }
    if message.chars().count() > MAX_MESSAGE_LEN {
        return Err(ApiError::validation(format!(
            "Log message must be at most {MAX_MESSAGE_LEN} characters"
        )));
    }
    Ok(message.to_string())
}
