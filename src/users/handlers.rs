use axum::{extract::State, routing::get, Json, Router};
use serde_json::json;
use tracing::{info, instrument};

use super::{
    dto::{UpdateProfileRequest, UserProfile},
    repo::UserRepo,
    repo_types::ProfileChanges,
};
use crate::{
    auth::extractors::AuthUser, error::ApiError, extract::ApiJson, logs::services::audit,
    money, state::AppState,
};

pub const MAX_NAME_LEN: usize = 100;

pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/user/profile", get(get_profile).put(update_profile))
}

#[instrument(skip(user), fields(user_id = %user.id))]
pub async fn get_profile(AuthUser(user): AuthUser) -> Json<UserProfile> {
    Json(user.into())
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiJson(body): ApiJson<UpdateProfileRequest>,
) -> Result<Json<UserProfile>, ApiError> {
    let changes = validate_changes(body)?;
    let updated = state
        .store
        .update_profile(user.id, changes.clone())
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    info!(monthly_goal = updated.monthly_goal, "profile updated");
    audit(
        &state,
        user.id,
        "profile.updated",
        json!({ "name": changes.name, "monthlyGoal": changes.monthly_goal }),
    )
    .await;
    Ok(Json(updated.into()))
}

pub fn validate_display_name(raw: &str) -> Result<String, ApiError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ApiError::validation("Name cannot be empty"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(ApiError::validation(format!(
            "Name must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(name.to_string())
}

fn validate_changes(body: UpdateProfileRequest) -> Result<ProfileChanges, ApiError> {
    let name = body.name.as_deref().map(validate_display_name).transpose()?;
    let monthly_goal = body
        .monthly_goal
        .map(|goal| money::validate(goal, "Monthly goal", true))
        .transpose()?;
    Ok(ProfileChanges { name, monthly_goal })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_negative_goal_and_blank_name() {
        let bad_goal = UpdateProfileRequest {
            name: None,
            monthly_goal: Some(-1.0),
        };
        assert!(validate_changes(bad_goal).is_err());

        let blank = UpdateProfileRequest {
            name: Some("  ".into()),
            monthly_goal: None,
        };
        assert!(validate_changes(blank).is_err());
    }

    #[test]
    fn goal_shares_the_amount_bounds() {
        let huge = UpdateProfileRequest {
            name: None,
            monthly_goal: Some(1e13),
        };
        assert!(validate_changes(huge).is_err());

        let sub_cent = UpdateProfileRequest {
            name: None,
            monthly_goal: Some(10.001),
        };
        assert!(validate_changes(sub_cent).is_err());

        let cleared = validate_changes(UpdateProfileRequest {
            name: None,
            monthly_goal: Some(0.0),
        })
        .unwrap();
        assert_eq!(cleared.monthly_goal, Some(0.0));
    }

    #[test]
    fn trims_name_and_keeps_goal() {
        let ok = validate_changes(UpdateProfileRequest {
            name: Some("  Ana ".into()),
            monthly_goal: Some(1500.0),
        })
        .unwrap();
        assert_eq!(ok.name.as_deref(), Some("Ana"));
        assert_eq!(ok.monthly_goal, Some(1500.0));
    }

    #[test]
    fn role_is_not_an_accepted_profile_field() {
        let parsed = serde_json::from_str::<UpdateProfileRequest>(r#"{"role":"admin"}"#);
        assert!(parsed.is_err());
    }
}
