use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde_json::json;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{
    dto::{CreateCategoryRequest, DeletedCategoryResponse, UpdateCategoryRequest},
    repo::CategoryRepo,
    repo_types::{Category, CategoryChanges, NewCategory},
    services::{validate_color, validate_name},
};
use crate::{
    auth::extractors::AuthUser,
    error::ApiError,
    extract::{ApiJson, ApiPath},
    logs::services::audit,
    state::AppState,
};

pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/:id",
            put(update_category).delete(delete_category),
        )
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn list_categories(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<Category>>, ApiError> {
    Ok(Json(state.store.list_categories(user.id).await?))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn create_category(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiJson(body): ApiJson<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    let name = validate_name(&body.name)?;
    let color = validate_color(body.color.as_deref())?;

    if state
        .store
        .find_category_by_name(user.id, &name)
        .await?
        .is_some()
    {
        return Err(ApiError::conflict(format!("Category {name:?} already exists")));
    }

    let category = state
        .store
        .create_category(user.id, NewCategory { name, color })
        .await?;

    info!(category_id = %category.id, "category created");
    audit(
        &state,
        user.id,
        "category.created",
        json!({ "categoryId": category.id, "name": category.name }),
    )
    .await;
    Ok((StatusCode::CREATED, Json(category)))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn update_category(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<UpdateCategoryRequest>,
) -> Result<Json<Category>, ApiError> {
    let name = body.name.as_deref().map(validate_name).transpose()?;
    let color = body
        .color
        .map(|c| validate_color(c.as_deref()))
        .transpose()?;

    if let Some(name) = &name {
        let clash = state.store.find_category_by_name(user.id, name).await?;
        if clash.is_some_and(|c| c.id != id) {
            return Err(ApiError::conflict(format!("Category {name:?} already exists")));
        }
    }

    let category = state
        .store
        .update_category(user.id, id, CategoryChanges { name, color })
        .await?
        .ok_or_else(|| ApiError::not_found("Category not found"))?;

    info!(category_id = %id, "category updated");
    audit(
        &state,
        user.id,
        "category.updated",
        json!({ "categoryId": id, "name": category.name }),
    )
    .await;
    Ok(Json(category))
}

/// Deleting a category also deletes every transaction filed under it.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn delete_category(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<DeletedCategoryResponse>, ApiError> {
    let Some(removed) = state.store.delete_category(user.id, id).await? else {
        warn!(category_id = %id, "delete of missing or foreign category");
        return Err(ApiError::not_found("Category not found"));
    };

    info!(category_id = %id, removed_transactions = removed, "category deleted");
    audit(
        &state,
        user.id,
        "category.deleted",
        json!({ "categoryId": id, "deletedTransactions": removed }),
    )
    .await;
    Ok(Json(DeletedCategoryResponse {
        id,
        deleted_transactions: removed,
    }))
}
