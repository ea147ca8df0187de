use std::collections::HashMap;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde_json::json;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{
    dto::{
        CreateTransactionRequest, DeletedTransactionResponse, TransactionQuery,
        TransactionResponse, UpdateTransactionRequest,
    },
    repo::TransactionRepo,
    repo_types::TransactionFilter,
    services::{prepare_new, prepare_update},
};
use crate::{
    auth::extractors::AuthUser,
    categories::repo::CategoryRepo,
    error::ApiError,
    extract::{ApiJson, ApiPath, ApiQuery},
    logs::services::audit,
    state::AppState,
};

const MAX_PAGE: i64 = 1000;

pub fn transaction_routes() -> Router<AppState> {
    Router::new()
        .route("/transactions", get(list_transactions).post(create_transaction))
        .route(
            "/transactions/:id",
            get(get_transaction)
                .put(update_transaction)
                .delete(delete_transaction),
        )
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn list_transactions(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiQuery(q): ApiQuery<TransactionQuery>,
) -> Result<Json<Vec<TransactionResponse>>, ApiError> {
    if let (Some(from), Some(to)) = (q.from, q.to) {
        if from > to {
            return Err(ApiError::validation("`from` must not be after `to`"));
        }
    }
    if q.limit < 1 || q.offset < 0 {
        return Err(ApiError::validation("limit must be positive and offset non-negative"));
    }

    let filter = TransactionFilter {
        from: q.from,
        to: q.to,
        category_id: q.category_id,
        kind: q.kind,
        limit: Some(q.limit.min(MAX_PAGE)),
        offset: q.offset,
    };
    let rows = state.store.list_transactions(user.id, &filter).await?;

    let names: HashMap<Uuid, String> = state
        .store
        .list_categories(user.id)
        .await?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();

    let items = rows
        .into_iter()
        .map(|t| {
            let name = names.get(&t.category_id).cloned();
            TransactionResponse::new(t, name)
        })
        .collect();
    Ok(Json(items))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn get_transaction(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<TransactionResponse>, ApiError> {
    let tx = state
        .store
        .find_transaction(user.id, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Transaction not found"))?;
    let category = state.store.find_category(user.id, tx.category_id).await?;
    Ok(Json(TransactionResponse::new(tx, category.map(|c| c.name))))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn create_transaction(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiJson(body): ApiJson<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<TransactionResponse>), ApiError> {
    let (new, category) = prepare_new(&state, user.id, body).await?;
    let tx = state.store.create_transaction(user.id, new).await?;

    info!(transaction_id = %tx.id, amount = tx.amount, kind = %tx.kind, "transaction created");
    audit(
        &state,
        user.id,
        "transaction.created",
        json!({ "transactionId": tx.id, "amount": tx.amount, "type": tx.kind }),
    )
    .await;
    Ok((
        StatusCode::CREATED,
        Json(TransactionResponse::new(tx, Some(category.name))),
    ))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn update_transaction(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<UpdateTransactionRequest>,
) -> Result<Json<TransactionResponse>, ApiError> {
    let current = state
        .store
        .find_transaction(user.id, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Transaction not found"))?;

    let (merged, category) = prepare_update(&state, user.id, &current, body).await?;
    let tx = state
        .store
        .replace_transaction(user.id, id, merged)
        .await?
        .ok_or_else(|| ApiError::not_found("Transaction not found"))?;

    info!(transaction_id = %id, "transaction updated");
    audit(
        &state,
        user.id,
        "transaction.updated",
        json!({ "transactionId": id, "amount": tx.amount, "type": tx.kind }),
    )
    .await;
    Ok(Json(TransactionResponse::new(tx, Some(category.name))))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn delete_transaction(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<DeletedTransactionResponse>, ApiError> {
    if !state.store.delete_transaction(user.id, id).await? {
        warn!(transaction_id = %id, "delete of missing or foreign transaction");
        return Err(ApiError::not_found("Transaction not found"));
    }

    info!(transaction_id = %id, "transaction deleted");
    audit(&state, user.id, "transaction.deleted", json!({ "transactionId": id })).await;
    Ok(Json(DeletedTransactionResponse { id }))
}
