use uuid::Uuid;

use super::{
    dto::{CreateTransactionRequest, UpdateTransactionRequest},
    repo_types::{NewTransaction, Transaction},
};
use crate::{
    categories::{repo::CategoryRepo, repo_types::Category},
    dates,
    error::ApiError,
    money,
    state::AppState,
};

pub const MAX_DESCRIPTION_LEN: usize = 500;

pub fn validate_amount(amount: f64) -> Result<f64, ApiError> {
    money::validate(amount, "Amount", false)
}

pub fn validate_description(raw: Option<&str>) -> Result<String, ApiError> {
    let description = raw.map(str::trim).unwrap_or_default();
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(ApiError::validation(format!(
            "Description must be at most {MAX_DESCRIPTION_LEN} characters"
        )));
    }
    Ok(description.to_string())
}

/// The category must exist and belong to the caller. Someone else's
/// category is reported the same way as a missing one.
pub async fn owned_category(
    state: &AppState,
    user_id: Uuid,
    category_id: Uuid,
) -> Result<Category, ApiError> {
    state
        .store
        .find_category(user_id, category_id)
        .await?
        .ok_or_else(|| ApiError::validation("Category does not exist"))
}

pub async fn prepare_new(
    state: &AppState,
    user_id: Uuid,
    req: CreateTransactionRequest,
) -> Result<(NewTransaction, Category), ApiError> {
    let amount = validate_amount(req.amount)?;
    let description = validate_description(req.description.as_deref())?;
    let category = owned_category(state, user_id, req.category_id).await?;
    let new = NewTransaction {
        category_id: category.id,
        amount,
        kind: req.kind,
        description,
        date: req.date.unwrap_or_else(dates::today),
    };
    Ok((new, category))
}

/// Merges a partial update onto `current` and re-validates the result.
pub async fn prepare_update(
    state: &AppState,
    user_id: Uuid,
    current: &Transaction,
    req: UpdateTransactionRequest,
) -> Result<(NewTransaction, Category), ApiError> {
    let amount = validate_amount(req.amount.unwrap_or(current.amount))?;
    let description = match req.description.as_deref() {
        Some(d) => validate_description(Some(d))?,
        None => current.description.clone(),
    };
    let category_id = req.category_id.unwrap_or(current.category_id);
    let category = owned_category(state, user_id, category_id).await?;
    let merged = NewTransaction {
        category_id,
        amount,
        kind: req.kind.unwrap_or(current.kind),
        description,
        date: req.date.unwrap_or(current.date),
    };
    Ok((merged, category))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_must_be_positive_and_finite() {
        assert_eq!(validate_amount(12.5).unwrap(), 12.5);
        assert!(validate_amount(0.0).is_err());
        assert!(validate_amount(-3.0).is_err());
        assert!(validate_amount(f64::NAN).is_err());
        assert!(validate_amount(f64::INFINITY).is_err());
    }

    #[test]
    fn amount_is_bounded_and_in_whole_cents() {
        assert_eq!(validate_amount(money::MAX_AMOUNT).unwrap(), money::MAX_AMOUNT);
        assert!(validate_amount(1e13).is_err());
        assert!(validate_amount(0.004).is_err());
        assert_eq!(validate_amount(0.01).unwrap(), 0.01);
    }

    #[test]
    fn description_defaults_to_empty_and_is_bounded() {
        assert_eq!(validate_description(None).unwrap(), "");
        assert_eq!(validate_description(Some(" lunch ")).unwrap(), "lunch");
        assert!(validate_description(Some(&"d".repeat(MAX_DESCRIPTION_LEN + 1))).is_err());
    }
}
