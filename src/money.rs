//! Amount rules shared by transactions, the monthly goal and the dashboard.
//!
//! Amounts travel as `f64` but must be whole cents no larger than
//! [`MAX_AMOUNT`], so converting to integer cents is exact and sums of any
//! realistic number of them fit in an `i128`.

use crate::error::ApiError;

/// Largest amount (and monthly goal) the API accepts.
pub const MAX_AMOUNT: f64 = 1_000_000_000_000.0;

pub fn to_cents(amount: f64) -> i128 {
    (amount * 100.0).round() as i128
}

pub fn from_cents(cents: i128) -> f64 {
    cents as f64 / 100.0
}

/// True when `amount` has at most two decimal places, allowing for the
/// representation error of large values.
fn is_whole_cents(amount: f64) -> bool {
    let cents = amount * 100.0;
    let tolerance = 1e-6_f64.max(cents.abs() * f64::EPSILON * 8.0);
    (cents - cents.round()).abs() <= tolerance
}

/// Checks a money value against the shared rules. `what` names the field in
/// the error message; `allow_zero` admits zero (a goal may be unset).
pub fn validate(amount: f64, what: &str, allow_zero: bool) -> Result<f64, ApiError> {
    let in_range = if allow_zero { amount >= 0.0 } else { amount > 0.0 };
    if !amount.is_finite() || !in_range {
        let bound = if allow_zero { "a non-negative" } else { "a positive" };
        return Err(ApiError::validation(format!("{what} must be {bound} number")));
    }
    if amount > MAX_AMOUNT {
        return Err(ApiError::validation(format!(
            "{what} must be at most {MAX_AMOUNT:.0}"
        )));
    }
    if !is_whole_cents(amount) {
        return Err(ApiError::validation(format!(
            "{what} must have at most two decimal places"
        )));
    }
    Ok(amount)
}
