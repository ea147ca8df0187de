use lazy_static::lazy_static;
use regex::Regex;

use crate::error::ApiError;

pub const MAX_NAME_LEN: usize = 50;

lazy_static! {
    static ref COLOR_RE: Regex = Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").unwrap();
}

pub fn validate_name(raw: &str) -> Result<String, ApiError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ApiError::validation("Category name cannot be empty"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(ApiError::validation(format!(
            "Category name must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(name.to_string())
}

/// Blank colors are treated as "no color". Stored lower-cased.
pub fn validate_color(raw: Option<&str>) -> Result<Option<String>, ApiError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(c) if COLOR_RE.is_match(c) => Ok(Some(c.to_ascii_lowercase())),
        Some(c) => Err(ApiError::validation(format!(
            "Invalid color {c:?}, expected #RGB or #RRGGBB"
        ))),
    }
}
