use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationErrors;

use crate::core::error::{AppError, Result};

lazy_static! {
    /// Loose e-mail shape check: something@something.tld, no whitespace
    /// - Valid: "a@b.com", "first.last@sub.example.org"
    /// - Invalid: "a@b", "a b@c.com", "@b.com", "a@.com "
    pub static ref EMAIL_REGEX: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

pub const INVALID_EMAIL: &str = "Please provide a valid email address";

/// Trim a required text field, rejecting missing or blank values.
pub fn required_text(value: Option<String>, field: &str) -> Result<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Validation(format!("{} is required", field)))
}

/// Trim an optional text field; blank collapses to `None`.
pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Trim, lower-case and shape-check an e-mail address.
pub fn normalize_email(value: &str) -> Result<String> {
    let email = value.trim().to_lowercase();
    if !EMAIL_REGEX.is_match(&email) {
        return Err(AppError::Validation(INVALID_EMAIL.to_string()));
    }
    Ok(email)
}

/// Pick the first human-readable message out of a `validator` error set.
///
/// Field names are sorted so the reported message is stable across runs.
pub fn first_error_message(errors: &ValidationErrors) -> String {
    let field_errors = errors.field_errors();
    let mut fields: Vec<_> = field_errors.keys().collect();
    fields.sort();

    fields
        .into_iter()
        .filter_map(|field| field_errors.get(field))
        .flat_map(|errs| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| errors.to_string())
}
