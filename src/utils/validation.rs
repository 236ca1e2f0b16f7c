//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! Limits are chosen as reasonable UX limits for names, notes and addresses;
//! the document store itself has no built-in length enforcement.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: product, category, first/last name, etc.
pub const MAX_NAME_LEN: usize = 200;

/// Descriptions
pub const MAX_DESCRIPTION_LEN: usize = 2000;

/// Short identifiers: phone, postcode, etc.
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;
pub const MIN_PASSWORD_LEN: usize = 8;

/// URLs / image paths
pub const MAX_URL_LEN: usize = 2048;

/// Addresses
pub const MAX_ADDRESS_LEN: usize = 500;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Validate a contact phone number: non-empty, digits only.
pub fn validate_phone(value: &str) -> Result<(), AppError> {
    validate_required_text(value, "phone", MAX_SHORT_TEXT_LEN)?;
    if !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::validation(
            "phone must contain digits only".to_string(),
        ));
    }
    Ok(())
}

/// Minimal email shape check: `local@domain` with a dot in the domain.
///
/// Deliverability is not our problem; this only rejects obvious garbage.
pub fn validate_email(value: &str) -> Result<(), AppError> {
    validate_required_text(value, "email", MAX_EMAIL_LEN)?;
    let valid = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    };
    if !valid {
        return Err(AppError::validation("email is not a valid address".to_string()));
    }
    Ok(())
}

/// Validate a password before hashing.
pub fn validate_password(value: &str) -> Result<(), AppError> {
    if value.len() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    if value.len() > MAX_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "password is too long (max {MAX_PASSWORD_LEN} characters)"
        )));
    }
    Ok(())
}
