//! Validation for the contact fields shared by users, clients and architects.

use std::sync::LazyLock;

use regex::Regex;
use validator::ValidateEmail;

use crate::error::CoreError;

/// Maximum length for person / company names.
pub const MAX_NAME_LENGTH: usize = 200;

/// Digits, spaces, dashes, dots and parentheses with an optional leading `+`.
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9][0-9 ().\-]{4,24}$").expect("valid phone regex"));

/// Validate a required display name.
pub fn validate_name(name: &str) -> Result<(), CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("name must not be empty".into()));
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "name must be at most {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate a required email address.
pub fn validate_email(email: &str) -> Result<(), CoreError> {
    if email.validate_email() {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "'{email}' is not a valid email address"
        )))
    }
}

/// Validate an optional email address. Blank strings count as absent.
pub fn validate_optional_email(email: Option<&str>) -> Result<(), CoreError> {
    match email.map(str::trim) {
        Some(e) if !e.is_empty() => validate_email(e),
        _ => Ok(()),
    }
}

/// Validate an optional phone number. Blank strings count as absent.
pub fn validate_optional_phone(phone: Option<&str>) -> Result<(), CoreError> {
    match phone.map(str::trim) {
        Some(p) if !p.is_empty() => {
            if PHONE_RE.is_match(p) {
                Ok(())
            } else {
                Err(CoreError::Validation(format!(
                    "'{p}' is not a valid phone number"
                )))
            }
        }
        _ => Ok(()),
    }
}

/// Normalize an email for storage and lookup (trimmed, lowercase).
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
