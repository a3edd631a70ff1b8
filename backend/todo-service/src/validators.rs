//! Input validation utilities for todo service

use crate::error::{Result, ServiceError};
use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

// Compiled once; the pattern is a constant and always valid
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("hardcoded email regex is invalid - fix source code")
});

/// Validate email shape (`local@domain.tld`, final label of two or more letters)
pub fn validate_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Require a non-empty field
pub fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(ServiceError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

/// Parse a required UUID field
pub fn parse_uuid(field: &str, value: &str) -> Result<Uuid> {
    require_non_empty(field, value)?;
    Uuid::parse_str(value)
        .map_err(|_| ServiceError::Validation(format!("{} must be a valid UUID", field)))
}
