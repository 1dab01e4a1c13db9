// ============================
// crates/backend-lib/src/validation/mod.rs
// ============================
//! Request input validation.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

// Common validation constants
const MAX_EMAIL_LENGTH: usize = 254; // RFC 5321 SMTP limit
const MAX_PASSWORD_LENGTH: usize = 128;

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap());

/// Possible validation errors
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    #[error("Invalid password: {0}")]
    InvalidPassword(String),

    #[error("Invalid rating: {0}")]
    InvalidRating(String),
}

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validate an email address
pub fn validate_email(email: &str) -> ValidationResult<()> {
    if email.is_empty() {
        return Err(ValidationError::InvalidEmail("email is empty".to_string()));
    }
    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::InvalidEmail(format!(
            "email exceeds {MAX_EMAIL_LENGTH} characters"
        )));
    }
    if !EMAIL_REGEX.is_match(email) {
        return Err(ValidationError::InvalidEmail(
            "email format is invalid".to_string(),
        ));
    }
    Ok(())
}

/// Structural password checks; complexity is the auth workflow's concern
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::InvalidPassword(
            "password is empty".to_string(),
        ));
    }
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(ValidationError::InvalidPassword(format!(
            "password exceeds {MAX_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate a star rating value
pub fn validate_rating_value(value: u8) -> ValidationResult<()> {
    if !(1..=5).contains(&value) {
        return Err(ValidationError::InvalidRating(format!(
            "rating value {value} is outside 1..=5"
        )));
    }
    Ok(())
}
