//! Input validation utilities

use regex::Regex;
use std::sync::OnceLock;

use crate::error::{ApiError, ApiResult};

/// Validate username
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.is_empty() {
        return Err("Username is required".to_string());
    }

    if username.len() < 3 {
        return Err("Username must be at least 3 characters long".to_string());
    }

    if username.len() > 32 {
        return Err("Username must be at most 32 characters long".to_string());
    }

    static USERNAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = USERNAME_REGEX
        .get_or_init(|| Regex::new(r"^[a-zA-Z0-9_]+$").expect("Failed to compile username regex"));

    if !regex.is_match(username) {
        return Err("Username can only contain letters, numbers, and underscores".to_string());
    }

    Ok(())
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 254 {
        return Err("Email must be at most 254 characters long".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[\w-]+(\.[\w-]+)*@([\w-]+\.)+[a-zA-Z]{2,7}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate password
///
/// At least six alphanumeric characters including one digit and one
/// uppercase letter.
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    if password.chars().count() < 6 {
        return Err("Password must be at least 6 characters long".to_string());
    }

    if password.len() > 128 {
        return Err("Password must be at most 128 characters long".to_string());
    }

    if !password.chars().all(char::is_alphanumeric) {
        return Err("Password can only contain letters and numbers".to_string());
    }

    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err("Password must contain at least one digit".to_string());
    }

    if !password.chars().any(char::is_uppercase) {
        return Err("Password must contain at least one uppercase letter".to_string());
    }

    Ok(())
}

/// Trim and lowercase an ingredient name, rejecting blanks
pub fn normalize_ingredient_name(name: &str) -> ApiResult<String> {
    let normalized = name.trim().to_lowercase();
    if normalized.is_empty() {
        return Err(ApiError::validation("name", "Name is required"));
    }
    Ok(normalized)
}

/// Require a non-blank text field, returning it trimmed
pub fn require_text(field: &str, value: &str) -> ApiResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation(field, format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

pub fn non_negative(field: &str, value: f64) -> ApiResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(ApiError::validation(field, format!("{} cannot be negative", field)));
    }
    Ok(())
}

pub fn positive(field: &str, value: f64) -> ApiResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ApiError::validation(
            field,
            format!("{} must be greater than zero", field),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_rules() {
        assert!(validate_username("chef_01").is_ok());
        assert!(validate_username("ab").is_err());
        assert!(validate_username("bad name").is_err());
    }

    #[test]
    fn test_email_rules() {
        assert!(validate_email("cook.book@example.com").is_ok());
        assert!(validate_email("missing-at.example.com").is_err());
        assert!(validate_email("").is_err());
    }

    #[test]
    fn test_password_rules() {
        assert!(validate_password("Test1234").is_ok());
        assert!(validate_password("Ab1").is_err());
        assert!(validate_password("lowercase1").is_err());
        assert!(validate_password("NoDigitsHere").is_err());
        assert!(validate_password("Symbol#123").is_err());
    }

    #[test]
    fn test_ingredient_names_are_lowercased() {
        assert_eq!(normalize_ingredient_name("  Platano Rojo ").unwrap(), "platano rojo");
        assert!(normalize_ingredient_name("   ").is_err());
    }

    #[test]
    fn test_numeric_bounds() {
        assert!(non_negative("estimatedCost", 0.0).is_ok());
        assert!(non_negative("estimatedCost", -0.1).is_err());
        assert!(non_negative("estimatedCost", f64::NAN).is_err());
        assert!(positive("amount", 0.0).is_err());
        assert!(positive("amount", 100.0).is_ok());
    }
}
