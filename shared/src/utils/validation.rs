//! Common validation utilities

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is a valid regex")
});

/// Common validation functions
pub mod validators {
    use super::EMAIL_PATTERN;

    /// Check if a string is not empty
    pub fn not_empty(value: &str) -> bool {
        !value.trim().is_empty()
    }

    /// Check if a string length is within bounds
    pub fn length_between(value: &str, min: usize, max: usize) -> bool {
        let len = value.len();
        len >= min && len <= max
    }

    /// Check if an email address is usable as a token subject name (basic shape check)
    pub fn is_valid_email(email: &str) -> bool {
        length_between(email, 3, 320) && EMAIL_PATTERN.is_match(email)
    }
}
