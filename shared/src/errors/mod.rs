//! Shared error types and error codes

use thiserror::Error;

/// Configuration errors raised while loading settings at startup.
///
/// These are fatal: a process that cannot build its configuration must not
/// start serving requests.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing configuration value: {key}")]
    Missing { key: String },

    #[error("Invalid configuration value for {key}: {reason}")]
    Invalid { key: String, reason: String },
}

impl ConfigError {
    pub fn missing(key: impl Into<String>) -> Self {
        Self::Missing { key: key.into() }
    }

    pub fn invalid(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Name of the offending configuration key
    pub fn key(&self) -> &str {
        match self {
            Self::Missing { key } | Self::Invalid { key, .. } => key,
        }
    }
}

/// Stable error codes handed to transports for client identification
pub mod error_codes {
    pub const INVALID_PRINCIPAL: &str = "INVALID_PRINCIPAL";
    pub const TOKEN_INVALID: &str = "TOKEN_INVALID";
    pub const TOKEN_EXPIRED: &str = "TOKEN_EXPIRED";
    pub const TOKEN_REUSE_DETECTED: &str = "TOKEN_REUSE_DETECTED";
    pub const TOKEN_USER_MISMATCH: &str = "TOKEN_USER_MISMATCH";
    pub const TOKEN_GENERATION_FAILED: &str = "TOKEN_GENERATION_FAILED";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_key() {
        assert_eq!(ConfigError::missing("JWT_SECRET").key(), "JWT_SECRET");
        assert_eq!(
            ConfigError::invalid("JWT_ISSUER", "must not be empty").key(),
            "JWT_ISSUER"
        );
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::invalid("JWT_REFRESH_TOKEN_EXPIRY", "must be positive");
        assert_eq!(
            err.to_string(),
            "Invalid configuration value for JWT_REFRESH_TOKEN_EXPIRY: must be positive"
        );
    }
}
