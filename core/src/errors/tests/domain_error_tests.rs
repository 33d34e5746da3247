//! Unit tests for domain error types

use crate::errors::{DomainError, TokenError};
use tl_shared::{error_codes, ConfigError};

#[test]
fn test_token_error_codes() {
    assert_eq!(TokenError::ReuseDetected.error_code(), error_codes::TOKEN_REUSE_DETECTED);
    assert_eq!(TokenError::Expired.error_code(), error_codes::TOKEN_EXPIRED);
    assert_eq!(TokenError::UserMismatch.error_code(), error_codes::TOKEN_USER_MISMATCH);
    assert_eq!(TokenError::InvalidToken.error_code(), error_codes::TOKEN_INVALID);
    assert_eq!(
        TokenError::invalid_principal("empty email").error_code(),
        error_codes::INVALID_PRINCIPAL
    );
}

#[test]
fn test_reauthentication_policy() {
    assert!(TokenError::ReuseDetected.requires_reauthentication());
    assert!(TokenError::Expired.requires_reauthentication());
    assert!(TokenError::UserMismatch.requires_reauthentication());
    assert!(TokenError::InvalidToken.requires_reauthentication());

    // Malformed identity is a request failure, not a session failure
    assert!(!TokenError::invalid_principal("empty email").requires_reauthentication());
    assert!(!TokenError::TokenGenerationFailed.requires_reauthentication());
}

#[test]
fn test_only_reuse_is_a_security_event() {
    assert!(TokenError::ReuseDetected.is_security_event());
    assert!(!TokenError::Expired.is_security_event());
    assert!(!TokenError::UserMismatch.is_security_event());
}

#[test]
fn test_domain_error_bridges_token_error() {
    let err: DomainError = TokenError::Expired.into();
    assert_eq!(err.token_error(), Some(&TokenError::Expired));
    assert_eq!(err.error_code(), error_codes::TOKEN_EXPIRED);
    assert_eq!(err.to_string(), "Refresh token expired");
}

#[test]
fn test_domain_error_codes() {
    assert_eq!(DomainError::storage("disk full").error_code(), error_codes::STORAGE_ERROR);
    assert_eq!(
        DomainError::NotFound { resource: "user".to_string() }.error_code(),
        error_codes::NOT_FOUND
    );
    let internal = DomainError::internal("expiry overflow");
    assert_eq!(internal.error_code(), error_codes::INTERNAL_ERROR);
    assert_eq!(internal.to_string(), "Internal error: expiry overflow");
    let config: DomainError = ConfigError::missing("JWT_SECRET").into();
    assert_eq!(config.error_code(), error_codes::INTERNAL_ERROR);
    assert!(config.token_error().is_none());
}
