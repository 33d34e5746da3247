//! Token decision errors
//!
//! Each kind maps to a precise caller outcome. Messages are for logs; the
//! transport layer decides what the user sees.

use thiserror::Error;
use tl_shared::error_codes;

/// Token-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Principal cannot be turned into a token subject
    #[error("Invalid principal: {reason}")]
    InvalidPrincipal { reason: String },

    /// Access token failed signature, issuer, audience or algorithm checks
    #[error("Invalid token")]
    InvalidToken,

    /// A retired refresh token was presented again
    #[error("Refresh token reuse detected")]
    ReuseDetected,

    /// Refresh token is not the principal's current token
    #[error("Refresh token does not match the user")]
    UserMismatch,

    /// Refresh token expired outside the issuance grace period
    #[error("Refresh token expired")]
    Expired,

    #[error("Token generation failed")]
    TokenGenerationFailed,
}

impl TokenError {
    pub fn invalid_principal(reason: impl Into<String>) -> Self {
        Self::InvalidPrincipal {
            reason: reason.into(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidPrincipal { .. } => error_codes::INVALID_PRINCIPAL,
            Self::InvalidToken => error_codes::TOKEN_INVALID,
            Self::ReuseDetected => error_codes::TOKEN_REUSE_DETECTED,
            Self::UserMismatch => error_codes::TOKEN_USER_MISMATCH,
            Self::Expired => error_codes::TOKEN_EXPIRED,
            Self::TokenGenerationFailed => error_codes::TOKEN_GENERATION_FAILED,
        }
    }

    /// Whether the caller must send the user through a full login
    pub fn requires_reauthentication(&self) -> bool {
        matches!(
            self,
            Self::InvalidToken | Self::ReuseDetected | Self::UserMismatch | Self::Expired
        )
    }

    /// Whether the failure must be recorded as a security event
    pub fn is_security_event(&self) -> bool {
        matches!(self, Self::ReuseDetected)
    }
}
