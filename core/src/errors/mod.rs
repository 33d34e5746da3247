//! Domain-specific error types and error handling.

mod types;

#[cfg(test)]
mod tests;

pub use types::TokenError;

use thiserror::Error;
use tl_shared::ConfigError;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    /// Store I/O failure, surfaced unchanged and never retried by the engine
    #[error("Storage error: {message}")]
    Storage { message: String },

    /// Arithmetic or invariant failure inside the engine
    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl DomainError {
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// The token decision kind, if this error carries one
    pub fn token_error(&self) -> Option<&TokenError> {
        match self {
            Self::Token(err) => Some(err),
            _ => None,
        }
    }

    /// Stable error code for transports
    pub fn error_code(&self) -> &'static str {
        use tl_shared::error_codes;
        match self {
            Self::Token(err) => err.error_code(),
            Self::NotFound { .. } => error_codes::NOT_FOUND,
            Self::Storage { .. } => error_codes::STORAGE_ERROR,
            Self::Validation { .. } | Self::Internal { .. } | Self::Config(_) => {
                error_codes::INTERNAL_ERROR
            }
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
