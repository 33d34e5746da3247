//! Token service module
//!
//! This module handles all token-related operations including:
//! - Access token signing and verification (HS256)
//! - Opaque refresh token generation
//! - Refresh token validation, rotation and reuse detection
//! - Retention sweeping of retired refresh tokens

mod config;
mod generator;
mod service;
mod signer;
mod sweeper;
mod validation;

#[cfg(test)]
mod tests;

pub use config::TokenServiceConfig;
pub use generator::{RefreshTokenGenerator, SecureRandomGenerator, REFRESH_TOKEN_BYTES};
pub use service::TokenLifecycleService;
pub use signer::AccessTokenSigner;
pub use sweeper::{SweepResult, TokenFamilySweeper};
pub use validation::{
    evaluate_refresh_token, RefreshTokenRejection, RefreshTokenValidation, ValidatedRefreshToken,
};
