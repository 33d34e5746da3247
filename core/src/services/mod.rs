//! Business services containing the token lifecycle logic.

pub mod token;

// Re-export commonly used types
pub use token::{
    AccessTokenSigner, RefreshTokenGenerator, RefreshTokenRejection, RefreshTokenValidation,
    SecureRandomGenerator, SweepResult, TokenFamilySweeper, TokenLifecycleService,
    TokenServiceConfig, ValidatedRefreshToken,
};
