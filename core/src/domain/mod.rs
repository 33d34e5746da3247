//! Domain layer containing the identity principal and token entities.

pub mod entities;

// Re-export commonly used domain types
pub use entities::{AccessTokenClaims, Principal, RefreshTokenState, TokenFamilyEntry, TokenPair};
