//! Domain entities for the token lifecycle.

pub mod principal;
pub mod token;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use principal::{Principal, RefreshTokenState};
pub use token::{AccessTokenClaims, TokenFamilyEntry, TokenPair};
