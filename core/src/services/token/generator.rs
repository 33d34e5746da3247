//! Opaque refresh token generation

use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::rngs::OsRng;
use rand::RngCore;

/// Entropy of a refresh token: 256 bits
pub const REFRESH_TOKEN_BYTES: usize = 32;

/// Source of opaque refresh token values
///
/// Tokens carry no structure (no counter, no timestamp); uniqueness rests on
/// randomness alone.
pub trait RefreshTokenGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Generator backed by the operating system's CSPRNG, base64-encoded
#[derive(Debug, Clone, Copy, Default)]
pub struct SecureRandomGenerator;

impl RefreshTokenGenerator for SecureRandomGenerator {
    fn generate(&self) -> String {
        let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        STANDARD.encode(bytes)
    }
}
