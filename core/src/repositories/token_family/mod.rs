//! Token family store: retired refresh tokens kept for reuse detection.

mod r#trait;
pub use r#trait::TokenFamilyRepository;

mod memory;
pub use memory::InMemoryTokenFamilyRepository;

#[cfg(test)]
mod tests;
