//! Credential store: one active refresh token per principal.

mod r#trait;
pub use r#trait::CredentialRepository;

mod memory;
pub use memory::InMemoryCredentialRepository;

#[cfg(test)]
mod tests;
