//! Store boundaries consumed by the token lifecycle engine.

pub mod credential;
pub mod token_family;

pub use credential::{CredentialRepository, InMemoryCredentialRepository};
pub use token_family::{InMemoryTokenFamilyRepository, TokenFamilyRepository};
