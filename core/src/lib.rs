//! # Token Lifecycle Core
//!
//! Domain layer and services for issuing short-lived signed access tokens,
//! rotating opaque refresh tokens and detecting reuse of retired refresh
//! tokens across a per-user token family.
//!
//! Persistence is reached only through the [`CredentialRepository`] and
//! [`TokenFamilyRepository`] traits; the engine keeps no in-process session
//! state.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
