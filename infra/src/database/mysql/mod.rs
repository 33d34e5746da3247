//! MySQL-specific database implementations
//!
//! This module contains MySQL implementations of the store traits
//! using SQLx for database operations.

pub mod credential_repository_impl;
pub mod token_family_repository_impl;

// Re-export the MySQL implementations
pub use credential_repository_impl::MySqlCredentialRepository;
pub use token_family_repository_impl::MySqlTokenFamilyRepository;
