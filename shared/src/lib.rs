//! Shared configuration and utilities for the token lifecycle workspace
//!
//! This crate provides functionality used across the server crates:
//! - Configuration types (token lifetimes, signing, logging, database)
//! - Configuration error type and error codes
//! - Validation helpers

pub mod config;
pub mod errors;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, AuthConfig, DatabaseConfig, Environment, JwtConfig, LogFormat, LoggingConfig,
    TokenFamilySweepConfig, TokenLifetimeConfig,
};
pub use errors::{error_codes, ConfigError};
pub use utils::validation;
