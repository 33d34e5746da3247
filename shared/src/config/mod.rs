//! Configuration module
//!
//! - `auth` - Signing key, issuer/audience and token lifetimes
//! - `database` - Database connection and pool configuration
//! - `environment` - Environment detection and logging configuration

pub mod auth;
pub mod database;
pub mod environment;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

// Re-export commonly used types
pub use auth::{AuthConfig, JwtConfig, TokenFamilySweepConfig, TokenLifetimeConfig};
pub use database::DatabaseConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Authentication configuration
    pub auth: AuthConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from the process environment
    ///
    /// Loads the environment-specific `.env` file (then a plain `.env`) if
    /// present. Called once at startup; any error is fatal.
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = Environment::from_env();
        dotenvy::from_filename(environment.env_file()).ok();
        dotenvy::dotenv().ok();

        Ok(Self {
            environment,
            auth: AuthConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            logging: LoggingConfig::for_environment(environment),
        })
    }
}
