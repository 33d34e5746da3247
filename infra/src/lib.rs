//! # Infrastructure Layer
//!
//! Concrete implementations of the stores consumed by the token lifecycle
//! engine, plus process-level setup.
//!
//! ## Architecture
//!
//! - **Database**: MySQL implementations of `CredentialRepository` and
//!   `TokenFamilyRepository` using SQLx
//! - **Telemetry**: `tracing` subscriber initialization
//!
//! ## Features
//!
//! - `mysql`: Enable MySQL database support (default)

#[cfg(feature = "mysql")]
use std::sync::Arc;

#[cfg(feature = "mysql")]
use tl_core::services::token::{TokenFamilySweeper, TokenLifecycleService, TokenServiceConfig};
use tl_shared::config::AppConfig;

// Re-export core types for convenience
pub use tl_core::errors::*;

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

/// Tracing subscriber setup
pub mod telemetry;

#[cfg(feature = "mysql")]
use database::{DatabasePool, MySqlCredentialRepository, MySqlTokenFamilyRepository};

/// Engine type wired to the MySQL stores
#[cfg(feature = "mysql")]
pub type MySqlTokenLifecycleService =
    TokenLifecycleService<MySqlCredentialRepository, Arc<MySqlTokenFamilyRepository>>;

/// Everything a transport needs to serve login, refresh and logout
#[cfg(feature = "mysql")]
pub struct InfrastructureServices {
    pub pool: DatabasePool,
    pub tokens: MySqlTokenLifecycleService,
    pub sweeper: Arc<TokenFamilySweeper<MySqlTokenFamilyRepository>>,
}

/// Initialize infrastructure services from a loaded configuration
///
/// This function sets up:
/// - The database connection pool and schema
/// - The token lifecycle engine over the MySQL stores
/// - The token family sweeper (not started)
#[cfg(feature = "mysql")]
pub async fn initialize(config: &AppConfig) -> Result<InfrastructureServices, InfrastructureError> {
    tracing::info!(environment = %config.environment, "Initializing infrastructure services...");

    config
        .auth
        .validate()
        .map_err(|e| InfrastructureError::Config(e.to_string()))?;
    if config.auth.jwt.is_using_default_secret() {
        tracing::warn!("JWT_SECRET is the development default; never use it in production");
    }

    let pool = DatabasePool::new(config.database.clone()).await?;
    pool.run_migrations().await?;

    let family = Arc::new(MySqlTokenFamilyRepository::new(pool.get_pool().clone()));
    let tokens = TokenLifecycleService::new(
        MySqlCredentialRepository::new(pool.get_pool().clone()),
        family.clone(),
        TokenServiceConfig::from(&config.auth),
    )
    .map_err(|e| InfrastructureError::Config(e.to_string()))?;

    let sweeper = Arc::new(TokenFamilySweeper::new(
        family,
        tokens.config().family_retention(),
        config.auth.sweep.clone(),
    ));

    tracing::info!("Infrastructure services initialized successfully");

    Ok(InfrastructureServices {
        pool,
        tokens,
        sweeper,
    })
}

/// Load the application configuration from the environment
///
/// Any missing value is fatal at startup.
pub fn load_config() -> Result<AppConfig, InfrastructureError> {
    AppConfig::from_env().map_err(|e| InfrastructureError::Config(e.to_string()))
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Tracing subscriber could not be installed
    #[error("Telemetry error: {0}")]
    Telemetry(String),
}
