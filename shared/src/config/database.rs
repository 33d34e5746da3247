//! Database configuration module

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Database configuration for the credential and token family stores
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Database connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Connection timeout in seconds
    pub connect_timeout: u64,

    /// Idle connection timeout in seconds
    pub idle_timeout: u64,

    /// Maximum lifetime of a connection in seconds
    pub max_lifetime: u64,

    /// Slow query threshold in milliseconds
    #[serde(default = "default_slow_query_threshold")]
    pub slow_query_threshold: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::from("mysql://localhost:3306/token_lifecycle"),
            max_connections: 10,
            connect_timeout: 30,
            idle_timeout: 600,
            max_lifetime: 1800,
            slow_query_threshold: default_slow_query_threshold(),
        }
    }
}

impl DatabaseConfig {
    /// Create from environment variables; `DATABASE_URL` is required
    pub fn from_env() -> Result<Self, ConfigError> {
        let url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| ConfigError::missing("DATABASE_URL"))?;
        let max_connections = match std::env::var("DATABASE_MAX_CONNECTIONS") {
            Ok(value) => value
                .parse()
                .map_err(|_| ConfigError::invalid("DATABASE_MAX_CONNECTIONS", "expected an integer"))?,
            Err(_) => 10,
        };

        Ok(Self {
            url,
            max_connections,
            ..Default::default()
        })
    }

    /// Create a new database configuration with URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Set the maximum number of connections
    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }
}

fn default_slow_query_threshold() -> u64 {
    1000 // 1 second
}
