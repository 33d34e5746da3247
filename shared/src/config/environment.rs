//! Environment configuration module

use serde::{Deserialize, Serialize};
use std::env;

/// Application environment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development environment
    #[default]
    Development,
    /// Staging/test environment
    Staging,
    /// Production environment
    Production,
}

impl Environment {
    /// Check if running in production
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    /// Check if running in development
    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }

    /// Get environment from ENV variable
    pub fn from_env() -> Self {
        env::var("ENVIRONMENT")
            .or_else(|_| env::var("RUST_ENV"))
            .unwrap_or_else(|_| String::from("development"))
            .parse()
            .unwrap_or(Environment::Development)
    }

    /// Get the .env file name for this environment
    pub fn env_file(&self) -> &str {
        match self {
            Environment::Development => ".env.development",
            Environment::Staging => ".env.staging",
            Environment::Production => ".env.production",
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Staging => write!(f, "staging"),
            Environment::Production => write!(f, "production"),
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "staging" | "stage" | "test" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(format!("Invalid environment: {}", s)),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error), overridden by `RUST_LOG`
    pub level: String,

    /// Log format (json, pretty, compact)
    #[serde(default = "default_log_format")]
    pub format: LogFormat,

    /// Include source location in logs
    #[serde(default)]
    pub source_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: default_log_format(),
            source_location: false,
        }
    }
}

impl LoggingConfig {
    /// Create logging config for environment
    pub fn for_environment(env: Environment) -> Self {
        match env {
            Environment::Development => Self {
                level: String::from("debug"),
                format: LogFormat::Pretty,
                source_location: true,
            },
            Environment::Staging => Self {
                level: String::from("info"),
                format: LogFormat::Json,
                source_location: false,
            },
            Environment::Production => Self {
                level: String::from("info"),
                format: LogFormat::Json,
                source_location: false,
            },
        }
    }
}

/// Log format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
    Compact,
}

fn default_log_format() -> LogFormat {
    LogFormat::Pretty
}
