//! Tracing subscriber initialization

use tl_shared::config::{LogFormat, LoggingConfig};
use tracing_subscriber::EnvFilter;

use crate::InfrastructureError;

/// Builds the filter: `RUST_LOG` wins, the configured level is the fallback
pub fn env_filter(config: &LoggingConfig) -> Result<EnvFilter, InfrastructureError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.level).map_err(|e| {
            InfrastructureError::Config(format!("Invalid log level {:?}: {}", config.level, e))
        }),
    }
}

/// Install the global `tracing` subscriber
///
/// Call once at startup. Security events are emitted with
/// `target: "security"` and can be routed with a filter such as
/// `RUST_LOG=info,security=warn`.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), InfrastructureError> {
    let filter = env_filter(config)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(config.source_location)
        .with_line_number(config.source_location);

    let result = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
    };

    result.map_err(|e| InfrastructureError::Telemetry(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_filter_rejects_garbage_level() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        let config = LoggingConfig {
            level: "tl_core=verbose".to_string(),
            format: LogFormat::Compact,
            source_location: false,
        };
        assert!(matches!(env_filter(&config), Err(InfrastructureError::Config(_))));
    }

    #[test]
    fn test_second_init_fails() {
        let config = LoggingConfig {
            level: "debug".to_string(),
            format: LogFormat::Compact,
            source_location: true,
        };
        let _ = init_tracing(&config);
        assert!(matches!(
            init_tracing(&config),
            Err(InfrastructureError::Telemetry(_))
        ));
    }
}
