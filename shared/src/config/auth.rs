//! Authentication and token lifecycle configuration

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Minimum HS256 secret length in bytes
pub const MIN_SECRET_LENGTH: usize = 32;

/// Upper bound for any lifetime or window (100 years, in seconds)
pub const MAX_LIFETIME_SECONDS: i64 = 100 * 365 * 24 * 3600;

/// JWT signing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Symmetric key used for HMAC-SHA256 signing
    pub secret: String,

    /// JWT issuer claim
    pub issuer: String,

    /// JWT audience claim
    pub audience: String,

    /// Algorithm for JWT signing (only HS256 is accepted)
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::from(DEFAULT_SECRET),
            issuer: String::from("token-lifecycle"),
            audience: String::from("token-lifecycle-api"),
            algorithm: default_algorithm(),
        }
    }
}

const DEFAULT_SECRET: &str = "development-secret-please-change-in-production";

impl JwtConfig {
    /// Create a new JWT configuration with secret, issuer and audience
    pub fn new(
        secret: impl Into<String>,
        issuer: impl Into<String>,
        audience: impl Into<String>,
    ) -> Self {
        Self {
            secret: secret.into(),
            issuer: issuer.into(),
            audience: audience.into(),
            algorithm: default_algorithm(),
        }
    }

    /// Check if using default secret (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.secret == DEFAULT_SECRET
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.is_empty() {
            return Err(ConfigError::missing(ENV_SECRET));
        }
        if self.secret.len() < MIN_SECRET_LENGTH {
            return Err(ConfigError::invalid(
                ENV_SECRET,
                format!("must be at least {} bytes", MIN_SECRET_LENGTH),
            ));
        }
        if self.issuer.trim().is_empty() {
            return Err(ConfigError::missing(ENV_ISSUER));
        }
        if self.audience.trim().is_empty() {
            return Err(ConfigError::missing(ENV_AUDIENCE));
        }
        if !self.algorithm.eq_ignore_ascii_case("HS256") {
            return Err(ConfigError::invalid(
                "algorithm",
                format!("unsupported algorithm {}", self.algorithm),
            ));
        }
        Ok(())
    }
}

/// Lifetimes and windows governing access and refresh tokens, all in seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct TokenLifetimeConfig {
    /// Access token lifetime
    pub access_token_expiry: i64,

    /// Refresh token lifetime, applied at login and on grace extension
    pub refresh_token_expiry: i64,

    /// How long after issuance an expired refresh token is still honoured
    pub issuance_grace_period: i64,

    /// How long retired refresh tokens stay in the token family
    pub family_retention: i64,
}

impl Default for TokenLifetimeConfig {
    fn default() -> Self {
        Self {
            access_token_expiry: 3600,     // 1 hour
            refresh_token_expiry: 86400,   // 1 day
            issuance_grace_period: 3600,   // 1 hour
            family_retention: 86400,       // 24 hours
        }
    }
}

impl TokenLifetimeConfig {
    /// Set access token expiry in minutes
    pub fn with_access_expiry_minutes(mut self, minutes: i64) -> Self {
        self.access_token_expiry = minutes.saturating_mul(60);
        self
    }

    /// Set refresh token expiry in hours
    pub fn with_refresh_expiry_hours(mut self, hours: i64) -> Self {
        self.refresh_token_expiry = hours.saturating_mul(3600);
        self
    }

    /// Set issuance grace period in minutes
    pub fn with_grace_period_minutes(mut self, minutes: i64) -> Self {
        self.issuance_grace_period = minutes.saturating_mul(60);
        self
    }

    /// Set family retention window in hours
    pub fn with_family_retention_hours(mut self, hours: i64) -> Self {
        self.family_retention = hours.saturating_mul(3600);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            (ENV_ACCESS_EXPIRY, self.access_token_expiry),
            (ENV_REFRESH_EXPIRY, self.refresh_token_expiry),
            (ENV_GRACE_PERIOD, self.issuance_grace_period),
            (ENV_FAMILY_RETENTION, self.family_retention),
        ] {
            if value <= 0 {
                return Err(ConfigError::invalid(key, "must be a positive number of seconds"));
            }
            if value > MAX_LIFETIME_SECONDS {
                return Err(ConfigError::invalid(
                    key,
                    format!("must not exceed {} seconds", MAX_LIFETIME_SECONDS),
                ));
            }
        }
        Ok(())
    }
}

/// Background sweep of retired refresh tokens past the retention window
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenFamilySweepConfig {
    /// Whether to enable automatic sweeping
    pub enabled: bool,

    /// How often to run the sweep (in seconds)
    pub interval_seconds: u64,
}

impl Default for TokenFamilySweepConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_seconds: 3600, // Run every hour
        }
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthConfig {
    /// JWT configuration
    pub jwt: JwtConfig,

    /// Token lifetimes and windows
    pub lifetimes: TokenLifetimeConfig,

    /// Retention sweep configuration
    #[serde(default)]
    pub sweep: TokenFamilySweepConfig,
}

pub const ENV_SECRET: &str = "JWT_SECRET";
pub const ENV_ISSUER: &str = "JWT_ISSUER";
pub const ENV_AUDIENCE: &str = "JWT_AUDIENCE";
pub const ENV_ACCESS_EXPIRY: &str = "JWT_ACCESS_TOKEN_EXPIRY";
pub const ENV_REFRESH_EXPIRY: &str = "JWT_REFRESH_TOKEN_EXPIRY";
pub const ENV_GRACE_PERIOD: &str = "JWT_REFRESH_TOKEN_ISSUANCE_GRACE";
pub const ENV_FAMILY_RETENTION: &str = "JWT_TOKEN_FAMILY_RETENTION";
pub const ENV_SWEEP_ENABLED: &str = "TOKEN_FAMILY_SWEEP_ENABLED";
pub const ENV_SWEEP_INTERVAL: &str = "TOKEN_FAMILY_SWEEP_INTERVAL";

impl AuthConfig {
    /// Create from environment variables
    ///
    /// Every signing and lifetime value is required. A missing or malformed
    /// value is reported as a `ConfigError` rather than replaced by a default.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (environment, file, test map)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String, ConfigError> {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| ConfigError::missing(key))
        };
        let seconds = |key: &str| -> Result<i64, ConfigError> {
            required(key)?
                .trim()
                .parse::<i64>()
                .map_err(|e| ConfigError::invalid(key, e.to_string()))
        };

        let jwt = JwtConfig::new(
            required(ENV_SECRET)?,
            required(ENV_ISSUER)?,
            required(ENV_AUDIENCE)?,
        );
        let lifetimes = TokenLifetimeConfig {
            access_token_expiry: seconds(ENV_ACCESS_EXPIRY)?,
            refresh_token_expiry: seconds(ENV_REFRESH_EXPIRY)?,
            issuance_grace_period: seconds(ENV_GRACE_PERIOD)?,
            family_retention: seconds(ENV_FAMILY_RETENTION)?,
        };

        let mut sweep = TokenFamilySweepConfig::default();
        if let Some(enabled) = lookup(ENV_SWEEP_ENABLED) {
            sweep.enabled = enabled
                .trim()
                .parse()
                .map_err(|_| ConfigError::invalid(ENV_SWEEP_ENABLED, "expected true or false"))?;
        }
        if let Some(interval) = lookup(ENV_SWEEP_INTERVAL) {
            sweep.interval_seconds = interval
                .trim()
                .parse()
                .map_err(|e: std::num::ParseIntError| {
                    ConfigError::invalid(ENV_SWEEP_INTERVAL, e.to_string())
                })?;
        }

        let config = Self {
            jwt,
            lifetimes,
            sweep,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.jwt.validate()?;
        self.lifetimes.validate()?;
        if self.sweep.enabled && self.sweep.interval_seconds == 0 {
            return Err(ConfigError::invalid(ENV_SWEEP_INTERVAL, "must be greater than zero"));
        }
        Ok(())
    }
}

fn default_algorithm() -> String {
    String::from("HS256")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn full_env() -> HashMap<&'static str, String> {
        HashMap::from([
            (ENV_SECRET, "0123456789abcdef0123456789abcdef".to_string()),
            (ENV_ISSUER, "kids-meal".to_string()),
            (ENV_AUDIENCE, "kids-meal-app".to_string()),
            (ENV_ACCESS_EXPIRY, "900".to_string()),
            (ENV_REFRESH_EXPIRY, "86400".to_string()),
            (ENV_GRACE_PERIOD, "3600".to_string()),
            (ENV_FAMILY_RETENTION, "86400".to_string()),
        ])
    }

    fn load(env: &HashMap<&'static str, String>) -> Result<AuthConfig, ConfigError> {
        AuthConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_lifetime_config_default() {
        let config = TokenLifetimeConfig::default();
        assert_eq!(config.access_token_expiry, 3600);
        assert_eq!(config.refresh_token_expiry, 86400);
        assert_eq!(config.issuance_grace_period, 3600);
        assert_eq!(config.family_retention, 86400);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_lifetime_config_builder() {
        let config = TokenLifetimeConfig::default()
            .with_access_expiry_minutes(15)
            .with_refresh_expiry_hours(48)
            .with_grace_period_minutes(5)
            .with_family_retention_hours(12);

        assert_eq!(config.access_token_expiry, 900);
        assert_eq!(config.refresh_token_expiry, 172800);
        assert_eq!(config.issuance_grace_period, 300);
        assert_eq!(config.family_retention, 43200);
    }

    #[test]
    fn test_default_secret_is_flagged() {
        assert!(JwtConfig::default().is_using_default_secret());
        assert!(!JwtConfig::new("another-secret-that-is-long-enough!", "i", "a")
            .is_using_default_secret());
    }

    #[test]
    fn test_from_lookup_complete() {
        let config = load(&full_env()).unwrap();
        assert_eq!(config.jwt.issuer, "kids-meal");
        assert_eq!(config.jwt.audience, "kids-meal-app");
        assert_eq!(config.lifetimes.access_token_expiry, 900);
        assert!(config.sweep.enabled);
    }

    #[test]
    fn test_from_lookup_missing_values_are_fatal() {
        for key in [
            ENV_SECRET,
            ENV_ISSUER,
            ENV_AUDIENCE,
            ENV_ACCESS_EXPIRY,
            ENV_REFRESH_EXPIRY,
            ENV_GRACE_PERIOD,
            ENV_FAMILY_RETENTION,
        ] {
            let mut env = full_env();
            env.remove(key);
            let err = load(&env).unwrap_err();
            assert_eq!(err, ConfigError::missing(key), "key {}", key);
        }
    }

    #[test]
    fn test_from_lookup_rejects_bad_durations() {
        let mut env = full_env();
        env.insert(ENV_GRACE_PERIOD, "soon".to_string());
        assert!(matches!(load(&env), Err(ConfigError::Invalid { .. })));

        let mut env = full_env();
        env.insert(ENV_REFRESH_EXPIRY, "0".to_string());
        assert_eq!(load(&env).unwrap_err().key(), ENV_REFRESH_EXPIRY);
    }

    #[test]
    fn test_from_lookup_rejects_oversized_durations() {
        let mut env = full_env();
        env.insert(ENV_REFRESH_EXPIRY, "1000000000000000".to_string());
        let err = load(&env).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
        assert_eq!(err.key(), ENV_REFRESH_EXPIRY);

        let mut env = full_env();
        env.insert(ENV_FAMILY_RETENTION, (MAX_LIFETIME_SECONDS + 1).to_string());
        assert_eq!(load(&env).unwrap_err().key(), ENV_FAMILY_RETENTION);

        let mut env = full_env();
        env.insert(ENV_ACCESS_EXPIRY, MAX_LIFETIME_SECONDS.to_string());
        assert!(load(&env).is_ok());
    }

    #[test]
    fn test_builder_overflow_is_rejected() {
        let config = TokenLifetimeConfig::default().with_refresh_expiry_hours(i64::MAX);
        assert_eq!(config.refresh_token_expiry, i64::MAX);
        assert_eq!(config.validate().unwrap_err().key(), ENV_REFRESH_EXPIRY);

        let config = TokenLifetimeConfig::default().with_grace_period_minutes(i64::MAX / 2);
        assert_eq!(config.validate().unwrap_err().key(), ENV_GRACE_PERIOD);
    }

    #[test]
    fn test_short_secret_rejected() {
        let mut env = full_env();
        env.insert(ENV_SECRET, "short".to_string());
        assert!(matches!(load(&env), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_sweep_overrides() {
        let mut env = full_env();
        env.insert(ENV_SWEEP_ENABLED, "false".to_string());
        env.insert(ENV_SWEEP_INTERVAL, "120".to_string());
        let config = load(&env).unwrap();
        assert!(!config.sweep.enabled);
        assert_eq!(config.sweep.interval_seconds, 120);
    }
}
