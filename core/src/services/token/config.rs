//! Configuration for the token service

use chrono::Duration;
use tl_shared::config::{AuthConfig, JwtConfig, TokenLifetimeConfig};
use tl_shared::ConfigError;

/// Configuration for the token service
///
/// Read once when the service is built; never re-read per call.
#[derive(Debug, Clone, Default)]
pub struct TokenServiceConfig {
    /// Signing key, issuer and audience
    pub jwt: JwtConfig,
    /// Token lifetimes and windows
    pub lifetimes: TokenLifetimeConfig,
}

impl TokenServiceConfig {
    pub fn new(jwt: JwtConfig, lifetimes: TokenLifetimeConfig) -> Self {
        Self { jwt, lifetimes }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.jwt.validate()?;
        self.lifetimes.validate()
    }

    pub fn access_token_lifetime(&self) -> Duration {
        Duration::seconds(self.lifetimes.access_token_expiry)
    }

    pub fn refresh_token_lifetime(&self) -> Duration {
        Duration::seconds(self.lifetimes.refresh_token_expiry)
    }

    pub fn issuance_grace_period(&self) -> Duration {
        Duration::seconds(self.lifetimes.issuance_grace_period)
    }

    pub fn family_retention(&self) -> Duration {
        Duration::seconds(self.lifetimes.family_retention)
    }
}

impl From<&AuthConfig> for TokenServiceConfig {
    fn from(config: &AuthConfig) -> Self {
        Self::new(config.jwt.clone(), config.lifetimes)
    }
}
