
use tl_shared::config::{JwtConfig, TokenLifetimeConfig};

use crate::repositories::{InMemoryCredentialRepository, InMemoryTokenFamilyRepository};
use crate::services::token::{TokenLifecycleService, TokenServiceConfig};

pub(super) const TEST_SECRET: &str = "test-secret-key-for-unit-tests-32-bytes!";
pub(super) const TEST_ISSUER: &str = "kids-meal";
pub(super) const TEST_AUDIENCE: &str = "kids-meal-app";

pub(super) fn test_config() -> TokenServiceConfig {
    TokenServiceConfig::new(
        JwtConfig::new(TEST_SECRET, TEST_ISSUER, TEST_AUDIENCE),
        TokenLifetimeConfig::default(),
    )
}

pub(super) type TestService =
    TokenLifecycleService<InMemoryCredentialRepository, InMemoryTokenFamilyRepository>;

pub(super) fn test_service() -> TestService {
    TokenLifecycleService::new(
        InMemoryCredentialRepository::new(),
        InMemoryTokenFamilyRepository::new(),
        test_config(),
    )
    .unwrap()
}
