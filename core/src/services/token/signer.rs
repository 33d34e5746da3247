//! Access token signing and verification

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tl_shared::config::JwtConfig;
use tl_shared::validation::validators;
use tracing::debug;

use crate::domain::entities::principal::Principal;
use crate::domain::entities::token::AccessTokenClaims;
use crate::errors::{DomainError, TokenError};

/// Stateless HS256 signer for access tokens
///
/// Verification checks signature, algorithm, issuer and audience but not
/// lifetime: an expired access token still identifies its subject during a
/// refresh exchange, where the refresh token is the real authorization gate.
#[derive(Clone)]
pub struct AccessTokenSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
    audience: String,
    lifetime: Duration,
}

impl AccessTokenSigner {
    /// Creates a signer from validated JWT configuration
    pub fn new(config: &JwtConfig, lifetime: Duration) -> Result<Self, DomainError> {
        config.validate()?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_audience(&[config.audience.as_str()]);
        validation.validate_exp = false;
        validation.validate_nbf = false;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            lifetime,
        })
    }

    /// Access token lifetime in seconds
    pub fn expires_in(&self) -> i64 {
        self.lifetime.num_seconds()
    }

    /// Signs an access token for `principal`
    ///
    /// # Errors
    /// * `TokenError::InvalidPrincipal` - the principal has no usable email
    pub fn sign(&self, principal: &Principal) -> Result<String, DomainError> {
        if !validators::not_empty(&principal.email) {
            return Err(TokenError::invalid_principal("email is empty").into());
        }
        if !validators::is_valid_email(&principal.email) {
            return Err(TokenError::invalid_principal("email is malformed").into());
        }

        let claims = AccessTokenClaims::for_principal(
            principal,
            &self.issuer,
            &self.audience,
            Utc::now(),
            self.lifetime,
        );
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|_| DomainError::Token(TokenError::TokenGenerationFailed))
    }

    /// Verifies an access token and returns its claims, ignoring expiry
    ///
    /// # Errors
    /// * `TokenError::InvalidToken` - bad signature, issuer, audience, algorithm
    ///   or an unusable subject
    pub fn verify(&self, token: &str) -> Result<AccessTokenClaims, DomainError> {
        let token_data = decode::<AccessTokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                debug!("Access token rejected: {:?}", e.kind());
                DomainError::Token(TokenError::InvalidToken)
            })?;

        let claims = token_data.claims;
        if claims.user_id().is_err() || !validators::not_empty(&claims.email) {
            return Err(TokenError::InvalidToken.into());
        }
        Ok(claims)
    }
}
