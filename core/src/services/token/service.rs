//! Token lifecycle engine

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::entities::principal::Principal;
use crate::domain::entities::token::{AccessTokenClaims, TokenFamilyEntry, TokenPair};
use crate::errors::{DomainError, TokenError};
use crate::repositories::{CredentialRepository, TokenFamilyRepository};

use super::config::TokenServiceConfig;
use super::generator::{RefreshTokenGenerator, SecureRandomGenerator};
use super::signer::AccessTokenSigner;
use super::validation::{
    evaluate_refresh_token, RefreshTokenRejection, RefreshTokenValidation, ValidatedRefreshToken,
};

/// Issues, validates, rotates and revokes tokens for principals
///
/// Holds no session state of its own: everything lives in the credential
/// and token family stores, so any number of instances may serve requests
/// concurrently.
pub struct TokenLifecycleService<C: CredentialRepository, F: TokenFamilyRepository> {
    credentials: C,
    family: F,
    signer: AccessTokenSigner,
    generator: Box<dyn RefreshTokenGenerator>,
    config: TokenServiceConfig,
}

impl<C: CredentialRepository, F: TokenFamilyRepository> TokenLifecycleService<C, F> {
    /// Creates a new engine instance
    ///
    /// # Arguments
    ///
    /// * `credentials` - Store holding each principal's active refresh token
    /// * `family` - Store holding retired refresh tokens
    /// * `config` - Signing and lifetime configuration, validated here
    ///
    /// # Returns
    ///
    /// A new `TokenLifecycleService`, or `DomainError::Config` if any value is unusable
    pub fn new(credentials: C, family: F, config: TokenServiceConfig) -> Result<Self, DomainError> {
        config.validate()?;
        let signer = AccessTokenSigner::new(&config.jwt, config.access_token_lifetime())?;

        Ok(Self {
            credentials,
            family,
            signer,
            generator: Box::new(SecureRandomGenerator),
            config,
        })
    }

    /// Replaces the refresh token source
    pub fn with_generator(mut self, generator: impl RefreshTokenGenerator + 'static) -> Self {
        self.generator = Box::new(generator);
        self
    }

    pub fn credentials(&self) -> &C {
        &self.credentials
    }

    pub fn family(&self) -> &F {
        &self.family
    }

    pub fn config(&self) -> &TokenServiceConfig {
        &self.config
    }

    /// Starts a fresh session for an already authenticated principal
    ///
    /// Any previous session is superseded: the active token is overwritten
    /// and the principal's whole family is wiped.
    ///
    /// # Returns
    ///
    /// * `Ok(TokenPair)` - New access and refresh tokens
    /// * `Err(TokenError::InvalidPrincipal)` - Principal cannot be signed; nothing is persisted
    /// * `Err(DomainError)` - Store failure
    pub async fn issue_on_login(&self, principal: &Principal) -> Result<TokenPair, DomainError> {
        // Signing first keeps a malformed principal from touching the stores
        let access_token = self.signer.sign(principal)?;

        let refresh_token = self.generator.generate();
        let issued_at = Utc::now();
        let expires_at = expiry_after(issued_at, self.config.refresh_token_lifetime())?;

        self.credentials
            .update(principal.id, &refresh_token, issued_at, expires_at)
            .await?;
        let cleared = self.family.clear_all(principal.id).await?;

        info!(
            user_id = %principal.id,
            cleared_family_entries = cleared,
            "Issued tokens on login"
        );

        Ok(TokenPair::new(
            access_token,
            refresh_token,
            self.signer.expires_in(),
            expires_at,
        ))
    }

    /// Decides whether `presented` may be exchanged right now
    ///
    /// Never mutates state. A rejection is a value, not an error.
    pub fn validate_refresh_token(
        &self,
        presented: &str,
        principal: &Principal,
        family: &[TokenFamilyEntry],
    ) -> RefreshTokenValidation {
        self.validate_refresh_token_at(presented, principal, family, Utc::now())
    }

    /// Same as [`validate_refresh_token`](Self::validate_refresh_token) at a given instant
    pub fn validate_refresh_token_at(
        &self,
        presented: &str,
        principal: &Principal,
        family: &[TokenFamilyEntry],
        now: DateTime<Utc>,
    ) -> RefreshTokenValidation {
        evaluate_refresh_token(
            presented,
            principal,
            family,
            self.config.issuance_grace_period(),
            now,
        )
    }

    /// Loads the principal's family entries still inside the retention window
    pub async fn load_family(&self, user_id: Uuid) -> Result<Vec<TokenFamilyEntry>, DomainError> {
        let since = Utc::now() - self.config.family_retention();
        self.family.list_active(user_id, since).await
    }

    /// Replaces a validated refresh token with a new one
    ///
    /// The expiration only moves when the old token was grace-extended, and
    /// then to the old issuance time plus the refresh lifetime. Otherwise the
    /// existing expiration is kept so repeated rotation cannot outlive the
    /// original session.
    ///
    /// # Returns
    ///
    /// * `Ok(TokenPair)` - New access and refresh tokens
    /// * `Err(TokenError::UserMismatch)` - `validated` belongs to another principal
    /// * `Err(TokenError::ReuseDetected)` - A concurrent rotation already replaced the token
    /// * `Err(DomainError)` - Signing or store failure
    pub async fn rotate_refresh_token(
        &self,
        principal: &Principal,
        validated: ValidatedRefreshToken,
    ) -> Result<TokenPair, DomainError> {
        if validated.user_id() != principal.id {
            return Err(TokenError::UserMismatch.into());
        }

        let access_token = self.signer.sign(principal)?;

        let refresh_token = self.generator.generate();
        if refresh_token == validated.token() {
            return Err(TokenError::TokenGenerationFailed.into());
        }

        let now = Utc::now();
        let expires_at = if validated.is_grace_extended() {
            expiry_after(
                principal.refresh_token_issued_at,
                self.config.refresh_token_lifetime(),
            )?
        } else {
            principal.refresh_token_expires_at
        };

        self.family
            .append(principal.id, validated.token(), now)
            .await?;
        let pruned = self
            .family
            .prune_older_than(principal.id, now - self.config.family_retention())
            .await?;

        let swapped = self
            .credentials
            .replace(principal.id, validated.token(), &refresh_token, now, expires_at)
            .await?;
        if !swapped {
            warn!(
                target: "security",
                user_id = %principal.id,
                "Concurrent rotation lost the race for the same refresh token"
            );
            return Err(TokenError::ReuseDetected.into());
        }

        debug!(
            user_id = %principal.id,
            grace_extended = validated.is_grace_extended(),
            pruned_family_entries = pruned,
            "Rotated refresh token"
        );

        Ok(TokenPair::new(
            access_token,
            refresh_token,
            self.signer.expires_in(),
            expires_at,
        ))
    }

    /// Signs the principal out everywhere
    ///
    /// Clears the active token, resets both timestamps to the signed-out
    /// sentinel and wipes the whole family.
    pub async fn revoke_all(&self, principal: &Principal) -> Result<bool, DomainError> {
        self.credentials.clear(principal.id).await?;
        let cleared = self.family.clear_all(principal.id).await?;

        info!(
            user_id = %principal.id,
            cleared_family_entries = cleared,
            "Revoked all refresh tokens"
        );
        Ok(true)
    }

    /// Verifies an access token's signature, issuer and audience
    ///
    /// Expiry is not checked here; transports enforce it per request with
    /// [`AccessTokenClaims::is_expired`].
    pub fn verify_access_token(&self, token: &str) -> Result<AccessTokenClaims, DomainError> {
        self.signer.verify(token)
    }

    /// Exchanges an access/refresh token pair for a new one
    ///
    /// The access token may be expired; it only identifies the subject.
    /// A replayed refresh token revokes every session of the subject.
    ///
    /// # Returns
    ///
    /// * `Ok(TokenPair)` - Rotated tokens
    /// * `Err(TokenError::InvalidToken)` - Empty input or unverifiable access token
    /// * `Err(TokenError::ReuseDetected)` - Replay, or a concurrent refresh rotated
    ///   the same token first; all sessions are now revoked either way
    /// * `Err(TokenError::UserMismatch)` / `Err(TokenError::Expired)` - Rejected without mutation
    /// * `Err(DomainError::NotFound)` - The subject no longer exists
    pub async fn refresh_tokens(
        &self,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<TokenPair, DomainError> {
        if access_token.is_empty() || refresh_token.is_empty() {
            return Err(TokenError::InvalidToken.into());
        }

        let claims = self.signer.verify(access_token)?;
        let user_id = claims
            .user_id()
            .map_err(|_| DomainError::Token(TokenError::InvalidToken))?;

        let principal = self.find_principal(user_id).await?;
        let family = self.load_family(user_id).await?;

        match self.validate_refresh_token(refresh_token, &principal, &family) {
            RefreshTokenValidation::Valid(validated) => {
                match self.rotate_refresh_token(&principal, validated).await {
                    Err(DomainError::Token(TokenError::ReuseDetected)) => {
                        self.revoke_after_reuse(&principal).await
                    }
                    result => result,
                }
            }
            RefreshTokenValidation::Rejected(RefreshTokenRejection::ReuseDetected) => {
                self.revoke_after_reuse(&principal).await
            }
            RefreshTokenValidation::Rejected(rejection) => {
                debug!(user_id = %user_id, ?rejection, "Refresh token rejected");
                Err(TokenError::from(rejection).into())
            }
        }
    }

    /// Signs a user out by id
    pub async fn logout(&self, user_id: Uuid) -> Result<bool, DomainError> {
        let principal = self.find_principal(user_id).await?;
        self.revoke_all(&principal).await
    }

    async fn revoke_after_reuse(&self, principal: &Principal) -> Result<TokenPair, DomainError> {
        warn!(
            target: "security",
            user_id = %principal.id,
            "Refresh token reuse detected, revoking all sessions"
        );
        self.revoke_all(principal).await?;
        Err(TokenError::ReuseDetected.into())
    }

    async fn find_principal(&self, user_id: Uuid) -> Result<Principal, DomainError> {
        self.credentials
            .get(user_id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                resource: format!("user {}", user_id),
            })
    }
}

fn expiry_after(start: DateTime<Utc>, lifetime: Duration) -> Result<DateTime<Utc>, DomainError> {
    start
        .checked_add_signed(lifetime)
        .ok_or_else(|| {
            DomainError::internal(format!("refresh token expiry overflows after {}", start))
        })
}
