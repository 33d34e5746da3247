//! Token entities for JWT access tokens and opaque refresh tokens.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::principal::Principal;

/// Claims structure for the access token payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// Subject (user ID)
    pub sub: String,

    /// Name claim (the user's email address)
    pub email: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,

    /// JWT ID (unique identifier for the token)
    pub jti: String,
}

impl AccessTokenClaims {
    /// Creates claims for an access token issued to `principal` at `now`
    pub fn for_principal(
        principal: &Principal,
        issuer: &str,
        audience: &str,
        now: DateTime<Utc>,
        lifetime: Duration,
    ) -> Self {
        Self {
            sub: principal.id.to_string(),
            email: principal.email.clone(),
            iat: now.timestamp(),
            exp: (now + lifetime).timestamp(),
            iss: issuer.to_string(),
            aud: audience.to_string(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Checks if the claims have expired
    ///
    /// Verification deliberately does not enforce this; callers that gate
    /// ordinary requests on the access token must check it themselves.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Gets the user ID from the claims
    pub fn user_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sub)
    }
}

/// Token pair returned to the caller on login and refresh
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Signed access token
    pub access_token: String,

    /// Opaque refresh token
    pub refresh_token: String,

    /// Access token expiry time in seconds
    pub access_expires_in: i64,

    /// When the refresh token stops being accepted
    pub refresh_expires_at: DateTime<Utc>,
}

impl TokenPair {
    pub fn new(
        access_token: String,
        refresh_token: String,
        access_expires_in: i64,
        refresh_expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            access_expires_in,
            refresh_expires_at,
        }
    }
}

/// A retired refresh token kept in its owner's family for reuse detection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenFamilyEntry {
    /// Owner of the retired token
    pub user_id: Uuid,

    /// Retired refresh token value
    pub token: String,

    /// When the token was rotated out
    pub revoked_at: DateTime<Utc>,
}

impl TokenFamilyEntry {
    pub fn new(user_id: Uuid, token: impl Into<String>, revoked_at: DateTime<Utc>) -> Self {
        Self {
            user_id,
            token: token.into(),
            revoked_at,
        }
    }

    /// Entries revoked at or before `cutoff` are past the retention window
    pub fn is_prunable(&self, cutoff: DateTime<Utc>) -> bool {
        self.revoked_at <= cutoff
    }
}
