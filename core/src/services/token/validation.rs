//! Refresh token validation decision

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::domain::entities::principal::Principal;
use crate::domain::entities::token::TokenFamilyEntry;
use crate::errors::TokenError;

/// Why a presented refresh token was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTokenRejection {
    /// The token was already retired into the family
    ReuseDetected,
    /// The token is not the principal's current token
    UserMismatch,
    /// Past expiration and outside the issuance grace period
    Expired,
}

impl From<RefreshTokenRejection> for TokenError {
    fn from(rejection: RefreshTokenRejection) -> Self {
        match rejection {
            RefreshTokenRejection::ReuseDetected => TokenError::ReuseDetected,
            RefreshTokenRejection::UserMismatch => TokenError::UserMismatch,
            RefreshTokenRejection::Expired => TokenError::Expired,
        }
    }
}

/// Proof that a refresh token passed validation
///
/// Only validation can build one, and rotation only accepts one, so rotation
/// cannot run on an unchecked token. Grace eligibility is decided once here
/// and carried into rotation unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRefreshToken {
    user_id: Uuid,
    token: String,
    grace_extended: bool,
    validated_at: DateTime<Utc>,
}

impl ValidatedRefreshToken {
    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Expired but recently issued: rotation extends the expiration
    pub fn is_grace_extended(&self) -> bool {
        self.grace_extended
    }

    pub fn validated_at(&self) -> DateTime<Utc> {
        self.validated_at
    }
}

/// Outcome of validating a presented refresh token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshTokenValidation {
    Valid(ValidatedRefreshToken),
    Rejected(RefreshTokenRejection),
}

impl RefreshTokenValidation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    pub fn rejection(&self) -> Option<RefreshTokenRejection> {
        match self {
            Self::Valid(_) => None,
            Self::Rejected(rejection) => Some(*rejection),
        }
    }

    pub fn into_result(self) -> Result<ValidatedRefreshToken, RefreshTokenRejection> {
        match self {
            Self::Valid(validated) => Ok(validated),
            Self::Rejected(rejection) => Err(rejection),
        }
    }
}

/// Decides whether `presented` may be exchanged, at instant `now`
///
/// Pure: reads the principal and family, mutates nothing. The family check
/// runs first so a replayed token is caught even after the active token
/// has moved on.
pub fn evaluate_refresh_token(
    presented: &str,
    principal: &Principal,
    family: &[TokenFamilyEntry],
    grace_period: Duration,
    now: DateTime<Utc>,
) -> RefreshTokenValidation {
    if family.iter().any(|entry| entry.token == presented) {
        return RefreshTokenValidation::Rejected(RefreshTokenRejection::ReuseDetected);
    }

    if !principal.holds_refresh_token(presented) {
        return RefreshTokenValidation::Rejected(RefreshTokenRejection::UserMismatch);
    }

    let expired = principal.is_refresh_token_expired_at(now);
    let recently_issued = principal.was_refresh_token_recently_issued_at(now, grace_period);
    if expired && !recently_issued {
        return RefreshTokenValidation::Rejected(RefreshTokenRejection::Expired);
    }

    RefreshTokenValidation::Valid(ValidatedRefreshToken {
        user_id: principal.id,
        token: presented.to_string(),
        grace_extended: expired && recently_issued,
        validated_at: now,
    })
}
