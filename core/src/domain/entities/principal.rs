//! Identity principal: the authenticated account as seen by the token engine.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of a principal's current refresh token at a given instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshTokenState {
    /// Logged out, no refresh token is active
    None,
    /// Current and unexpired
    Active,
    /// Past its expiration but issued within the grace period
    GraceExpired,
    /// Past its expiration and outside the grace period
    Expired,
}

/// Authenticated account record owned by the credential store
///
/// Exactly one principal exists per account. `refresh_token` is `None` when
/// the account is logged out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Unique identifier for the user
    pub id: Uuid,

    /// Email address, used as the access token name claim
    pub email: String,

    /// Currently active refresh token, if any
    pub refresh_token: Option<String>,

    /// When the current refresh token was issued (or last rotated)
    pub refresh_token_issued_at: DateTime<Utc>,

    /// When the current refresh token stops being accepted
    pub refresh_token_expires_at: DateTime<Utc>,
}

impl Principal {
    /// Creates a logged-out principal
    pub fn new(id: Uuid, email: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
            refresh_token: None,
            refresh_token_issued_at: Self::signed_out_timestamp(),
            refresh_token_expires_at: Self::signed_out_timestamp(),
        }
    }

    /// Sentinel written to both refresh token timestamps on logout (the Unix epoch)
    pub fn signed_out_timestamp() -> DateTime<Utc> {
        DateTime::<Utc>::default()
    }

    /// Whether an account has a refresh token at all
    pub fn is_signed_in(&self) -> bool {
        self.refresh_token.as_deref().is_some_and(|token| !token.is_empty())
    }

    /// Whether `token` is the principal's current refresh token
    pub fn holds_refresh_token(&self, token: &str) -> bool {
        self.is_signed_in() && self.refresh_token.as_deref() == Some(token)
    }

    pub fn is_refresh_token_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.refresh_token_expires_at <= now
    }

    pub fn was_refresh_token_recently_issued_at(&self, now: DateTime<Utc>, grace: Duration) -> bool {
        // Past the representable range counts as still recent
        self.refresh_token_issued_at
            .checked_add_signed(grace)
            .map_or(true, |until| until > now)
    }

    /// Expired yet issued within `grace`: still honoured once, with its expiration extended
    pub fn is_eligible_for_grace_extension_at(&self, now: DateTime<Utc>, grace: Duration) -> bool {
        self.is_refresh_token_expired_at(now) && self.was_refresh_token_recently_issued_at(now, grace)
    }

    /// Classifies the current refresh token at `now`
    pub fn refresh_token_state_at(&self, now: DateTime<Utc>, grace: Duration) -> RefreshTokenState {
        if !self.is_signed_in() {
            RefreshTokenState::None
        } else if !self.is_refresh_token_expired_at(now) {
            RefreshTokenState::Active
        } else if self.was_refresh_token_recently_issued_at(now, grace) {
            RefreshTokenState::GraceExpired
        } else {
            RefreshTokenState::Expired
        }
    }
}
