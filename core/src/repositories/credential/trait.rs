//! Credential repository trait defining the principal's refresh token state.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::principal::Principal;
use crate::errors::DomainError;

/// Repository trait for the per-principal active refresh token
///
/// Exactly one record exists per account. Writes are narrow field-level
/// updates; no generic mutate-by-callback operation is offered.
///
/// # Concurrency
/// `replace` must be an atomic compare-and-swap against the stored active
/// token so that two rotations of the same token cannot both succeed.
#[async_trait]
pub trait CredentialRepository: Send + Sync {
    /// Fetch a principal by user id
    ///
    /// # Returns
    /// * `Ok(Some(Principal))` - Principal found
    /// * `Ok(None)` - No such user
    /// * `Err(DomainError)` - Store failure
    async fn get(&self, user_id: Uuid) -> Result<Option<Principal>, DomainError>;

    /// Unconditionally set the active refresh token and its timestamps
    ///
    /// Used at login, where any previous session is superseded.
    ///
    /// # Returns
    /// * `Ok(())` - Token stored
    /// * `Err(DomainError::NotFound)` - No such user
    /// * `Err(DomainError)` - Store failure
    async fn update(
        &self,
        user_id: Uuid,
        refresh_token: &str,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<(), DomainError>;

    /// Set the active refresh token only if the stored one still equals `expected`
    ///
    /// # Returns
    /// * `Ok(true)` - Swap performed
    /// * `Ok(false)` - Stored token no longer equals `expected` (lost race)
    /// * `Err(DomainError)` - Store failure
    async fn replace(
        &self,
        user_id: Uuid,
        expected: &str,
        refresh_token: &str,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<bool, DomainError>;

    /// Clear the active refresh token and reset both timestamps to the signed-out sentinel
    ///
    /// # Returns
    /// * `Ok(())` - Cleared (also when already signed out)
    /// * `Err(DomainError::NotFound)` - No such user
    /// * `Err(DomainError)` - Store failure
    async fn clear(&self, user_id: Uuid) -> Result<(), DomainError>;
}

#[async_trait]
impl<T: CredentialRepository + ?Sized> CredentialRepository for Arc<T> {
    async fn get(&self, user_id: Uuid) -> Result<Option<Principal>, DomainError> {
        (**self).get(user_id).await
    }

    async fn update(
        &self,
        user_id: Uuid,
        refresh_token: &str,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        (**self).update(user_id, refresh_token, issued_at, expires_at).await
    }

    async fn replace(
        &self,
        user_id: Uuid,
        expected: &str,
        refresh_token: &str,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        (**self)
            .replace(user_id, expected, refresh_token, issued_at, expires_at)
            .await
    }

    async fn clear(&self, user_id: Uuid) -> Result<(), DomainError> {
        (**self).clear(user_id).await
    }
}
