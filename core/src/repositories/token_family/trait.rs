//! Token family repository trait defining retired refresh token history.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::token::TokenFamilyEntry;
use crate::errors::DomainError;

/// Repository trait for the per-user family of retired refresh tokens
///
/// The family is append-only apart from pruning: entries are added on every
/// rotation and removed only when they fall out of the retention window or
/// when the whole family is cleared (login, logout, reuse detection).
#[async_trait]
pub trait TokenFamilyRepository: Send + Sync {
    /// Record `token` as retired for `user_id` at `revoked_at`
    async fn append(
        &self,
        user_id: Uuid,
        token: &str,
        revoked_at: DateTime<Utc>,
    ) -> Result<(), DomainError>;

    /// List family entries revoked strictly after `since`, oldest first
    async fn list_active(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<Vec<TokenFamilyEntry>, DomainError>;

    /// Delete the user's entries revoked at or before `cutoff`
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of entries deleted
    async fn prune_older_than(&self, user_id: Uuid, cutoff: DateTime<Utc>) -> Result<usize, DomainError>;

    /// Delete every user's entries revoked at or before `cutoff`
    ///
    /// Used by the retention sweeper, never by the engine itself.
    async fn prune_all_older_than(&self, cutoff: DateTime<Utc>) -> Result<usize, DomainError>;

    /// Delete the user's whole family
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of entries deleted
    async fn clear_all(&self, user_id: Uuid) -> Result<usize, DomainError>;
}

#[async_trait]
impl<T: TokenFamilyRepository + ?Sized> TokenFamilyRepository for Arc<T> {
    async fn append(
        &self,
        user_id: Uuid,
        token: &str,
        revoked_at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        (**self).append(user_id, token, revoked_at).await
    }

    async fn list_active(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<Vec<TokenFamilyEntry>, DomainError> {
        (**self).list_active(user_id, since).await
    }

    async fn prune_older_than(&self, user_id: Uuid, cutoff: DateTime<Utc>) -> Result<usize, DomainError> {
        (**self).prune_older_than(user_id, cutoff).await
    }

    async fn prune_all_older_than(&self, cutoff: DateTime<Utc>) -> Result<usize, DomainError> {
        (**self).prune_all_older_than(cutoff).await
    }

    async fn clear_all(&self, user_id: Uuid) -> Result<usize, DomainError> {
        (**self).clear_all(user_id).await
    }
}
