//! In-memory implementation of CredentialRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::principal::Principal;
use crate::errors::DomainError;

use super::r#trait::CredentialRepository;

/// Credential store held in process memory
///
/// Suitable for tests and single-process development setups. The write lock
/// makes `replace` a true compare-and-swap.
#[derive(Clone, Default)]
pub struct InMemoryCredentialRepository {
    principals: Arc<RwLock<HashMap<Uuid, Principal>>>,
}

impl InMemoryCredentialRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or overwrite) a principal record
    pub async fn insert(&self, principal: Principal) {
        let mut principals = self.principals.write().await;
        principals.insert(principal.id, principal);
    }

    pub async fn len(&self) -> usize {
        self.principals.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.principals.read().await.is_empty()
    }
}

fn not_found(user_id: Uuid) -> DomainError {
    DomainError::NotFound {
        resource: format!("user {}", user_id),
    }
}

fn ensure_token(refresh_token: &str) -> Result<(), DomainError> {
    if refresh_token.is_empty() {
        return Err(DomainError::Validation {
            message: "refresh token must not be empty".to_string(),
        });
    }
    Ok(())
}

#[async_trait]
impl CredentialRepository for InMemoryCredentialRepository {
    async fn get(&self, user_id: Uuid) -> Result<Option<Principal>, DomainError> {
        let principals = self.principals.read().await;
        Ok(principals.get(&user_id).cloned())
    }

    async fn update(
        &self,
        user_id: Uuid,
        refresh_token: &str,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        ensure_token(refresh_token)?;
        let mut principals = self.principals.write().await;
        let principal = principals.get_mut(&user_id).ok_or_else(|| not_found(user_id))?;

        principal.refresh_token = Some(refresh_token.to_string());
        principal.refresh_token_issued_at = issued_at;
        principal.refresh_token_expires_at = expires_at;
        Ok(())
    }

    async fn replace(
        &self,
        user_id: Uuid,
        expected: &str,
        refresh_token: &str,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        ensure_token(refresh_token)?;
        let mut principals = self.principals.write().await;
        let principal = principals.get_mut(&user_id).ok_or_else(|| not_found(user_id))?;

        if !principal.holds_refresh_token(expected) {
            return Ok(false);
        }

        principal.refresh_token = Some(refresh_token.to_string());
        principal.refresh_token_issued_at = issued_at;
        principal.refresh_token_expires_at = expires_at;
        Ok(true)
    }

    async fn clear(&self, user_id: Uuid) -> Result<(), DomainError> {
        let mut principals = self.principals.write().await;
        let principal = principals.get_mut(&user_id).ok_or_else(|| not_found(user_id))?;

        principal.refresh_token = None;
        principal.refresh_token_issued_at = Principal::signed_out_timestamp();
        principal.refresh_token_expires_at = Principal::signed_out_timestamp();
        Ok(())
    }
}
