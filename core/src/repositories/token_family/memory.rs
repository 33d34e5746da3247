//! In-memory implementation of TokenFamilyRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::token::TokenFamilyEntry;
use crate::errors::DomainError;

use super::r#trait::TokenFamilyRepository;

/// Token family store held in process memory, keyed by user id
#[derive(Clone, Default)]
pub struct InMemoryTokenFamilyRepository {
    families: Arc<RwLock<HashMap<Uuid, Vec<TokenFamilyEntry>>>>,
}

impl InMemoryTokenFamilyRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries currently held for `user_id`, regardless of age
    pub async fn family_size(&self, user_id: Uuid) -> usize {
        let families = self.families.read().await;
        families.get(&user_id).map_or(0, Vec::len)
    }
}

#[async_trait]
impl TokenFamilyRepository for InMemoryTokenFamilyRepository {
    async fn append(
        &self,
        user_id: Uuid,
        token: &str,
        revoked_at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        let mut families = self.families.write().await;
        families
            .entry(user_id)
            .or_default()
            .push(TokenFamilyEntry::new(user_id, token, revoked_at));
        Ok(())
    }

    async fn list_active(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<Vec<TokenFamilyEntry>, DomainError> {
        let families = self.families.read().await;
        let mut entries: Vec<TokenFamilyEntry> = families
            .get(&user_id)
            .map(|family| {
                family
                    .iter()
                    .filter(|entry| entry.revoked_at > since)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        entries.sort_by_key(|entry| entry.revoked_at);
        Ok(entries)
    }

    async fn prune_older_than(&self, user_id: Uuid, cutoff: DateTime<Utc>) -> Result<usize, DomainError> {
        let mut families = self.families.write().await;
        let Some(family) = families.get_mut(&user_id) else {
            return Ok(0);
        };

        let initial_count = family.len();
        family.retain(|entry| !entry.is_prunable(cutoff));
        let removed = initial_count - family.len();
        if family.is_empty() {
            families.remove(&user_id);
        }
        Ok(removed)
    }

    async fn prune_all_older_than(&self, cutoff: DateTime<Utc>) -> Result<usize, DomainError> {
        let mut families = self.families.write().await;
        let mut removed = 0;

        for family in families.values_mut() {
            let initial_count = family.len();
            family.retain(|entry| !entry.is_prunable(cutoff));
            removed += initial_count - family.len();
        }
        families.retain(|_, family| !family.is_empty());

        Ok(removed)
    }

    async fn clear_all(&self, user_id: Uuid) -> Result<usize, DomainError> {
        let mut families = self.families.write().await;
        Ok(families.remove(&user_id).map_or(0, |family| family.len()))
    }
}
