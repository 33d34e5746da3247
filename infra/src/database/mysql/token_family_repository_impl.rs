//! MySQL implementation of the TokenFamilyRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use tl_core::domain::entities::token::TokenFamilyEntry;
use tl_core::errors::DomainError;
use tl_core::repositories::TokenFamilyRepository;

/// MySQL implementation of TokenFamilyRepository
///
/// One row per retired token in `refresh_token_families`; reads and prunes
/// go through the `(user_id, revoked_at)` index.
pub struct MySqlTokenFamilyRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlTokenFamilyRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_entry(row: &sqlx::mysql::MySqlRow) -> Result<TokenFamilyEntry, DomainError> {
        let user_id: String = row
            .try_get("user_id")
            .map_err(|e| DomainError::storage(format!("Failed to get user_id: {}", e)))?;
        let token: String = row
            .try_get("token")
            .map_err(|e| DomainError::storage(format!("Failed to get token: {}", e)))?;
        let revoked_at: DateTime<Utc> = row
            .try_get("revoked_at")
            .map_err(|e| DomainError::storage(format!("Failed to get revoked_at: {}", e)))?;

        let user_id = Uuid::parse_str(&user_id)
            .map_err(|e| DomainError::storage(format!("Invalid user UUID: {}", e)))?;
        Ok(TokenFamilyEntry::new(user_id, token, revoked_at))
    }
}

#[async_trait]
impl TokenFamilyRepository for MySqlTokenFamilyRepository {
    async fn append(
        &self,
        user_id: Uuid,
        token: &str,
        revoked_at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        sqlx::query("INSERT INTO refresh_token_families (user_id, token, revoked_at) VALUES (?, ?, ?)")
            .bind(user_id.to_string())
            .bind(token)
            .bind(revoked_at)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to append family entry: {}", e)))?;

        Ok(())
    }

    async fn list_active(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<Vec<TokenFamilyEntry>, DomainError> {
        let query = r#"
            SELECT user_id, token, revoked_at
            FROM refresh_token_families
            WHERE user_id = ? AND revoked_at > ?
            ORDER BY revoked_at ASC, id ASC
        "#;

        let rows = sqlx::query(query)
            .bind(user_id.to_string())
            .bind(since)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to list family entries: {}", e)))?;

        rows.iter().map(Self::row_to_entry).collect()
    }

    async fn prune_older_than(
        &self,
        user_id: Uuid,
        cutoff: DateTime<Utc>,
    ) -> Result<usize, DomainError> {
        let result = sqlx::query(
            "DELETE FROM refresh_token_families WHERE user_id = ? AND revoked_at <= ?",
        )
        .bind(user_id.to_string())
        .bind(cutoff)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to prune family: {}", e)))?;

        Ok(result.rows_affected() as usize)
    }

    async fn prune_all_older_than(&self, cutoff: DateTime<Utc>) -> Result<usize, DomainError> {
        let result = sqlx::query("DELETE FROM refresh_token_families WHERE revoked_at <= ?")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to sweep families: {}", e)))?;

        Ok(result.rows_affected() as usize)
    }

    async fn clear_all(&self, user_id: Uuid) -> Result<usize, DomainError> {
        let result = sqlx::query("DELETE FROM refresh_token_families WHERE user_id = ?")
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to clear family: {}", e)))?;

        Ok(result.rows_affected() as usize)
    }
}
