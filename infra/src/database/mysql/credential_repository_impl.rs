//! MySQL implementation of the CredentialRepository trait.
//!
//! The credential state lives in three columns of the `users` row. Rotation
//! locks that row, compares the stored token and writes the new one in a
//! single transaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use tl_core::domain::entities::principal::Principal;
use tl_core::errors::DomainError;
use tl_core::repositories::CredentialRepository;

/// MySQL implementation of CredentialRepository
pub struct MySqlCredentialRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlCredentialRepository {
    /// Create a new MySQL credential repository
    ///
    /// # Arguments
    /// * `pool` - MySQL connection pool from SQLx
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Register a principal row (used by account creation and tests)
    pub async fn insert(&self, principal: &Principal) -> Result<(), DomainError> {
        let query = r#"
            INSERT INTO users (
                id, email, refresh_token, refresh_token_issued_at, refresh_token_expires_at
            ) VALUES (?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(principal.id.to_string())
            .bind(&principal.email)
            .bind(principal.refresh_token.as_deref())
            .bind(principal.refresh_token_issued_at)
            .bind(principal.refresh_token_expires_at)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to insert user: {}", e)))?;

        Ok(())
    }

    /// Convert database row to Principal entity
    fn row_to_principal(row: &sqlx::mysql::MySqlRow) -> Result<Principal, DomainError> {
        let id: String = row
            .try_get("id")
            .map_err(|e| DomainError::storage(format!("Failed to get id: {}", e)))?;

        Ok(Principal {
            id: Uuid::parse_str(&id)
                .map_err(|e| DomainError::storage(format!("Invalid user UUID: {}", e)))?,
            email: row
                .try_get("email")
                .map_err(|e| DomainError::storage(format!("Failed to get email: {}", e)))?,
            refresh_token: row
                .try_get("refresh_token")
                .map_err(|e| DomainError::storage(format!("Failed to get refresh_token: {}", e)))?,
            refresh_token_issued_at: row
                .try_get::<DateTime<Utc>, _>("refresh_token_issued_at")
                .map_err(|e| {
                    DomainError::storage(format!("Failed to get refresh_token_issued_at: {}", e))
                })?,
            refresh_token_expires_at: row
                .try_get::<DateTime<Utc>, _>("refresh_token_expires_at")
                .map_err(|e| {
                    DomainError::storage(format!("Failed to get refresh_token_expires_at: {}", e))
                })?,
        })
    }

    async fn ensure_exists(&self, user_id: Uuid) -> Result<(), DomainError> {
        let exists: i64 = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = ?)")
            .bind(user_id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to check user existence: {}", e)))?;

        if exists == 1 {
            Ok(())
        } else {
            Err(not_found(user_id))
        }
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
impl CredentialRepository for MySqlCredentialRepository {
    async fn get(&self, user_id: Uuid) -> Result<Option<Principal>, DomainError> {
        let query = r#"
            SELECT id, email, refresh_token, refresh_token_issued_at, refresh_token_expires_at
            FROM users
            WHERE id = ?
            LIMIT 1
        "#;

        let result = sqlx::query(query)
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to find user: {}", e)))?;

        result.as_ref().map(Self::row_to_principal).transpose()
    }

    async fn update(
        &self,
        user_id: Uuid,
        refresh_token: &str,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        ensure_token(refresh_token)?;

        let query = r#"
            UPDATE users
            SET refresh_token = ?, refresh_token_issued_at = ?, refresh_token_expires_at = ?
            WHERE id = ?
        "#;

        let result = sqlx::query(query)
            .bind(refresh_token)
            .bind(issued_at)
            .bind(expires_at)
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to update refresh token: {}", e)))?;

        if result.rows_affected() == 0 {
            self.ensure_exists(user_id).await?;
        }
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

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to begin transaction: {}", e)))?;

        let current: Option<Option<String>> =
            sqlx::query_scalar("SELECT refresh_token FROM users WHERE id = ? FOR UPDATE")
                .bind(user_id.to_string())
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| DomainError::storage(format!("Failed to lock user row: {}", e)))?;

        let Some(current) = current else {
            return Err(not_found(user_id));
        };
        if current.as_deref() != Some(expected) {
            // Dropping the transaction rolls it back and releases the lock
            return Ok(false);
        }

        let result = sqlx::query(
            r#"
            UPDATE users
            SET refresh_token = ?, refresh_token_issued_at = ?, refresh_token_expires_at = ?
            WHERE id = ? AND refresh_token = ?
            "#,
        )
        .bind(refresh_token)
        .bind(issued_at)
        .bind(expires_at)
        .bind(user_id.to_string())
        .bind(expected)
        .execute(&mut *tx)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to rotate refresh token: {}", e)))?;

        tx.commit()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to commit rotation: {}", e)))?;

        Ok(result.rows_affected() == 1)
    }

    async fn clear(&self, user_id: Uuid) -> Result<(), DomainError> {
        let query = r#"
            UPDATE users
            SET refresh_token = NULL, refresh_token_issued_at = ?, refresh_token_expires_at = ?
            WHERE id = ?
        "#;

        let result = sqlx::query(query)
            .bind(Principal::signed_out_timestamp())
            .bind(Principal::signed_out_timestamp())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to clear refresh token: {}", e)))?;

        if result.rows_affected() == 0 {
            self.ensure_exists(user_id).await?;
        }
        Ok(())
    }
}
