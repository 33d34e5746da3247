//! Unit tests for the in-memory credential repository

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::domain::entities::principal::Principal;
use crate::errors::DomainError;
use crate::repositories::credential::{CredentialRepository, InMemoryCredentialRepository};

async fn repo_with_user() -> (InMemoryCredentialRepository, Uuid) {
    let repo = InMemoryCredentialRepository::new();
    let user_id = Uuid::new_v4();
    repo.insert(Principal::new(user_id, "parent@example.com")).await;
    (repo, user_id)
}

#[tokio::test]
async fn test_get_missing_user() {
    let repo = InMemoryCredentialRepository::new();
    assert!(repo.get(Uuid::new_v4()).await.unwrap().is_none());
    assert!(repo.is_empty().await);
}

#[tokio::test]
async fn test_update_sets_all_fields() {
    let (repo, user_id) = repo_with_user().await;
    let issued_at = Utc::now();
    let expires_at = issued_at + Duration::days(1);

    repo.update(user_id, "token-1", issued_at, expires_at).await.unwrap();

    let principal = repo.get(user_id).await.unwrap().unwrap();
    assert_eq!(principal.refresh_token.as_deref(), Some("token-1"));
    assert_eq!(principal.refresh_token_issued_at, issued_at);
    assert_eq!(principal.refresh_token_expires_at, expires_at);
}

#[tokio::test]
async fn test_update_unknown_user() {
    let repo = InMemoryCredentialRepository::new();
    let result = repo
        .update(Uuid::new_v4(), "token", Utc::now(), Utc::now())
        .await;
    assert!(matches!(result, Err(DomainError::NotFound { .. })));
}

#[tokio::test]
async fn test_update_rejects_empty_token() {
    let (repo, user_id) = repo_with_user().await;
    let result = repo.update(user_id, "", Utc::now(), Utc::now()).await;
    assert!(matches!(result, Err(DomainError::Validation { .. })));
}

#[tokio::test]
async fn test_replace_compares_current_token() {
    let (repo, user_id) = repo_with_user().await;
    let now = Utc::now();
    repo.update(user_id, "token-1", now, now + Duration::days(1)).await.unwrap();

    assert!(!repo
        .replace(user_id, "stale", "token-2", now, now + Duration::days(1))
        .await
        .unwrap());
    assert!(repo
        .replace(user_id, "token-1", "token-2", now, now + Duration::days(1))
        .await
        .unwrap());
    // Second swap against the same expected value loses
    assert!(!repo
        .replace(user_id, "token-1", "token-3", now, now + Duration::days(1))
        .await
        .unwrap());

    let principal = repo.get(user_id).await.unwrap().unwrap();
    assert_eq!(principal.refresh_token.as_deref(), Some("token-2"));
}

#[tokio::test]
async fn test_replace_when_signed_out() {
    let (repo, user_id) = repo_with_user().await;
    let swapped = repo
        .replace(user_id, "", "token-1", Utc::now(), Utc::now())
        .await
        .unwrap();
    assert!(!swapped);
}

#[tokio::test]
async fn test_clear_resets_to_sentinel() {
    let (repo, user_id) = repo_with_user().await;
    let now = Utc::now();
    repo.update(user_id, "token-1", now, now + Duration::days(1)).await.unwrap();

    repo.clear(user_id).await.unwrap();

    let principal = repo.get(user_id).await.unwrap().unwrap();
    assert!(principal.refresh_token.is_none());
    assert_eq!(principal.refresh_token_issued_at, Principal::signed_out_timestamp());
    assert!(principal.is_refresh_token_expired_at(now));
}
