//! Unit tests for the in-memory token family repository

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::repositories::token_family::{InMemoryTokenFamilyRepository, TokenFamilyRepository};

#[tokio::test]
async fn test_append_and_list_in_order() {
    let repo = InMemoryTokenFamilyRepository::new();
    let user_id = Uuid::new_v4();
    let now = Utc::now();

    repo.append(user_id, "second", now - Duration::minutes(5)).await.unwrap();
    repo.append(user_id, "first", now - Duration::minutes(10)).await.unwrap();

    let entries = repo.list_active(user_id, now - Duration::hours(24)).await.unwrap();
    let tokens: Vec<&str> = entries.iter().map(|e| e.token.as_str()).collect();
    assert_eq!(tokens, vec!["first", "second"]);
    assert!(entries.iter().all(|e| e.user_id == user_id));
}

#[tokio::test]
async fn test_list_active_excludes_entries_outside_window() {
    let repo = InMemoryTokenFamilyRepository::new();
    let user_id = Uuid::new_v4();
    let now = Utc::now();
    let since = now - Duration::hours(24);

    repo.append(user_id, "old", since).await.unwrap();
    repo.append(user_id, "recent", now).await.unwrap();

    let entries = repo.list_active(user_id, since).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].token, "recent");
}

#[tokio::test]
async fn test_families_are_isolated_per_user() {
    let repo = InMemoryTokenFamilyRepository::new();
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    let now = Utc::now();

    repo.append(alice, "alice-token", now).await.unwrap();

    let bob_entries = repo.list_active(bob, now - Duration::hours(1)).await.unwrap();
    assert!(bob_entries.is_empty());
    assert_eq!(repo.clear_all(bob).await.unwrap(), 0);
    assert_eq!(repo.family_size(alice).await, 1);
}

#[tokio::test]
async fn test_prune_older_than() {
    let repo = InMemoryTokenFamilyRepository::new();
    let user_id = Uuid::new_v4();
    let now = Utc::now();
    let cutoff = now - Duration::hours(24);

    repo.append(user_id, "expired", cutoff - Duration::minutes(1)).await.unwrap();
    repo.append(user_id, "boundary", cutoff).await.unwrap();
    repo.append(user_id, "kept", now).await.unwrap();

    assert_eq!(repo.prune_older_than(user_id, cutoff).await.unwrap(), 2);
    assert_eq!(repo.family_size(user_id).await, 1);
    assert_eq!(repo.prune_older_than(Uuid::new_v4(), cutoff).await.unwrap(), 0);
}

#[tokio::test]
async fn test_prune_all_older_than() {
    let repo = InMemoryTokenFamilyRepository::new();
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    let now = Utc::now();
    let cutoff = now - Duration::hours(24);

    repo.append(alice, "a-old", cutoff - Duration::hours(1)).await.unwrap();
    repo.append(alice, "a-new", now).await.unwrap();
    repo.append(bob, "b-old", cutoff - Duration::hours(2)).await.unwrap();

    assert_eq!(repo.prune_all_older_than(cutoff).await.unwrap(), 2);
    assert_eq!(repo.family_size(alice).await, 1);
    assert_eq!(repo.family_size(bob).await, 0);
}

#[tokio::test]
async fn test_clear_all() {
    let repo = InMemoryTokenFamilyRepository::new();
    let user_id = Uuid::new_v4();
    let now = Utc::now();

    repo.append(user_id, "one", now).await.unwrap();
    repo.append(user_id, "two", now).await.unwrap();

    assert_eq!(repo.clear_all(user_id).await.unwrap(), 2);
    assert!(repo.list_active(user_id, now - Duration::hours(1)).await.unwrap().is_empty());
}
