//! Unit tests for token entities

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::domain::entities::principal::Principal;
use crate::domain::entities::token::{AccessTokenClaims, TokenFamilyEntry, TokenPair};

#[test]
fn test_access_token_claims_for_principal() {
    let principal = Principal::new(Uuid::new_v4(), "parent@example.com");
    let now = Utc::now();
    let claims = AccessTokenClaims::for_principal(
        &principal,
        "kids-meal",
        "kids-meal-app",
        now,
        Duration::minutes(60),
    );

    assert_eq!(claims.sub, principal.id.to_string());
    assert_eq!(claims.email, "parent@example.com");
    assert_eq!(claims.iss, "kids-meal");
    assert_eq!(claims.aud, "kids-meal-app");
    assert_eq!(claims.exp - claims.iat, 3600);
    assert_eq!(claims.user_id().unwrap(), principal.id);
    assert!(!claims.is_expired());
}

#[test]
fn test_claims_have_unique_ids() {
    let principal = Principal::new(Uuid::new_v4(), "parent@example.com");
    let now = Utc::now();
    let first = AccessTokenClaims::for_principal(&principal, "i", "a", now, Duration::minutes(1));
    let second = AccessTokenClaims::for_principal(&principal, "i", "a", now, Duration::minutes(1));

    assert_ne!(first.jti, second.jti);
}

#[test]
fn test_claims_expiration() {
    let principal = Principal::new(Uuid::new_v4(), "parent@example.com");
    let mut claims = AccessTokenClaims::for_principal(
        &principal,
        "i",
        "a",
        Utc::now(),
        Duration::minutes(1),
    );

    claims.exp = Utc::now().timestamp() - 1;
    assert!(claims.is_expired());
}

#[test]
fn test_claims_invalid_subject() {
    let principal = Principal::new(Uuid::new_v4(), "parent@example.com");
    let mut claims = AccessTokenClaims::for_principal(
        &principal,
        "i",
        "a",
        Utc::now(),
        Duration::minutes(1),
    );

    claims.sub = "42".to_string();
    assert!(claims.user_id().is_err());
}

#[test]
fn test_token_pair_serialization() {
    let pair = TokenPair::new(
        "access".to_string(),
        "refresh".to_string(),
        3600,
        Utc::now() + Duration::days(1),
    );

    let json = serde_json::to_value(&pair).unwrap();
    assert_eq!(json["access_token"], "access");
    assert_eq!(json["refresh_token"], "refresh");
    assert_eq!(json["access_expires_in"], 3600);
    assert!(json["refresh_expires_at"].is_string());
}

#[test]
fn test_family_entry_prunable() {
    let revoked_at = Utc::now() - Duration::hours(25);
    let entry = TokenFamilyEntry::new(Uuid::new_v4(), "old-token", revoked_at);

    assert!(entry.is_prunable(Utc::now() - Duration::hours(24)));
    assert!(entry.is_prunable(revoked_at));
    assert!(!entry.is_prunable(revoked_at - Duration::seconds(1)));
}
