use uuid::Uuid;

use shared_models::auth::{AuthUser, JwtClaims, Role};
use shared_utils::jwt::{claims_for, issue_token, validate_token};
use shared_utils::password::{hash_password, verify_password};

const SECRET: &str = "test-secret-key";

fn test_user() -> AuthUser {
    AuthUser {
        id: Uuid::new_v4(),
        email: "pat@example.com".to_string(),
        role: Role::Patient,
    }
}

#[test]
fn token_roundtrip_preserves_identity() {
    let user = test_user();
    let token = issue_token(&claims_for(&user, 3600), SECRET).unwrap();

    let validated = validate_token(&token, SECRET).unwrap();
    assert_eq!(validated.id, user.id);
    assert_eq!(validated.email, user.email);
    assert_eq!(validated.role, Role::Patient);
}

#[test]
fn token_rejected_with_wrong_secret() {
    let user = test_user();
    let token = issue_token(&claims_for(&user, 3600), SECRET).unwrap();

    let err = validate_token(&token, "other-secret").unwrap_err();
    assert_eq!(err, "Invalid token signature");
}

#[test]
fn expired_token_rejected() {
    let user = test_user();
    let now = chrono::Utc::now().timestamp() as u64;
    let claims = JwtClaims {
        sub: user.id,
        email: user.email.clone(),
        role: user.role,
        iat: Some(now - 7200),
        exp: Some(now - 3600),
    };
    let token = issue_token(&claims, SECRET).unwrap();

    let err = validate_token(&token, SECRET).unwrap_err();
    assert_eq!(err, "Token expired");
}

#[test]
fn garbage_token_rejected() {
    assert!(validate_token("not-a-token", SECRET).is_err());
    assert!(validate_token("a.b", SECRET).is_err());
    assert!(validate_token("", SECRET).is_err());
}

#[test]
fn empty_secret_refuses_both_ways() {
    let user = test_user();
    assert!(issue_token(&claims_for(&user, 60), "").is_err());
    assert!(validate_token("a.b.c", "").is_err());
}

#[test]
fn password_hash_roundtrip() {
    let hash = hash_password("hunter2").unwrap();
    assert_ne!(hash, "hunter2");
    assert!(verify_password("hunter2", &hash));
    assert!(!verify_password("hunter3", &hash));
}

#[test]
fn verify_rejects_malformed_hash() {
    assert!(!verify_password("hunter2", "not-a-phc-hash"));
}
