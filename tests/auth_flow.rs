//! End-to-end authentication flow integration tests
//!
//! Exercises the full credential-to-identity pipeline against the
//! in-memory store:
//! - login issues a token, resolve turns it back into the same identity
//! - provisioning is admin-gated with ordered duplicate checks
//! - role gates compose after session resolution

use casegate::auth::{
    self, create_user, login, password, require_role, resolve, AuthError, NewUserSpec,
    ProvisionError, Role, TokenSigner,
};
use casegate::store::{MemoryStore, User, UserStore};

async fn seeded_store() -> MemoryStore {
    let store = MemoryStore::new();
    store
        .insert(&User {
            username: "alice".into(),
            email: "alice@example.com".into(),
            password_hash: password::hash("alice-password").unwrap(),
            role: Role::Admin,
        })
        .await
        .unwrap();
    store
}

// =============================================================================
// Login -> Resolve
// =============================================================================

#[tokio::test]
async fn test_full_session_lifecycle() {
    let store = seeded_store().await;
    let signer = TokenSigner::new_dev();

    let token = login(&store, &signer, "alice", "alice-password")
        .await
        .unwrap();

    let identity = resolve(&store, &signer, &token).await.unwrap();
    assert_eq!(identity.username, "alice");
    assert_eq!(identity.role, Role::Admin);

    // The resolved identity passes the admin gate
    assert!(require_role(&identity, Role::Admin).is_ok());
}

#[tokio::test]
async fn test_login_failures_are_uniform() {
    let store = seeded_store().await;
    let signer = TokenSigner::new_dev();

    let bad_password = login(&store, &signer, "alice", "wrong").await.unwrap_err();
    let no_such_user = login(&store, &signer, "mallory", "wrong")
        .await
        .unwrap_err();

    assert_eq!(bad_password, AuthError::InvalidCredentials);
    assert_eq!(no_such_user, AuthError::InvalidCredentials);
}

#[tokio::test]
async fn test_token_for_deleted_account_is_rejected() {
    let store = seeded_store().await;
    let signer = TokenSigner::new_dev();
    let token = login(&store, &signer, "alice", "alice-password")
        .await
        .unwrap();

    // Same token against a store that no longer has the account
    let empty = MemoryStore::new();
    let err = resolve(&empty, &signer, &token).await.unwrap_err();
    assert_eq!(err, AuthError::Unauthenticated);
}

// =============================================================================
// Provisioning
// =============================================================================

#[tokio::test]
async fn test_admin_provisions_case_worker_who_can_then_login() {
    let store = seeded_store().await;
    let signer = TokenSigner::new_dev();

    let admin_token = login(&store, &signer, "alice", "alice-password")
        .await
        .unwrap();
    let admin = resolve(&store, &signer, &admin_token).await.unwrap();

    let created = create_user(
        &store,
        &admin,
        &NewUserSpec {
            username: "bob".into(),
            email: "bob@x.com".into(),
            password: "pw123".into(),
            role: "case_worker".into(),
        },
    )
    .await
    .unwrap();
    assert_eq!(created.role, Role::CaseWorker);

    // The new account authenticates immediately
    let bob_token = login(&store, &signer, "bob", "pw123").await.unwrap();
    let bob = resolve(&store, &signer, &bob_token).await.unwrap();
    assert_eq!(bob.username, "bob");

    // ...but cannot provision accounts themselves
    let err = create_user(
        &store,
        &bob,
        &NewUserSpec {
            username: "eve".into(),
            email: "eve@x.com".into(),
            password: "pw456".into(),
            role: "case_worker".into(),
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err, ProvisionError::Forbidden);
    assert!(store.find_by_username("eve").await.unwrap().is_none());
}

#[tokio::test]
async fn test_duplicate_checks_are_ordered() {
    let store = seeded_store().await;
    let admin = store.find_by_username("alice").await.unwrap().unwrap();

    // Username collides with alice, email is fresh -> DuplicateUsername
    let err = create_user(
        &store,
        &admin,
        &NewUserSpec {
            username: "alice".into(),
            email: "fresh@x.com".into(),
            password: "pw".into(),
            role: "case_worker".into(),
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err, ProvisionError::DuplicateUsername);

    // Username fresh, email collides -> DuplicateEmail
    let err = create_user(
        &store,
        &admin,
        &NewUserSpec {
            username: "fresh".into(),
            email: "alice@example.com".into(),
            password: "pw".into(),
            role: "case_worker".into(),
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err, ProvisionError::DuplicateEmail);

    // Both collide -> the username check wins
    let err = create_user(
        &store,
        &admin,
        &NewUserSpec {
            username: "alice".into(),
            email: "alice@example.com".into(),
            password: "pw".into(),
            role: "case_worker".into(),
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err, ProvisionError::DuplicateUsername);
}

// =============================================================================
// Bearer extraction
// =============================================================================

#[test]
fn test_bearer_header_contract() {
    assert_eq!(
        auth::extract_bearer(Some("Bearer my-token")),
        Some("my-token")
    );
    assert_eq!(auth::extract_bearer(Some("Basic my-token")), None);
    assert_eq!(auth::extract_bearer(None), None);
}
