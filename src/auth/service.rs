//! Credential authentication and session resolution
//!
//! `login` turns credentials into a signed token; `resolve` turns a bearer
//! token back into a live identity. Every protected operation passes
//! through `resolve` before inspecting the identity.

use tracing::{info, warn};

use crate::auth::{password, AuthError, TokenSigner};
use crate::store::{User, UserStore};

/// Authenticate a username/password pair against the store.
///
/// Returns `None` for an unknown user and for a wrong password alike;
/// callers cannot tell the two apart, which prevents account enumeration.
pub async fn authenticate(
    store: &dyn UserStore,
    username: &str,
    password: &str,
) -> Result<Option<User>, AuthError> {
    let user = store
        .find_by_username(username)
        .await
        .map_err(|e| AuthError::Backend(e.to_string()))?;

    Ok(match user {
        Some(user) if password::verify(password, &user.password_hash) => Some(user),
        _ => None,
    })
}

/// Authenticate and issue a session token with the signer's default ttl.
///
/// Fails with a uniform `InvalidCredentials` whether the user is unknown
/// or the password is wrong.
pub async fn login(
    store: &dyn UserStore,
    signer: &TokenSigner,
    username: &str,
    password: &str,
) -> Result<String, AuthError> {
    match authenticate(store, username, password).await? {
        Some(user) => {
            info!("Login successful: {}", user.username);
            signer
                .issue(&user.username)
                .map_err(|e| AuthError::Backend(e.to_string()))
        }
        None => {
            warn!("Login failed: {}", username);
            Err(AuthError::InvalidCredentials)
        }
    }
}

/// Resolve a bearer token to its live user record.
///
/// The token's signature and expiry are checked locally, then the subject
/// is re-resolved through the store so a deleted account holding a still
/// valid token comes back `Unauthenticated`.
pub async fn resolve(
    store: &dyn UserStore,
    signer: &TokenSigner,
    token: &str,
) -> Result<User, AuthError> {
    let claims = signer.decode(token).map_err(|e| {
        warn!("Token rejected: {}", e);
        AuthError::Unauthenticated
    })?;

    let user = store
        .find_by_username(&claims.sub)
        .await
        .map_err(|e| AuthError::Backend(e.to_string()))?;

    user.ok_or_else(|| {
        warn!("Token subject no longer exists: {}", claims.sub);
        AuthError::Unauthenticated
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use crate::store::MemoryStore;

    async fn store_with_alice() -> MemoryStore {
        let store = MemoryStore::new();
        store
            .insert(&User {
                username: "alice".into(),
                email: "alice@example.com".into(),
                password_hash: password::hash("pw123").unwrap(),
                role: Role::Admin,
            })
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_authenticate_success() {
        let store = store_with_alice().await;
        let user = authenticate(&store, "alice", "pw123").await.unwrap();
        assert_eq!(user.unwrap().username, "alice");
    }

    #[tokio::test]
    async fn test_login_uniform_failure() {
        let store = store_with_alice().await;
        let signer = TokenSigner::new_dev();

        // Wrong password and unknown user must be indistinguishable
        let wrong_password = login(&store, &signer, "alice", "wrong").await.unwrap_err();
        let unknown_user = login(&store, &signer, "nouser", "anything")
            .await
            .unwrap_err();

        assert_eq!(wrong_password, AuthError::InvalidCredentials);
        assert_eq!(unknown_user, AuthError::InvalidCredentials);
        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
    }

    #[tokio::test]
    async fn test_login_then_resolve() {
        let store = store_with_alice().await;
        let signer = TokenSigner::new_dev();

        let token = login(&store, &signer, "alice", "pw123").await.unwrap();
        let user = resolve(&store, &signer, &token).await.unwrap();
        assert_eq!(user.username, "alice");
        assert_eq!(user.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_resolve_rejects_garbage_token() {
        let store = store_with_alice().await;
        let signer = TokenSigner::new_dev();

        let err = resolve(&store, &signer, "not-a-token").await.unwrap_err();
        assert_eq!(err, AuthError::Unauthenticated);
    }

    #[tokio::test]
    async fn test_resolve_rejects_tampered_token() {
        let store = store_with_alice().await;
        let signer = TokenSigner::new_dev();

        let mut token = login(&store, &signer, "alice", "pw123").await.unwrap();
        let last = token.pop().unwrap();
        token.push(if last == 'A' { 'B' } else { 'A' });

        let err = resolve(&store, &signer, &token).await.unwrap_err();
        assert_eq!(err, AuthError::Unauthenticated);
    }

    #[tokio::test]
    async fn test_resolve_rejects_deleted_account() {
        // Token issued for a subject the store no longer knows
        let store = MemoryStore::new();
        let signer = TokenSigner::new_dev();

        let token = signer.issue("ghost").unwrap();
        let err = resolve(&store, &signer, &token).await.unwrap_err();
        assert_eq!(err, AuthError::Unauthenticated);
    }
}
