//! Admin-gated user provisioning
//!
//! The check order is significant: authorization, then role validity, then
//! username uniqueness, then email uniqueness. An unauthorized caller is
//! rejected before any store read, so it never learns whether a username
//! or email is taken.

use tracing::info;

use crate::auth::{password, require_role, Role};
use crate::store::{User, UserStore};

/// Requested account, as it arrives on the wire. The role is a raw string
/// until validated.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct NewUserSpec {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

/// Provisioning failure taxonomy. All variants are terminal; only
/// `PersistenceFailure` can follow a side effect, and the single insert
/// either fully lands or fully fails, so no partial record remains.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProvisionError {
    #[error("Only admin users can perform this operation")]
    Forbidden,

    #[error("Role must be either admin or case_worker")]
    InvalidRole,

    #[error("Username already registered")]
    DuplicateUsername,

    #[error("Email already registered")]
    DuplicateEmail,

    #[error("Failed to persist user: {0}")]
    PersistenceFailure(String),
}

/// Create a new account on behalf of an admin requester.
///
/// A uniqueness race between the pre-checks and the insert is possible;
/// the store's atomic constraints catch it and it surfaces as
/// `PersistenceFailure`.
pub async fn create_user(
    store: &dyn UserStore,
    requester: &User,
    spec: &NewUserSpec,
) -> Result<User, ProvisionError> {
    if require_role(requester, Role::Admin).is_err() {
        return Err(ProvisionError::Forbidden);
    }

    let role: Role = spec.role.parse().map_err(|_| ProvisionError::InvalidRole)?;

    if store
        .find_by_username(&spec.username)
        .await
        .map_err(|e| ProvisionError::PersistenceFailure(e.to_string()))?
        .is_some()
    {
        return Err(ProvisionError::DuplicateUsername);
    }

    if store
        .find_by_email(&spec.email)
        .await
        .map_err(|e| ProvisionError::PersistenceFailure(e.to_string()))?
        .is_some()
    {
        return Err(ProvisionError::DuplicateEmail);
    }

    let password_hash = password::hash(&spec.password)
        .map_err(|e| ProvisionError::PersistenceFailure(e.to_string()))?;

    let user = User {
        username: spec.username.clone(),
        email: spec.email.clone(),
        password_hash,
        role,
    };

    store
        .insert(&user)
        .await
        .map_err(|e| ProvisionError::PersistenceFailure(e.to_string()))?;

    info!("User created: {} ({})", user.username, user.role);

    Ok(user)
}
