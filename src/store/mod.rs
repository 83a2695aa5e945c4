//! Credential store adapter
//!
//! The gateway treats user persistence as an external collaborator behind
//! the [`UserStore`] trait: lookup by username or email, and insert with
//! atomic uniqueness enforcement. MongoDB backs production; an in-memory
//! store backs dev mode and tests.

pub mod memory;
pub mod mongo;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

use crate::auth::Role;

/// A stored account record.
///
/// Usernames and emails are each globally unique. Records are never mutated
/// by the gateway after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub username: String,
    pub email: String,
    /// Argon2 PHC hash string, never the plaintext
    pub password_hash: String,
    pub role: Role,
}

/// Errors surfaced by a credential store
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Insert violated a uniqueness constraint
    #[error("Duplicate key: {0}")]
    Duplicate(String),

    /// Connectivity or query failure in the backing store
    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Credential store contract consumed by authentication, session
/// resolution, and provisioning.
///
/// The store is the only shared mutable resource in the gateway; it must
/// enforce uniqueness atomically on insert. Callers handle a race between
/// an existence check and the insert as a persistence failure, never
/// assume it impossible.
#[async_trait::async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn insert(&self, user: &User) -> Result<(), StoreError>;
}
