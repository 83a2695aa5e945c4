//! In-memory credential store for dev mode and tests

use tokio::sync::RwLock;

use crate::store::{StoreError, User, UserStore};

/// Credential store backed by a process-local vector.
///
/// Uniqueness is enforced under a single write lock, so the insert is
/// atomic just like the MongoDB unique indexes.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<Vec<User>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts (test helper)
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl UserStore for MemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn insert(&self, user: &User) -> Result<(), StoreError> {
        let mut users = self.users.write().await;

        if users.iter().any(|u| u.username == user.username) {
            return Err(StoreError::Duplicate(format!(
                "username '{}' already exists",
                user.username
            )));
        }
        if users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::Duplicate(format!(
                "email '{}' already exists",
                user.email
            )));
        }

        users.push(user.clone());
        Ok(())
    }
}
