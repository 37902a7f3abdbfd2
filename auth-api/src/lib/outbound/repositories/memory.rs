use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::account::errors::UserError;
use crate::account::models::User;
use crate::account::models::Username;
use crate::account::ports::CredentialStore;

/// In-memory credential store for tests and database-less runs.
///
/// Records are keyed by normalized username; the check-and-insert in
/// `create` happens under a single write lock.
#[derive(Debug, Default, Clone)]
pub struct InMemoryCredentialStore {
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError> {
        let users = self.users.read().await;
        Ok(users.get(&username.normalized()).cloned())
    }

    async fn create(&self, user: User) -> Result<User, UserError> {
        if user.password_hash.is_empty() {
            return Err(UserError::CreationFailed(
                "password verifier is empty".to_string(),
            ));
        }

        let mut users = self.users.write().await;
        match users.entry(user.username.normalized()) {
            Entry::Occupied(_) => Err(UserError::UsernameAlreadyExists(
                user.username.to_string(),
            )),
            Entry::Vacant(slot) => {
                slot.insert(user.clone());
                Ok(user)
            }
        }
    }
}
