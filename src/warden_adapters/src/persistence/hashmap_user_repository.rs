use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use warden_core::{
    Email, PatchedUser, User, UserChanges, UserId, UserRepository, UserStoreError,
};

/// In-memory system of record. Email uniqueness is checked under the write lock.
#[derive(Default, Clone)]
pub struct HashMapUserRepository {
    users: Arc<RwLock<HashMap<UserId, User>>>,
}

impl HashMapUserRepository {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

fn email_taken(users: &HashMap<UserId, User>, email: &Email, owner: Option<UserId>) -> bool {
    users
        .values()
        .any(|user| user.email() == email && Some(user.id()) != owner)
}

#[async_trait::async_trait]
impl UserRepository for HashMapUserRepository {
    async fn create(&self, user: User) -> Result<User, UserStoreError> {
        let mut users = self.users.write().await;
        if email_taken(&users, user.email(), None) {
            return Err(UserStoreError::DuplicateEmail);
        }
        users.insert(user.id(), user.clone());
        Ok(user)
    }

    async fn get_by_id(&self, id: UserId) -> Result<User, UserStoreError> {
        let users = self.users.read().await;
        users.get(&id).cloned().ok_or(UserStoreError::NotFound)
    }

    async fn get_by_email(&self, email: &Email) -> Result<Option<User>, UserStoreError> {
        let users = self.users.read().await;
        Ok(users.values().find(|user| user.email() == email).cloned())
    }

    async fn update(
        &self,
        id: UserId,
        changes: UserChanges,
        now: DateTime<Utc>,
    ) -> Result<PatchedUser, UserStoreError> {
        let mut users = self.users.write().await;
        let current = users.get(&id).cloned().ok_or(UserStoreError::NotFound)?;
        if let Some(email) = &changes.email {
            if email_taken(&users, email, Some(id)) {
                return Err(UserStoreError::DuplicateEmail);
            }
        }

        let previous_email = current.email().clone();
        let user = current.apply(changes, now);
        users.insert(id, user.clone());
        Ok(PatchedUser {
            user,
            previous_email,
        })
    }

    async fn delete(&self, id: UserId) -> Result<(), UserStoreError> {
        let mut users = self.users.write().await;
        users.remove(&id).ok_or(UserStoreError::NotFound)?;
        Ok(())
    }
}
