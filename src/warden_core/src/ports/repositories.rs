use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::{
    email::Email,
    user::{User, UserChanges},
    user_id::UserId,
};

// UserRepository / UserStore errors
#[derive(Debug, Error)]
pub enum UserStoreError {
    #[error("Email already registered")]
    DuplicateEmail,
    #[error("User not found")]
    NotFound,
    #[error("Unexpected error {0}")]
    UnexpectedError(String),
}

impl PartialEq for UserStoreError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::DuplicateEmail, Self::DuplicateEmail)
                | (Self::NotFound, Self::NotFound)
                | (Self::UnexpectedError(_), Self::UnexpectedError(_))
        )
    }
}

/// A user right after a patch, with the email it had before the patch.
#[derive(Debug, Clone)]
pub struct PatchedUser {
    pub user: User,
    pub previous_email: Email,
}

/// The durable system of record. Owns durability and email uniqueness.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `DuplicateEmail` when the email is taken.
    async fn create(&self, user: User) -> Result<User, UserStoreError>;
    async fn get_by_id(&self, id: UserId) -> Result<User, UserStoreError>;
    /// A missing email is `Ok(None)`, not an error.
    async fn get_by_email(&self, email: &Email) -> Result<Option<User>, UserStoreError>;
    /// Applies `changes` to the stored row as one atomic step, so concurrent
    /// patches touching different fields both survive. Never inserts: fails with
    /// `NotFound` if the row is gone and `DuplicateEmail` on a uniqueness clash.
    async fn update(
        &self,
        id: UserId,
        changes: UserChanges,
        now: DateTime<Utc>,
    ) -> Result<PatchedUser, UserStoreError>;
    /// Fails with `NotFound` when nothing was deleted.
    async fn delete(&self, id: UserId) -> Result<(), UserStoreError>;
}

#[derive(Debug, Error)]
#[error("Cache error: {0}")]
pub struct CacheError(pub String);

/// Best-effort byte cache. Callers must treat every error as ignorable.
#[async_trait]
pub trait Cache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CacheError>;
    async fn delete(&self, key: &str) -> Result<(), CacheError>;
}

/// User access as seen by the services: reads may be served from cache,
/// writes always go to the system of record first.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: UserId) -> Result<User, UserStoreError>;
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserStoreError>;
    /// Persists a new user.
    async fn create(&self, user: User) -> Result<User, UserStoreError>;
    /// Patches an existing user in the system of record. A user deleted in the
    /// meantime stays deleted: the result is `NotFound`.
    async fn update(
        &self,
        id: UserId,
        changes: UserChanges,
        now: DateTime<Utc>,
    ) -> Result<User, UserStoreError>;
    async fn remove(&self, id: UserId) -> Result<(), UserStoreError>;
}
