//! Cache-aside access to user records.
//!
//! Reads prefer the cache and fall back to the repository on a miss, a cache
//! error or an undecodable entry. Creates, patches and deletes go to the
//! repository first and only then drop the affected cache keys. A patch is
//! applied by the repository in one step, never as a read followed by a
//! full-row write. The repository is the
//! only authority: uniqueness, existence and field values are never decided
//! from cached bytes.
//!
//! There is no lock spanning the repository and the cache. Between a write
//! committing and its invalidation landing, a concurrent reader can still be
//! served the previous cached value. Entries expire after their TTL either way.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::Instrument;
use warden_core::{
    Cache, Email, PasswordHash, PatchedUser, Role, User, UserChanges, UserError, UserId,
    UserName, UserRepository, UserStore, UserStoreError,
};

pub const USER_ID_CACHE_TTL: Duration = Duration::from_secs(15 * 60);
pub const USER_EMAIL_CACHE_TTL: Duration = Duration::from_secs(10 * 60);

const USER_ID_KEY_PREFIX: &str = "user:";
const USER_EMAIL_KEY_PREFIX: &str = "user_email:";

// Bump when the cached layout changes; older entries are then treated as misses.
const CACHE_SCHEMA_VERSION: u32 = 1;

pub fn user_id_key(id: UserId) -> String {
    format!("{USER_ID_KEY_PREFIX}{id}")
}

pub fn user_email_key(email: &Email) -> String {
    format!("{USER_EMAIL_KEY_PREFIX}{email}")
}

#[derive(Clone)]
pub struct CacheAsideUserStore<R, C> {
    repository: R,
    cache: C,
}

impl<R, C> CacheAsideUserStore<R, C>
where
    R: UserRepository,
    C: Cache + Clone + 'static,
{
    pub fn new(repository: R, cache: C) -> Self {
        Self { repository, cache }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    async fn read_cached(&self, key: &str) -> Option<User> {
        let bytes = match self.cache.get(key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(error = %e, %key, "Cache read failed, falling back to repository");
                return None;
            }
        };

        match decode(&bytes) {
            Ok(user) => {
                tracing::debug!(%key, "Cache hit");
                Some(user)
            }
            Err(e) => {
                tracing::warn!(error = %e, %key, "Discarding undecodable cache entry");
                None
            }
        }
    }

    async fn populate(&self, key: &str, user: &User, ttl: Duration) {
        let bytes = match encode(user) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(error = %e, %key, "Failed to serialize user for cache");
                return;
            }
        };

        if let Err(e) = self.cache.set(key, bytes, ttl).await {
            tracing::warn!(error = %e, %key, "Failed to populate cache");
        }
    }

    /// Drops `keys` from the cache. Runs on its own task so the deletes still
    /// happen if the calling request is cancelled after the durable write.
    async fn invalidate(&self, keys: Vec<String>) {
        let cache = self.cache.clone();
        let task = tokio::spawn(
            async move {
                for key in keys {
                    if let Err(e) = cache.delete(&key).await {
                        tracing::warn!(error = %e, %key, "Failed to invalidate cache entry");
                    }
                }
            }
            .in_current_span(),
        );

        if let Err(e) = task.await {
            tracing::warn!(error = %e, "Cache invalidation task did not complete");
        }
    }
}

#[async_trait]
impl<R, C> UserStore for CacheAsideUserStore<R, C>
where
    R: UserRepository,
    C: Cache + Clone + 'static,
{
    #[tracing::instrument(name = "CacheAsideUserStore::find_by_id", skip(self))]
    async fn find_by_id(&self, id: UserId) -> Result<User, UserStoreError> {
        let key = user_id_key(id);
        if let Some(user) = self.read_cached(&key).await {
            return Ok(user);
        }

        let user = self.repository.get_by_id(id).await?;
        self.populate(&key, &user, USER_ID_CACHE_TTL).await;
        Ok(user)
    }

    #[tracing::instrument(name = "CacheAsideUserStore::find_by_email", skip_all)]
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserStoreError> {
        let key = user_email_key(email);
        if let Some(user) = self.read_cached(&key).await {
            return Ok(Some(user));
        }

        // Negative lookups are never cached: a registration may land right after.
        let Some(user) = self.repository.get_by_email(email).await? else {
            return Ok(None);
        };
        self.populate(&key, &user, USER_EMAIL_CACHE_TTL).await;
        Ok(Some(user))
    }

    #[tracing::instrument(name = "CacheAsideUserStore::create", skip_all, fields(user_id = %user.id()))]
    async fn create(&self, user: User) -> Result<User, UserStoreError> {
        let created = self.repository.create(user).await?;

        self.invalidate(vec![
            user_id_key(created.id()),
            user_email_key(created.email()),
        ])
        .await;
        Ok(created)
    }

    #[tracing::instrument(name = "CacheAsideUserStore::update", skip(self, changes, now))]
    async fn update(
        &self,
        id: UserId,
        changes: UserChanges,
        now: DateTime<Utc>,
    ) -> Result<User, UserStoreError> {
        let PatchedUser {
            user,
            previous_email,
        } = self.repository.update(id, changes, now).await?;

        let mut keys = vec![user_id_key(user.id()), user_email_key(user.email())];
        if &previous_email != user.email() {
            keys.push(user_email_key(&previous_email));
        }
        self.invalidate(keys).await;

        Ok(user)
    }

    #[tracing::instrument(name = "CacheAsideUserStore::remove", skip(self))]
    async fn remove(&self, id: UserId) -> Result<(), UserStoreError> {
        let existing = self.repository.get_by_id(id).await?;
        self.repository.delete(id).await?;

        self.invalidate(vec![user_id_key(id), user_email_key(existing.email())])
            .await;
        Ok(())
    }
}

/// Cached form of a user. Unlike any outward representation it carries the
/// password hash, because login resolves users through the email cache.
#[derive(Serialize, Deserialize)]
struct CachedUser {
    schema: u32,
    id: UserId,
    name: String,
    date_of_birth: NaiveDate,
    email: String,
    password_hash: String,
    role: Role,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
enum CacheCodecError {
    #[error("serialization: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("unsupported cache schema version {0}")]
    Schema(u32),
    #[error("invalid cached field: {0}")]
    Field(#[from] UserError),
}

fn encode(user: &User) -> Result<Vec<u8>, CacheCodecError> {
    let cached = CachedUser {
        schema: CACHE_SCHEMA_VERSION,
        id: user.id(),
        name: user.name().to_string(),
        date_of_birth: user.date_of_birth().as_date(),
        email: user.email().to_string(),
        password_hash: user.password_hash().expose().to_owned(),
        role: user.role(),
        created_at: user.created_at(),
        updated_at: user.updated_at(),
    };
    Ok(serde_json::to_vec(&cached)?)
}

fn decode(bytes: &[u8]) -> Result<User, CacheCodecError> {
    let cached: CachedUser = serde_json::from_slice(bytes)?;
    if cached.schema != CACHE_SCHEMA_VERSION {
        return Err(CacheCodecError::Schema(cached.schema));
    }

    Ok(User::restore(
        cached.id,
        UserName::parse(cached.name)?,
        cached.date_of_birth.into(),
        Email::parse(cached.email)?,
        PasswordHash::new(cached.password_hash),
        cached.role,
        cached.created_at,
        cached.updated_at,
    ))
}
