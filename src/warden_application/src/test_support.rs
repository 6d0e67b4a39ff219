//! Hand-rolled port doubles shared by the unit tests of this crate.

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use tokio::sync::RwLock;
use tracing::{Event, Level, Subscriber, subscriber::DefaultGuard};
use tracing_subscriber::{
    layer::{Context, Layer, SubscriberExt},
    registry,
};
use uuid::Uuid;
use warden_core::{
    Cache, CacheError, Clock, DateOfBirth, Email, HashingError, Password, PasswordHash,
    PasswordHasher, PatchedUser, Role, Token, TokenCodec, TokenError, TokenPayload, User,
    UserChanges, UserId, UserName, UserRepository, UserStoreError,
};

#[derive(Clone, Default)]
pub struct InMemoryRepository {
    users: Arc<RwLock<HashMap<UserId, User>>>,
    pub get_by_id_calls: Arc<AtomicUsize>,
    pub get_by_email_calls: Arc<AtomicUsize>,
    pub fail_reads: Arc<AtomicBool>,
}

impl InMemoryRepository {
    pub async fn insert(&self, user: User) -> User {
        self.users.write().await.insert(user.id(), user.clone());
        user
    }

    pub async fn contains(&self, id: UserId) -> bool {
        self.users.read().await.contains_key(&id)
    }

    fn email_taken(users: &HashMap<UserId, User>, email: &Email, except: Option<UserId>) -> bool {
        users
            .values()
            .any(|u| u.email() == email && Some(u.id()) != except)
    }
}

#[async_trait]
impl UserRepository for InMemoryRepository {
    async fn create(&self, user: User) -> Result<User, UserStoreError> {
        let mut users = self.users.write().await;
        if Self::email_taken(&users, user.email(), None) {
            return Err(UserStoreError::DuplicateEmail);
        }
        users.insert(user.id(), user.clone());
        Ok(user)
    }

    async fn get_by_id(&self, id: UserId) -> Result<User, UserStoreError> {
        self.get_by_id_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(UserStoreError::UnexpectedError("connection reset".to_owned()));
        }
        self.users
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(UserStoreError::NotFound)
    }

    async fn get_by_email(&self, email: &Email) -> Result<Option<User>, UserStoreError> {
        self.get_by_email_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email() == email)
            .cloned())
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
            if Self::email_taken(&users, email, Some(id)) {
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
        self.users
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(UserStoreError::NotFound)
    }
}

#[derive(Clone, Default)]
pub struct InMemoryCache {
    entries: Arc<RwLock<HashMap<String, (Vec<u8>, Duration)>>>,
    pub fail_get: Arc<AtomicBool>,
    pub fail_set: Arc<AtomicBool>,
    pub fail_delete: Arc<AtomicBool>,
}

impl InMemoryCache {
    pub async fn raw(&self, key: &str) -> Option<Vec<u8>> {
        self.entries.read().await.get(key).map(|(v, _)| v.clone())
    }

    pub async fn ttl_of(&self, key: &str) -> Option<Duration> {
        self.entries.read().await.get(key).map(|(_, ttl)| *ttl)
    }

    pub async fn put_raw(&self, key: &str, value: Vec<u8>) {
        self.entries
            .write()
            .await
            .insert(key.to_owned(), (value, Duration::from_secs(60)));
    }
}

#[async_trait]
impl Cache for InMemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        if self.fail_get.load(Ordering::SeqCst) {
            return Err(CacheError("connection refused".to_owned()));
        }
        Ok(self.raw(key).await)
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CacheError> {
        if self.fail_set.load(Ordering::SeqCst) {
            return Err(CacheError("connection refused".to_owned()));
        }
        self.entries
            .write()
            .await
            .insert(key.to_owned(), (value, ttl));
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(CacheError("connection refused".to_owned()));
        }
        self.entries.write().await.remove(key);
        Ok(())
    }
}

/// Reversible "hash" so tests can run without burning CPU on argon2.
#[derive(Clone, Default)]
pub struct PlainHasher {
    pub decoy_calls: Arc<AtomicUsize>,
}

const PLAIN_PREFIX: &str = "plain$";

#[async_trait]
impl PasswordHasher for PlainHasher {
    async fn hash(&self, password: Password) -> Result<PasswordHash, HashingError> {
        Ok(PasswordHash::new(format!("{PLAIN_PREFIX}{}", password.expose())))
    }

    async fn verify(
        &self,
        candidate: Password,
        hash: &PasswordHash,
    ) -> Result<bool, HashingError> {
        let stored = hash
            .expose()
            .strip_prefix(PLAIN_PREFIX)
            .ok_or_else(|| HashingError::MalformedHash("missing prefix".to_owned()))?;
        Ok(stored == candidate.expose())
    }

    async fn verify_decoy(&self, _candidate: Password) {
        self.decoy_calls.fetch_add(1, Ordering::SeqCst);
    }
}

/// Token codec whose tokens are just `<user id>|<role>`.
#[derive(Clone, Default)]
pub struct TransparentTokenCodec;

impl TokenCodec for TransparentTokenCodec {
    fn issue(&self, user_id: UserId, role: Role) -> Result<Token, TokenError> {
        Ok(Token::new(format!("{user_id}|{role}")))
    }

    fn verify(&self, token: &str) -> Result<TokenPayload, TokenError> {
        let (user_id, role) = token.split_once('|').ok_or(TokenError::Invalid)?;
        Ok(TokenPayload {
            token_id: Uuid::nil(),
            user_id: user_id.parse().map_err(|_| TokenError::Invalid)?,
            role: role.parse().map_err(|_| TokenError::Invalid)?,
        })
    }
}

pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub fn fixed_clock() -> FixedClock {
    FixedClock(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap())
}

pub fn user_with_email(email: &str) -> User {
    User::register(
        UserName::parse("Test User").unwrap(),
        DateOfBirth::from(NaiveDate::from_ymd_opt(1990, 1, 1).unwrap()),
        Email::parse(email).unwrap(),
        PasswordHash::new(format!("{PLAIN_PREFIX}correct horse")),
        Utc::now(),
    )
}

/// Remembers the level of every event emitted on this thread.
struct LevelRecorder(Arc<Mutex<Vec<Level>>>);

impl<S: Subscriber> Layer<S> for LevelRecorder {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if let Ok(mut levels) = self.0.lock() {
            levels.push(*event.metadata().level());
        }
    }
}

/// Installs a thread-local subscriber that records event levels until the guard drops.
/// Only meaningful on the current-thread runtime `#[tokio::test]` uses by default.
pub fn record_levels() -> (Arc<Mutex<Vec<Level>>>, DefaultGuard) {
    let levels = Arc::new(Mutex::new(Vec::new()));
    let subscriber = registry().with(LevelRecorder(levels.clone()));
    (levels, tracing::subscriber::set_default(subscriber))
}
