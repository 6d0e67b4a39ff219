use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::{
    password::{Password, PasswordHash},
    role::Role,
    token::{Token, TokenPayload},
    user_id::UserId,
};

#[derive(Debug, Error)]
pub enum HashingError {
    #[error("Failed to gather entropy for salt: {0}")]
    Entropy(String),
    #[error("Malformed password hash: {0}")]
    MalformedHash(String),
    #[error("Password hashing failed: {0}")]
    Internal(String),
}

/// One-way, salted, slow password hashing.
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    async fn hash(&self, password: Password) -> Result<PasswordHash, HashingError>;

    /// `Ok(false)` on mismatch. Errors only for an unparsable stored hash.
    async fn verify(&self, candidate: Password, hash: &PasswordHash)
    -> Result<bool, HashingError>;

    /// Spends roughly the cost of a real verification and discards the result.
    /// Used when there is no stored hash to compare against.
    async fn verify_decoy(&self, _candidate: Password) {}
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Failed to issue token: {0}")]
    Issuance(String),
    #[error("Invalid or expired token")]
    Invalid,
}

impl PartialEq for TokenError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::Issuance(_), Self::Issuance(_)) | (Self::Invalid, Self::Invalid)
        )
    }
}

/// Creates and verifies signed, time-bound identity tokens.
pub trait TokenCodec: Send + Sync {
    fn issue(&self, user_id: UserId, role: Role) -> Result<Token, TokenError>;
    fn verify(&self, token: &str) -> Result<TokenPayload, TokenError>;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Source of random token identifiers. Must be cryptographically strong.
pub trait TokenIdGenerator: Send + Sync {
    fn generate(&self) -> Result<Uuid, String>;
}
