use std::sync::Arc;

use argon2::{
    Algorithm, Argon2, Params, PasswordHash as PhcString, PasswordHasher as _, PasswordVerifier,
    Version,
    password_hash::{
        self, SaltString,
        rand_core::{OsRng, RngCore},
    },
};
use async_trait::async_trait;
use secrecy::Secret;
use tokio::sync::OnceCell;
use warden_core::{HashingError, Password, PasswordHash, PasswordHasher};

const MEMORY_COST_KIB: u32 = 15000;
const ITERATIONS: u32 = 2;
const PARALLELISM: u32 = 1;
const SALT_LEN: usize = 16;

const DECOY_PASSWORD: &str = "warden-decoy-password";

/// Argon2id hasher with fixed parameters. Work runs on the blocking pool.
#[derive(Clone, Default)]
pub struct Argon2Hasher {
    decoy: Arc<OnceCell<PasswordHash>>,
}

impl Argon2Hasher {
    pub fn new() -> Self {
        Self::default()
    }

    async fn decoy_hash(&self) -> Result<&PasswordHash, HashingError> {
        self.decoy
            .get_or_try_init(|| async {
                let password = Password::try_from(Secret::new(DECOY_PASSWORD.to_owned()))
                    .map_err(|e| HashingError::Internal(e.to_string()))?;
                self.hash(password).await
            })
            .await
    }
}

#[async_trait]
impl PasswordHasher for Argon2Hasher {
    #[tracing::instrument(name = "Computing password hash", skip_all)]
    async fn hash(&self, password: Password) -> Result<PasswordHash, HashingError> {
        let current_span: tracing::Span = tracing::Span::current();

        tokio::task::spawn_blocking(move || {
            current_span.in_scope(|| compute_password_hash(&password))
        })
        .await
        .map_err(|e| HashingError::Internal(e.to_string()))?
    }

    #[tracing::instrument(name = "Verify password hash", skip_all)]
    async fn verify(
        &self,
        candidate: Password,
        hash: &PasswordHash,
    ) -> Result<bool, HashingError> {
        let current_span: tracing::Span = tracing::Span::current();
        let expected = hash.clone();

        tokio::task::spawn_blocking(move || {
            current_span.in_scope(|| verify_password_hash(&candidate, &expected))
        })
        .await
        .map_err(|e| HashingError::Internal(e.to_string()))?
    }

    async fn verify_decoy(&self, candidate: Password) {
        let result = match self.decoy_hash().await {
            Ok(decoy) => self.verify(candidate, decoy).await.map(|_| ()),
            Err(e) => Err(e),
        };

        if let Err(e) = result {
            tracing::error!(error = %e, "Decoy verification failed");
        }
    }
}

fn argon2() -> Result<Argon2<'static>, HashingError> {
    let params = Params::new(MEMORY_COST_KIB, ITERATIONS, PARALLELISM, None)
        .map_err(|e| HashingError::Internal(e.to_string()))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

fn compute_password_hash(password: &Password) -> Result<PasswordHash, HashingError> {
    let mut salt = [0u8; SALT_LEN];
    OsRng
        .try_fill_bytes(&mut salt)
        .map_err(|e| HashingError::Entropy(e.to_string()))?;
    let salt = SaltString::encode_b64(&salt).map_err(|e| HashingError::Internal(e.to_string()))?;

    argon2()?
        .hash_password(password.expose().as_bytes(), &salt)
        .map(|hash| PasswordHash::new(hash.to_string()))
        .map_err(|e| HashingError::Internal(e.to_string()))
}

fn verify_password_hash(candidate: &Password, expected: &PasswordHash) -> Result<bool, HashingError> {
    let expected =
        PhcString::new(expected.expose()).map_err(|e| HashingError::MalformedHash(e.to_string()))?;

    match argon2()?.verify_password(candidate.expose().as_bytes(), &expected) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(HashingError::MalformedHash(e.to_string())),
    }
}
