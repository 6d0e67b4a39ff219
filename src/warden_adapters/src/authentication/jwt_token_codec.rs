use std::{sync::Arc, time::Duration};

use chrono::TimeDelta;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;
use warden_core::{
    Clock, Role, SystemClock, Token, TokenCodec, TokenError, TokenIdGenerator, TokenPayload,
    UserId,
};

use crate::identity::OsRngTokenIdGenerator;

pub const DEFAULT_TOKEN_DURATION: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Clone)]
pub struct JwtTokenConfig {
    pub secret: Secret<String>,
    pub duration: Duration,
}

impl JwtTokenConfig {
    /// `duration` is a human readable span such as `"24h"` or `"90m"`.
    /// Anything unusable falls back to 24 hours.
    pub fn new(secret: Secret<String>, duration: &str) -> Self {
        Self {
            secret,
            duration: parse_duration(duration),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.secret.expose_secret().as_bytes()
    }
}

fn parse_duration(value: &str) -> Duration {
    match humantime::parse_duration(value.trim()) {
        Ok(duration) if !duration.is_zero() => duration,
        Ok(_) => {
            tracing::error!(value, "Token duration must be positive, using 24h");
            DEFAULT_TOKEN_DURATION
        }
        Err(e) => {
            tracing::error!(value, error = %e, "Invalid token duration, using 24h");
            DEFAULT_TOKEN_DURATION
        }
    }
}

#[derive(Serialize)]
struct Claims {
    id: Uuid,
    user_id: UserId,
    role: Role,
    iat: i64,
    exp: i64,
}

/// HS256 JWT codec. Claims are `id`, `user_id`, `role`, `iat` and `exp`.
#[derive(Clone)]
pub struct JwtTokenCodec {
    config: JwtTokenConfig,
    clock: Arc<dyn Clock>,
    id_generator: Arc<dyn TokenIdGenerator>,
}

impl JwtTokenCodec {
    pub fn new(config: JwtTokenConfig) -> Self {
        Self {
            config,
            clock: Arc::new(SystemClock),
            id_generator: Arc::new(OsRngTokenIdGenerator),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_id_generator(mut self, id_generator: Arc<dyn TokenIdGenerator>) -> Self {
        self.id_generator = id_generator;
        self
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against the injected clock instead.
        validation.validate_exp = false;
        // Issued tokens carry no audience, so a foreign `aud` claim is ignored.
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp"]);
        validation
    }
}

impl TokenCodec for JwtTokenCodec {
    fn issue(&self, user_id: UserId, role: Role) -> Result<Token, TokenError> {
        let id = self.id_generator.generate().map_err(TokenError::Issuance)?;

        let now = self.clock.now();
        let delta = TimeDelta::from_std(self.config.duration)
            .map_err(|e| TokenError::Issuance(e.to_string()))?;
        let exp = now
            .checked_add_signed(delta)
            .ok_or_else(|| TokenError::Issuance("Duration out of range".to_owned()))?;

        let claims = Claims {
            id,
            user_id,
            role,
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.as_bytes()),
        )
        .map(Token::new)
        .map_err(|e| TokenError::Issuance(e.to_string()))
    }

    fn verify(&self, token: &str) -> Result<TokenPayload, TokenError> {
        let claims = decode::<Map<String, Value>>(
            token,
            &DecodingKey::from_secret(self.config.as_bytes()),
            &Self::validation(),
        )
        .map(|data| data.claims)
        .map_err(|e| reject(&e.to_string()))?;

        let exp = claims
            .get("exp")
            .and_then(Value::as_i64)
            .ok_or_else(|| reject("exp is not an integer"))?;
        if exp <= self.clock.now().timestamp() {
            return Err(reject("token expired"));
        }

        let token_id = string_claim(&claims, "id")?
            .parse::<Uuid>()
            .map_err(|e| reject(&e.to_string()))?;
        let user_id = string_claim(&claims, "user_id")?
            .parse::<UserId>()
            .map_err(|e| reject(&e.to_string()))?;
        let role = string_claim(&claims, "role")?
            .parse::<Role>()
            .map_err(|e| reject(&e.to_string()))?;

        Ok(TokenPayload {
            token_id,
            user_id,
            role,
        })
    }
}

fn string_claim<'a>(claims: &'a Map<String, Value>, name: &str) -> Result<&'a str, TokenError> {
    claims
        .get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| reject(&format!("{name} missing or not a string")))
}

fn reject(reason: &str) -> TokenError {
    tracing::debug!(reason, "Token rejected");
    TokenError::Invalid
}
