use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{role::Role, user_id::UserId};

/// Signed, self-contained bearer credential. Immutable once issued.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Token([REDACTED])")
    }
}

/// Claims recovered from a token that passed verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenPayload {
    /// Random per-token identifier, kept for auditing.
    pub token_id: Uuid,
    pub user_id: UserId,
    /// Role at issuance time.
    pub role: Role,
}
