//! Per-request access decisions.
//!
//! A request moves through three checks, each represented by a type:
//!
//! ```text
//! Option<&str> header --parse--> BearerCredential --verify--> VerifiedPrincipal --authorize_owner--> TokenPayload
//!        (MalformedCredential)           (InvalidToken)                  (AccessDenied)
//! ```
//!
//! The gate keeps no state between requests beyond the token codec.

use thiserror::Error;
use warden_core::{TokenCodec, TokenPayload, UserId};

/// Expected authorization scheme, compared case-insensitively.
pub const BEARER_SCHEME: &str = "bearer";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthorizationError {
    #[error("Malformed authorization header")]
    MalformedCredential,
    #[error("Invalid or expired token")]
    InvalidToken,
    #[error("Access denied")]
    AccessDenied,
}

/// A two-field `<scheme> <value>` authorization header.
#[derive(Debug, Clone, Copy)]
pub struct BearerCredential<'a> {
    scheme: &'a str,
    token: &'a str,
}

impl<'a> BearerCredential<'a> {
    /// A missing header or any shape other than exactly two fields is malformed.
    pub fn parse(header: Option<&'a str>) -> Result<Self, AuthorizationError> {
        let header = header.ok_or(AuthorizationError::MalformedCredential)?;
        let mut fields = header.split_whitespace();

        match (fields.next(), fields.next(), fields.next()) {
            (Some(scheme), Some(token), None) => Ok(Self { scheme, token }),
            _ => Err(AuthorizationError::MalformedCredential),
        }
    }

    pub fn scheme(&self) -> &str {
        self.scheme
    }
}

/// The subject of a token that passed verification.
#[derive(Debug, Clone, Copy)]
pub struct VerifiedPrincipal(TokenPayload);

impl VerifiedPrincipal {
    pub fn payload(&self) -> &TokenPayload {
        &self.0
    }

    /// Grants access when the principal owns the resource or holds the elevated role.
    pub fn authorize_owner(self, owner: UserId) -> Result<TokenPayload, AuthorizationError> {
        let permitted = self.0.role.is_elevated() || self.0.user_id == owner;

        if permitted {
            Ok(self.0)
        } else {
            tracing::warn!(
                requester_id = %self.0.user_id,
                requested_id = %owner,
                role = %self.0.role,
                "Access denied to user resource"
            );
            Err(AuthorizationError::AccessDenied)
        }
    }
}

#[derive(Clone)]
pub struct AuthorizationGate<T> {
    token_codec: T,
}

impl<T: TokenCodec> AuthorizationGate<T> {
    pub fn new(token_codec: T) -> Self {
        Self { token_codec }
    }

    pub fn token_codec(&self) -> &T {
        &self.token_codec
    }

    pub fn verify(
        &self,
        credential: BearerCredential<'_>,
    ) -> Result<VerifiedPrincipal, AuthorizationError> {
        if !credential.scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
            return Err(AuthorizationError::InvalidToken);
        }

        self.token_codec
            .verify(credential.token)
            .map(VerifiedPrincipal)
            .map_err(|_| AuthorizationError::InvalidToken)
    }

    /// Parses and verifies the header without an ownership check.
    pub fn authenticate(&self, header: Option<&str>) -> Result<VerifiedPrincipal, AuthorizationError> {
        self.verify(BearerCredential::parse(header)?)
    }

    /// Full decision for a request targeting a resource owned by `owner`.
    pub fn authorize(
        &self,
        header: Option<&str>,
        owner: UserId,
    ) -> Result<TokenPayload, AuthorizationError> {
        self.authenticate(header)?.authorize_owner(owner)
    }
}
