//! Route handlers. Each one validates transport concerns and hands off to a use case.

pub mod delete_user;
pub mod error;
pub mod get_user;
pub mod login;
pub mod register;
pub mod update_user;

pub use delete_user::delete_user;
pub use get_user::get_user;
pub use login::login;
pub use register::register;
pub use update_user::update_user;

use axum::http::{HeaderMap, header::AUTHORIZATION};
use warden_application::AuthorizationGate;
use warden_core::{TokenCodec, UserId};

use error::ApiError;

/// A header that is present but not valid UTF-8 is passed on as empty, i.e. malformed.
fn authorization_header(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .map(|value| value.to_str().unwrap_or_default())
}

/// Authenticates the caller, parses the target id and checks ownership, in that order.
fn authorize_target<T: TokenCodec>(
    gate: &AuthorizationGate<T>,
    headers: &HeaderMap,
    target: &str,
) -> Result<UserId, ApiError> {
    let principal = gate.authenticate(authorization_header(headers))?;
    let target: UserId = target.parse()?;
    principal.authorize_owner(target)?;
    Ok(target)
}
