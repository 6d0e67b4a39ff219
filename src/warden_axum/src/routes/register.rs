use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use secrecy::Secret;
use serde::{Deserialize, Serialize};
use warden_application::{RegisterUseCase, RegistrationRequest, create_token};
use warden_core::{PasswordHasher, TokenCodec, UserId, UserStore};

use super::error::ApiError;
use crate::state::AppState;

/// Missing fields deserialize as empty and are reported by validation.
#[derive(Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub date_of_birth: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: Option<Secret<String>>,
}

#[derive(Serialize)]
pub struct RegisterResponse {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub token: String,
    pub created_at: DateTime<Utc>,
}

#[tracing::instrument(name = "Register", skip_all)]
pub async fn register<S, H, T>(
    State(state): State<AppState<S, H, T>>,
    request: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
    S: UserStore + Clone + 'static,
    H: PasswordHasher + Clone + 'static,
    T: TokenCodec + Clone + 'static,
{
    let Json(request) = request?;

    let use_case = RegisterUseCase::new(&state.user_store, &state.hasher, state.clock.as_ref());
    let profile = use_case
        .execute(RegistrationRequest {
            name: request.name,
            date_of_birth: request.date_of_birth,
            email: request.email,
            password: request
                .password
                .unwrap_or_else(|| Secret::new(String::new())),
        })
        .await?;

    let token = create_token(state.gate.token_codec(), &profile)?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            id: profile.id,
            name: profile.name.to_string(),
            email: profile.email.to_string(),
            token: token.into_string(),
            created_at: profile.created_at,
        }),
    ))
}
