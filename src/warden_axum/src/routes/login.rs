use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::IntoResponse,
};
use secrecy::Secret;
use serde::{Deserialize, Serialize};
use warden_application::LoginUseCase;
use warden_core::{PasswordHasher, TokenCodec, UserProfile, UserStore};

use super::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: Option<Secret<String>>,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserProfile,
}

#[tracing::instrument(name = "Login", skip_all)]
pub async fn login<S, H, T>(
    State(state): State<AppState<S, H, T>>,
    request: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
    S: UserStore + Clone + 'static,
    H: PasswordHasher + Clone + 'static,
    T: TokenCodec + Clone + 'static,
{
    let Json(request) = request?;

    let use_case = LoginUseCase::new(&state.user_store, &state.hasher, state.gate.token_codec());
    let response = use_case
        .execute(
            &request.email,
            request
                .password
                .unwrap_or_else(|| Secret::new(String::new())),
        )
        .await?;

    Ok(Json(LoginResponse {
        token: response.token.into_string(),
        user: response.user,
    }))
}
