use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::HeaderMap,
    response::IntoResponse,
};
use secrecy::Secret;
use serde::Deserialize;
use warden_application::{UpdateUserUseCase, UserUpdateRequest};
use warden_core::{PasswordHasher, TokenCodec, UserStore};

use super::{authorize_target, error::ApiError};
use crate::state::AppState;

/// Only the supplied fields are changed.
#[derive(Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub date_of_birth: Option<String>,
    pub email: Option<String>,
    pub password: Option<Secret<String>>,
}

#[tracing::instrument(name = "Update user", skip_all)]
pub async fn update_user<S, H, T>(
    State(state): State<AppState<S, H, T>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    request: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
    S: UserStore + Clone + 'static,
    H: PasswordHasher + Clone + 'static,
    T: TokenCodec + Clone + 'static,
{
    let id = authorize_target(&state.gate, &headers, &id)?;
    let Json(request) = request?;

    let use_case = UpdateUserUseCase::new(&state.user_store, &state.hasher, state.clock.as_ref());
    let profile = use_case
        .execute(
            id,
            UserUpdateRequest {
                name: request.name,
                date_of_birth: request.date_of_birth,
                email: request.email,
                password: request.password,
            },
        )
        .await?;

    Ok(Json(profile))
}
