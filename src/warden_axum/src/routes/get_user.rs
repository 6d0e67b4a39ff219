use axum::{
    Json,
    extract::{Path, State},
    http::HeaderMap,
    response::IntoResponse,
};
use warden_application::GetUserUseCase;
use warden_core::{PasswordHasher, TokenCodec, UserStore};

use super::{authorize_target, error::ApiError};
use crate::state::AppState;

#[tracing::instrument(name = "Get user", skip_all)]
pub async fn get_user<S, H, T>(
    State(state): State<AppState<S, H, T>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError>
where
    S: UserStore + Clone + 'static,
    H: PasswordHasher + Clone + 'static,
    T: TokenCodec + Clone + 'static,
{
    let id = authorize_target(&state.gate, &headers, &id)?;

    let profile = GetUserUseCase::new(&state.user_store).execute(id).await?;

    Ok(Json(profile))
}
