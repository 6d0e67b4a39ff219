use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use warden_application::DeleteUserUseCase;
use warden_core::{PasswordHasher, TokenCodec, UserStore};

use super::{authorize_target, error::ApiError};
use crate::state::AppState;

#[tracing::instrument(name = "Delete user", skip_all)]
pub async fn delete_user<S, H, T>(
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

    DeleteUserUseCase::new(&state.user_store).execute(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
