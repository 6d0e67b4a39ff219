use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use warden_application::{
    AuthorizationError, DeleteUserError, GetUserError, LoginError, RegisterError, UpdateUserError,
};
use warden_core::{TokenError, UserError};

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{0}")]
    Unauthorized(AuthorizationError),

    #[error("Access denied")]
    Forbidden,

    #[error("User not found")]
    UserNotFound,

    #[error("Email already registered")]
    EmailAlreadyExists,

    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status_code, error_message) = match self {
            ApiError::InvalidInput(_) => (StatusCode::BAD_REQUEST, self.to_string()),

            ApiError::InvalidCredentials | ApiError::Unauthorized(_) => {
                (StatusCode::UNAUTHORIZED, self.to_string())
            }

            ApiError::Forbidden => (StatusCode::FORBIDDEN, self.to_string()),

            ApiError::UserNotFound => (StatusCode::NOT_FOUND, self.to_string()),

            ApiError::EmailAlreadyExists => (StatusCode::CONFLICT, self.to_string()),

            ApiError::UnexpectedError(detail) => {
                tracing::error!(error = %detail, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_owned(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_message,
        });

        (status_code, body).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::info!(error = %rejection, "Rejected request body");
        ApiError::InvalidInput("Invalid JSON format".to_owned())
    }
}

impl From<UserError> for ApiError {
    fn from(error: UserError) -> Self {
        ApiError::InvalidInput(error.to_string())
    }
}

impl From<AuthorizationError> for ApiError {
    fn from(error: AuthorizationError) -> Self {
        match error {
            AuthorizationError::MalformedCredential | AuthorizationError::InvalidToken => {
                ApiError::Unauthorized(error)
            }
            AuthorizationError::AccessDenied => ApiError::Forbidden,
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(error: TokenError) -> Self {
        ApiError::UnexpectedError(error.to_string())
    }
}

impl From<LoginError> for ApiError {
    fn from(error: LoginError) -> Self {
        match error {
            LoginError::InvalidCredentials => ApiError::InvalidCredentials,
            LoginError::Hashing(e) => ApiError::UnexpectedError(e.to_string()),
            LoginError::Token(e) => e.into(),
        }
    }
}

impl From<RegisterError> for ApiError {
    fn from(error: RegisterError) -> Self {
        match error {
            RegisterError::Validation(e) => e.into(),
            RegisterError::DuplicateEmail => ApiError::EmailAlreadyExists,
            RegisterError::Hashing(e) => ApiError::UnexpectedError(e.to_string()),
            RegisterError::Store(e) => ApiError::UnexpectedError(e.to_string()),
        }
    }
}

impl From<GetUserError> for ApiError {
    fn from(error: GetUserError) -> Self {
        match error {
            GetUserError::NotFound => ApiError::UserNotFound,
            GetUserError::Store(e) => ApiError::UnexpectedError(e.to_string()),
        }
    }
}

impl From<UpdateUserError> for ApiError {
    fn from(error: UpdateUserError) -> Self {
        match error {
            UpdateUserError::Validation(e) => e.into(),
            UpdateUserError::DuplicateEmail => ApiError::EmailAlreadyExists,
            UpdateUserError::NotFound => ApiError::UserNotFound,
            UpdateUserError::Hashing(e) => ApiError::UnexpectedError(e.to_string()),
            UpdateUserError::Store(e) => ApiError::UnexpectedError(e.to_string()),
        }
    }
}

impl From<DeleteUserError> for ApiError {
    fn from(error: DeleteUserError) -> Self {
        match error {
            DeleteUserError::NotFound => ApiError::UserNotFound,
            DeleteUserError::Store(e) => ApiError::UnexpectedError(e.to_string()),
        }
    }
}
