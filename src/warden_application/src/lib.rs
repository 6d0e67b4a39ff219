pub mod authorization;
pub mod cache_aside;
pub mod use_cases;

#[cfg(test)]
pub(crate) mod test_support;

pub use authorization::{
    AuthorizationError, AuthorizationGate, BEARER_SCHEME, BearerCredential, VerifiedPrincipal,
};
pub use cache_aside::{
    CacheAsideUserStore, USER_EMAIL_CACHE_TTL, USER_ID_CACHE_TTL, user_email_key, user_id_key,
};
pub use use_cases::{
    delete_user::{DeleteUserError, DeleteUserUseCase},
    get_user::{GetUserError, GetUserUseCase},
    login::{LoginError, LoginResponse, LoginUseCase, create_token},
    register::{RegisterError, RegisterUseCase, RegistrationRequest},
    update_user::{UpdateUserError, UpdateUserUseCase, UserUpdateRequest},
};
