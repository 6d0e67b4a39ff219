use secrecy::Secret;
use warden_core::{
    Email, HashingError, Password, PasswordHasher, Token, TokenCodec, TokenError, UserProfile,
    UserStore,
};

/// Successful login: a fresh token plus the user's public profile.
#[derive(Debug)]
pub struct LoginResponse {
    pub token: Token,
    pub user: UserProfile,
}

/// Error types specific to login use case
#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    /// Unknown email, wrong password and lookup failures all look the same.
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Password hashing error: {0}")]
    Hashing(#[from] HashingError),
    #[error("Token error: {0}")]
    Token(#[from] TokenError),
}

/// Login use case - checks credentials and mints a token
pub struct LoginUseCase<'a, U, H, T>
where
    U: UserStore,
    H: PasswordHasher,
    T: TokenCodec,
{
    user_store: &'a U,
    hasher: &'a H,
    token_codec: &'a T,
}

impl<'a, U, H, T> LoginUseCase<'a, U, H, T>
where
    U: UserStore,
    H: PasswordHasher,
    T: TokenCodec,
{
    pub fn new(user_store: &'a U, hasher: &'a H, token_codec: &'a T) -> Self {
        Self {
            user_store,
            hasher,
            token_codec,
        }
    }

    /// Execute the login use case
    ///
    /// # Arguments
    /// * `email` - Email address as submitted
    /// * `password` - Plaintext password as submitted
    ///
    /// # Returns
    /// A token and the user's profile, or `InvalidCredentials` without saying which part was wrong
    #[tracing::instrument(name = "LoginUseCase::execute", skip(self, password))]
    pub async fn execute(
        &self,
        email: &str,
        password: Secret<String>,
    ) -> Result<LoginResponse, LoginError> {
        let email = Email::parse(email).map_err(|_| LoginError::InvalidCredentials)?;
        let password = Password::try_from(password).map_err(|_| LoginError::InvalidCredentials)?;

        let user = match self.user_store.find_by_email(&email).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                // Keep "no such user" as slow as "wrong password".
                self.hasher.verify_decoy(password).await;
                tracing::info!("Login attempt for unknown email");
                return Err(LoginError::InvalidCredentials);
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to get user by email");
                return Err(LoginError::InvalidCredentials);
            }
        };

        if !self.hasher.verify(password, user.password_hash()).await? {
            tracing::info!(user_id = %user.id(), "Invalid password attempt");
            return Err(LoginError::InvalidCredentials);
        }

        let user = UserProfile::from(user);
        let token = create_token(self.token_codec, &user).inspect_err(|e| {
            tracing::error!(error = %e, user_id = %user.id, "Failed to create token");
        })?;

        Ok(LoginResponse { token, user })
    }
}

/// Mints a token for `user` carrying its current role.
pub fn create_token<T: TokenCodec + ?Sized>(
    token_codec: &T,
    user: &UserProfile,
) -> Result<Token, TokenError> {
    token_codec.issue(user.id, user.role)
}
