use secrecy::Secret;
use warden_core::{
    Clock, DateOfBirth, Email, HashingError, Password, PasswordHasher, User, UserError, UserName,
    UserProfile, UserStore, UserStoreError,
};

/// Raw registration input, validated by the use case.
#[derive(Debug)]
pub struct RegistrationRequest {
    pub name: String,
    pub date_of_birth: String,
    pub email: String,
    pub password: Secret<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum RegisterError {
    #[error("Validation failed: {0}")]
    Validation(#[from] UserError),
    #[error("Email already registered")]
    DuplicateEmail,
    #[error("Password hashing error: {0}")]
    Hashing(#[from] HashingError),
    #[error("User store error: {0}")]
    Store(UserStoreError),
}

impl From<UserStoreError> for RegisterError {
    fn from(error: UserStoreError) -> Self {
        match error {
            UserStoreError::DuplicateEmail => RegisterError::DuplicateEmail,
            other => RegisterError::Store(other),
        }
    }
}

/// Register use case - validates, hashes and persists a new standard user
pub struct RegisterUseCase<'a, U, H>
where
    U: UserStore,
    H: PasswordHasher,
{
    user_store: &'a U,
    hasher: &'a H,
    clock: &'a dyn Clock,
}

impl<'a, U, H> RegisterUseCase<'a, U, H>
where
    U: UserStore,
    H: PasswordHasher,
{
    pub fn new(user_store: &'a U, hasher: &'a H, clock: &'a dyn Clock) -> Self {
        Self {
            user_store,
            hasher,
            clock,
        }
    }

    #[tracing::instrument(name = "RegisterUseCase::execute", skip_all)]
    pub async fn execute(&self, request: RegistrationRequest) -> Result<UserProfile, RegisterError> {
        let now = self.clock.now();

        let name = UserName::parse(request.name)?;
        let date_of_birth = DateOfBirth::parse(&request.date_of_birth, now.date_naive())?;
        let email = Email::parse(request.email)?;
        let password = Password::try_from(request.password)?;

        let password_hash = self.hasher.hash(password).await.inspect_err(|e| {
            tracing::error!(error = %e, "Error during hashing");
        })?;

        let user = User::register(name, date_of_birth, email, password_hash, now);
        let user = self.user_store.create(user).await.inspect_err(|e| match e {
            UserStoreError::DuplicateEmail => tracing::info!("Registration failed: duplicate email"),
            other => tracing::error!(error = %other, "Failed to create user"),
        })?;

        tracing::info!(user_id = %user.id(), "User registered");
        Ok(user.into())
    }
}
