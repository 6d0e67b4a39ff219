use secrecy::Secret;
use warden_core::{
    Clock, DateOfBirth, Email, HashingError, Password, PasswordHasher, UserChanges, UserError,
    UserId, UserName, UserProfile, UserStore, UserStoreError,
};

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Default)]
pub struct UserUpdateRequest {
    pub name: Option<String>,
    pub date_of_birth: Option<String>,
    pub email: Option<String>,
    pub password: Option<Secret<String>>,
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateUserError {
    #[error("Validation failed: {0}")]
    Validation(#[from] UserError),
    #[error("Email already registered")]
    DuplicateEmail,
    #[error("User not found")]
    NotFound,
    #[error("Password hashing error: {0}")]
    Hashing(#[from] HashingError),
    #[error("User store error: {0}")]
    Store(UserStoreError),
}

impl From<UserStoreError> for UpdateUserError {
    fn from(error: UserStoreError) -> Self {
        match error {
            UserStoreError::DuplicateEmail => UpdateUserError::DuplicateEmail,
            UserStoreError::NotFound => UpdateUserError::NotFound,
            other => UpdateUserError::Store(other),
        }
    }
}

pub struct UpdateUserUseCase<'a, U, H>
where
    U: UserStore,
    H: PasswordHasher,
{
    user_store: &'a U,
    hasher: &'a H,
    clock: &'a dyn Clock,
}

impl<'a, U, H> UpdateUserUseCase<'a, U, H>
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

    #[tracing::instrument(name = "UpdateUserUseCase::execute", skip(self, request))]
    pub async fn execute(
        &self,
        id: UserId,
        request: UserUpdateRequest,
    ) -> Result<UserProfile, UpdateUserError> {
        let now = self.clock.now();

        let name = request.name.map(UserName::parse).transpose()?;
        let date_of_birth = request
            .date_of_birth
            .map(|dob| DateOfBirth::parse(&dob, now.date_naive()))
            .transpose()?;
        let email = request.email.map(Email::parse).transpose()?;
        let password = request.password.map(Password::try_from).transpose()?;

        let password_hash = match password {
            Some(password) => Some(self.hasher.hash(password).await.inspect_err(|e| {
                tracing::error!(error = %e, "Error during hashing");
            })?),
            None => None,
        };

        let changes = UserChanges {
            name,
            date_of_birth,
            email,
            password_hash,
        };
        let saved = self
            .user_store
            .update(id, changes, now)
            .await
            .inspect_err(|e| match e {
                UserStoreError::DuplicateEmail => tracing::info!("Update failed: duplicate email"),
                UserStoreError::NotFound => tracing::info!("Update failed: user not found"),
                other => tracing::error!(error = %other, "Failed to update user"),
            })?;

        tracing::info!("User updated");
        Ok(saved.into())
    }
}
