use warden_core::{UserId, UserProfile, UserStore, UserStoreError};

#[derive(Debug, thiserror::Error)]
pub enum GetUserError {
    #[error("User not found")]
    NotFound,
    #[error("User store error: {0}")]
    Store(UserStoreError),
}

impl From<UserStoreError> for GetUserError {
    fn from(error: UserStoreError) -> Self {
        match error {
            UserStoreError::NotFound => GetUserError::NotFound,
            other => GetUserError::Store(other),
        }
    }
}

pub struct GetUserUseCase<'a, U>
where
    U: UserStore,
{
    user_store: &'a U,
}

impl<'a, U> GetUserUseCase<'a, U>
where
    U: UserStore,
{
    pub fn new(user_store: &'a U) -> Self {
        Self { user_store }
    }

    #[tracing::instrument(name = "GetUserUseCase::execute", skip(self))]
    pub async fn execute(&self, id: UserId) -> Result<UserProfile, GetUserError> {
        let user = self
            .user_store
            .find_by_id(id)
            .await
            .inspect_err(|e| match e {
                UserStoreError::NotFound => tracing::info!("User not found"),
                other => tracing::error!(error = %other, "Failed to get user"),
            })?;
        Ok(user.into())
    }
}
