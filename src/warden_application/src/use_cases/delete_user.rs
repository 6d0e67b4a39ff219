use warden_core::{UserId, UserStore, UserStoreError};

#[derive(Debug, thiserror::Error)]
pub enum DeleteUserError {
    #[error("User not found")]
    NotFound,
    #[error("User store error: {0}")]
    Store(UserStoreError),
}

impl From<UserStoreError> for DeleteUserError {
    fn from(error: UserStoreError) -> Self {
        match error {
            UserStoreError::NotFound => DeleteUserError::NotFound,
            other => DeleteUserError::Store(other),
        }
    }
}

pub struct DeleteUserUseCase<'a, U>
where
    U: UserStore,
{
    user_store: &'a U,
}

impl<'a, U> DeleteUserUseCase<'a, U>
where
    U: UserStore,
{
    pub fn new(user_store: &'a U) -> Self {
        Self { user_store }
    }

    #[tracing::instrument(name = "DeleteUserUseCase::execute", skip(self))]
    pub async fn execute(&self, id: UserId) -> Result<(), DeleteUserError> {
        self.user_store.remove(id).await.inspect_err(|e| match e {
            UserStoreError::NotFound => tracing::info!("Delete failed: user not found"),
            other => tracing::error!(error = %other, "Failed to delete user"),
        })?;

        tracing::info!("User deleted");
        Ok(())
    }
}
