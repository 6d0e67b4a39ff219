use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use warden_core::{
    DateOfBirth, Email, PasswordHash, PatchedUser, Role, User, UserChanges, UserId, UserName,
    UserRepository, UserStoreError,
};

const USER_COLUMNS: &str =
    "id, name, date_of_birth, email, password_hash, role, created_at, updated_at";

#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        PostgresUserRepository { pool }
    }
}

#[derive(FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    date_of_birth: NaiveDate,
    email: String,
    password_hash: String,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = UserStoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User::restore(
            UserId::from(row.id),
            UserName::parse(row.name).map_err(corrupt)?,
            DateOfBirth::from(row.date_of_birth),
            Email::parse(row.email).map_err(corrupt)?,
            PasswordHash::new(row.password_hash),
            row.role.parse::<Role>().map_err(corrupt)?,
            row.created_at,
            row.updated_at,
        ))
    }
}

fn corrupt(e: impl std::fmt::Display) -> UserStoreError {
    UserStoreError::UnexpectedError(format!("Corrupt user row: {e}"))
}

fn unexpected(e: sqlx::Error) -> UserStoreError {
    UserStoreError::UnexpectedError(e.to_string())
}

fn map_write_error(e: sqlx::Error) -> UserStoreError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return UserStoreError::DuplicateEmail;
        }
    }
    UserStoreError::UnexpectedError(e.to_string())
}

#[async_trait::async_trait]
impl UserRepository for PostgresUserRepository {
    #[tracing::instrument(name = "Adding user to PostgreSQL", skip_all)]
    async fn create(&self, user: User) -> Result<User, UserStoreError> {
        let sql = format!(
            r#"
                INSERT INTO users (id, name, date_of_birth, email, password_hash, role, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                RETURNING {USER_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(Uuid::from(user.id()))
            .bind(user.name().as_str())
            .bind(user.date_of_birth().as_date())
            .bind(user.email().as_str())
            .bind(user.password_hash().expose())
            .bind(user.role().as_str())
            .bind(user.created_at())
            .bind(user.updated_at())
            .fetch_one(&self.pool)
            .await
            .map_err(map_write_error)?;

        row.try_into()
    }

    #[tracing::instrument(name = "Retrieving user by id from PostgreSQL", skip_all)]
    async fn get_by_id(&self, id: UserId) -> Result<User, UserStoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");

        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(Uuid::from(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(unexpected)?;

        let Some(row) = row else {
            return Err(UserStoreError::NotFound);
        };

        row.try_into()
    }

    #[tracing::instrument(name = "Retrieving user by email from PostgreSQL", skip_all)]
    async fn get_by_email(&self, email: &Email) -> Result<Option<User>, UserStoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");

        sqlx::query_as::<_, UserRow>(&sql)
            .bind(email.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(unexpected)?
            .map(User::try_from)
            .transpose()
    }

    #[tracing::instrument(name = "Updating user in PostgreSQL", skip_all)]
    async fn update(
        &self,
        id: UserId,
        changes: UserChanges,
        now: DateTime<Utc>,
    ) -> Result<PatchedUser, UserStoreError> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;

        // Row lock: the old email must belong to the version being patched.
        let previous_email: Option<String> =
            sqlx::query_scalar("SELECT email FROM users WHERE id = $1 FOR UPDATE")
                .bind(Uuid::from(id))
                .fetch_optional(&mut *tx)
                .await
                .map_err(unexpected)?;
        let Some(previous_email) = previous_email else {
            return Err(UserStoreError::NotFound);
        };

        let sql = format!(
            r#"
                UPDATE users
                SET name = COALESCE($2, name),
                    date_of_birth = COALESCE($3, date_of_birth),
                    email = COALESCE($4, email),
                    password_hash = COALESCE($5, password_hash),
                    updated_at = $6
                WHERE id = $1
                RETURNING {USER_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(Uuid::from(id))
            .bind(changes.name.as_ref().map(UserName::as_str))
            .bind(changes.date_of_birth.map(|dob| dob.as_date()))
            .bind(changes.email.as_ref().map(Email::as_str))
            .bind(changes.password_hash.as_ref().map(PasswordHash::expose))
            .bind(now)
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_write_error)?;

        let Some(row) = row else {
            return Err(UserStoreError::NotFound);
        };

        tx.commit().await.map_err(map_write_error)?;

        Ok(PatchedUser {
            user: row.try_into()?,
            previous_email: Email::parse(previous_email).map_err(corrupt)?,
        })
    }

    #[tracing::instrument(name = "Delete user from PostgreSQL", skip_all)]
    async fn delete(&self, id: UserId) -> Result<(), UserStoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(Uuid::from(id))
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;

        if result.rows_affected() == 0 {
            return Err(UserStoreError::NotFound);
        }

        Ok(())
    }
}
