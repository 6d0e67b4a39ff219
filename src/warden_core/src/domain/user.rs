use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use super::{
    date_of_birth::DateOfBirth, email::Email, password::PasswordHash, role::Role,
    user_id::UserId, user_name::UserName,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("Invalid email address")]
    InvalidEmail,
    #[error("Password must be at least 8 characters long")]
    PasswordTooShort,
    #[error("Name must be between 2 and 50 characters long")]
    InvalidName,
    #[error("Invalid date format, expected YYYY-MM-DD")]
    InvalidDateOfBirth,
    #[error("User must be at least {0} years old")]
    TooYoung(u32),
    #[error("Invalid user ID format")]
    InvalidUserId,
}

/// The identity record. Only ever holds a password hash, never plaintext.
///
/// `User` is not `Serialize`. Outward representations go through
/// [`UserProfile`], which has no password field at all.
#[derive(Debug, Clone)]
pub struct User {
    id: UserId,
    name: UserName,
    date_of_birth: DateOfBirth,
    email: Email,
    password_hash: PasswordHash,
    role: Role,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// A brand new standard user with a fresh identifier.
    pub fn register(
        name: UserName,
        date_of_birth: DateOfBirth,
        email: Email,
        password_hash: PasswordHash,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: UserId::new(),
            name,
            date_of_birth,
            email,
            password_hash,
            role: Role::StandardUser,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuilds a record loaded from storage.
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: UserId,
        name: UserName,
        date_of_birth: DateOfBirth,
        email: Email,
        password_hash: PasswordHash,
        role: Role,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            date_of_birth,
            email,
            password_hash,
            role,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn name(&self) -> &UserName {
        &self.name
    }

    pub fn date_of_birth(&self) -> DateOfBirth {
        self.date_of_birth
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// Applies a partial update. Identity, role and creation time never change.
    pub fn apply(mut self, changes: UserChanges, now: DateTime<Utc>) -> Self {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(date_of_birth) = changes.date_of_birth {
            self.date_of_birth = date_of_birth;
        }
        if let Some(email) = changes.email {
            self.email = email;
        }
        if let Some(password_hash) = changes.password_hash {
            self.password_hash = password_hash;
        }
        self.updated_at = now;
        self
    }

    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            name: self.name.clone(),
            date_of_birth: self.date_of_birth,
            email: self.email.clone(),
            role: self.role,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Validated field changes for an existing user. `None` leaves a field as is.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<UserName>,
    pub date_of_birth: Option<DateOfBirth>,
    pub email: Option<Email>,
    pub password_hash: Option<PasswordHash>,
}

/// What callers get to see of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProfile {
    pub id: UserId,
    pub name: UserName,
    pub date_of_birth: DateOfBirth,
    pub email: Email,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            date_of_birth: user.date_of_birth,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}
