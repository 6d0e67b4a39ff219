pub mod domain;
pub mod ports;

// Re-export commonly used types for convenience
pub use domain::{
    date_of_birth::DateOfBirth,
    email::Email,
    password::{Password, PasswordHash},
    role::Role,
    token::{Token, TokenPayload},
    user::{User, UserChanges, UserError, UserProfile},
    user_id::UserId,
    user_name::UserName,
};

pub use ports::{
    repositories::{
        Cache, CacheError, PatchedUser, UserRepository, UserStore, UserStoreError,
    },
    services::{
        Clock, HashingError, PasswordHasher, SystemClock, TokenCodec, TokenError,
        TokenIdGenerator,
    },
};
