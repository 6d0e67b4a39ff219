pub mod authentication;
pub mod config;
pub mod hashing;
pub mod identity;
pub mod persistence;

pub use authentication::{JwtTokenCodec, JwtTokenConfig};
pub use hashing::Argon2Hasher;
pub use identity::OsRngTokenIdGenerator;
pub use persistence::{
    HashMapUserCache, HashMapUserRepository, PostgresUserRepository, RedisUserCache,
};
