pub mod hashmap_user_cache;
pub mod hashmap_user_repository;
pub mod postgres_user_repository;
pub mod redis_user_cache;

pub use hashmap_user_cache::HashMapUserCache;
pub use hashmap_user_repository::HashMapUserRepository;
pub use postgres_user_repository::PostgresUserRepository;
pub use redis_user_cache::RedisUserCache;
