use color_eyre::eyre::{Result, WrapErr};
use redis::{Client, RedisResult, aio::MultiplexedConnection};
use secrecy::ExposeSecret;
use sqlx::{PgPool, postgres::PgPoolOptions};
use warden_adapters::config::{PostgresSettings, RedisSettings};

/// Connects to PostgreSQL and runs all pending migrations.
pub async fn configure_postgresql(settings: &PostgresSettings) -> Result<PgPool> {
    let pg_pool = get_postgres_pool(settings.url.expose_secret(), settings.max_connections)
        .await
        .wrap_err("Failed to create Postgres connection pool")?;

    sqlx::migrate!()
        .run(&pg_pool)
        .await
        .wrap_err("Failed to run migrations")?;

    Ok(pg_pool)
}

/// Opens one multiplexed connection, shared by every clone of the cache.
pub async fn configure_redis(settings: &RedisSettings) -> Result<MultiplexedConnection> {
    get_redis_client(&settings.url())
        .wrap_err("Failed to get Redis client")?
        .get_multiplexed_async_connection()
        .await
        .wrap_err("Failed to get Redis connection")
}

pub async fn get_postgres_pool(url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(url)
        .await
}

pub fn get_redis_client(redis_url: &str) -> RedisResult<Client> {
    redis::Client::open(redis_url)
}
