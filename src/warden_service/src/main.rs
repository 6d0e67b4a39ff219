use std::sync::Arc;

use color_eyre::eyre::Result;
use tokio::net::TcpListener;
use warden_adapters::{
    Argon2Hasher, JwtTokenCodec, JwtTokenConfig, PostgresUserRepository, RedisUserCache,
    config::WardenSettings,
};
use warden_application::{AuthorizationGate, CacheAsideUserStore};
use warden_axum::AppState;
use warden_core::SystemClock;
use warden_service::{
    RequestMetrics, UserService, configure_postgresql, configure_redis, init_metrics,
    init_tracing, metric_names,
};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing()?;

    let settings = WardenSettings::load()?;

    let pg_pool = configure_postgresql(&settings.postgres).await?;
    let redis_conn = configure_redis(&settings.redis).await?;

    let user_store = CacheAsideUserStore::new(
        PostgresUserRepository::new(pg_pool),
        RedisUserCache::new(redis_conn),
    );
    let token_codec = JwtTokenCodec::new(JwtTokenConfig::new(
        settings.token.secret.clone(),
        &settings.token.duration,
    ));

    let state = AppState::new(
        user_store,
        Argon2Hasher::new(),
        AuthorizationGate::new(token_codec),
        Arc::new(SystemClock),
    );

    let listener = TcpListener::bind(settings.application.address()).await?;
    tracing::info!("Starting warden user service...");

    UserService::new(state)
        .with_metrics(RequestMetrics::new(metric_names::APP_NAME, init_metrics()))
        .run_standalone(
            listener,
            Some(settings.allowed_origins.clone()),
            settings.application.request_timeout(),
        )
        .await?;

    Ok(())
}
