mod helpers;
mod request_metrics;
mod telemetry;
mod user_service;

pub use helpers::{configure_postgresql, configure_redis, get_postgres_pool, get_redis_client};
pub use request_metrics::{RequestMetrics, init_metrics, names as metric_names};
pub use telemetry::init_tracing;
pub use user_service::UserService;
