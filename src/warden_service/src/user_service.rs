use std::time::Duration;

use axum::{
    Router,
    http::{
        HeaderValue, Method, request,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    middleware,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use warden_adapters::config::AllowedOrigins;
use warden_axum::{
    AppState,
    routes::{delete_user, get_user, login, register, update_user},
};
use warden_core::{PasswordHasher, TokenCodec, UserStore};

use crate::{
    request_metrics::{RequestMetrics, track_metrics},
    telemetry::{make_span_with_request_id, on_request, on_response},
};

/// The user service: registration, login and the owner-guarded `/users/{id}` resource.
pub struct UserService {
    router: Router,
}

impl UserService {
    /// Builds the routes over the given state.
    ///
    /// # Arguments
    /// * `state` - Store, hasher, authorization gate and clock shared by all handlers
    pub fn new<S, H, T>(state: AppState<S, H, T>) -> Self
    where
        S: UserStore + Clone + 'static,
        H: PasswordHasher + Clone + 'static,
        T: TokenCodec + Clone + 'static,
    {
        let router = Router::new()
            .route("/register", post(register::<S, H, T>))
            .route("/login", post(login::<S, H, T>))
            .route(
                "/users/{id}",
                get(get_user::<S, H, T>)
                    .put(update_user::<S, H, T>)
                    .delete(delete_user::<S, H, T>),
            )
            .with_state(state);

        Self { router }
    }

    /// Counts and times every route added so far and exposes them on `/metrics`.
    pub fn with_metrics(mut self, metrics: RequestMetrics) -> Self {
        let exporter = metrics.clone();
        self.router = self
            .router
            .route_layer(middleware::from_fn_with_state(metrics, track_metrics))
            .route(
                "/metrics",
                get(move || std::future::ready(exporter.render())),
            );
        self
    }

    fn with_trace_layer(mut self) -> Self {
        self.router = self.router.layer(
            TraceLayer::new_for_http()
                .make_span_with(make_span_with_request_id)
                .on_request(on_request)
                .on_response(on_response),
        );
        self
    }

    /// Convert the service into a router that can be mounted on another router
    ///
    /// # Arguments
    /// * `allowed_origins` - Optional list of allowed CORS origins
    /// * `request_timeout` - Deadline for a whole request; slower requests get 408
    pub fn as_nested_router(
        mut self,
        allowed_origins: Option<AllowedOrigins>,
        request_timeout: Duration,
    ) -> Router {
        self.router = self.router.layer(TimeoutLayer::new(request_timeout));

        if let Some(allowed_origins) = allowed_origins {
            let cors = CorsLayer::new()
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_headers([AUTHORIZATION, CONTENT_TYPE])
                .allow_credentials(true)
                .allow_origin(AllowOrigin::predicate(
                    move |origin: &HeaderValue, _request_parts: &request::Parts| {
                        origin
                            .to_str()
                            .is_ok_and(|origin| allowed_origins.contains(origin))
                    },
                ));

            self.router = self.router.layer(cors);
        }
        self.with_trace_layer().router
    }

    /// Run the service as a standalone server
    pub async fn run_standalone(
        self,
        listener: TcpListener,
        allowed_origins: Option<AllowedOrigins>,
        request_timeout: Duration,
    ) -> Result<(), std::io::Error> {
        let router = self.as_nested_router(allowed_origins, request_timeout);

        tracing::info!("User service listening on {}", listener.local_addr()?);

        axum_server::Server::<std::net::SocketAddr>::from_listener(listener)
            .serve(router.into_make_service())
            .await
    }
}
