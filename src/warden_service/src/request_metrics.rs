//! Prometheus request metrics.
//!
//! Every matched route is counted in `http_requests_total` and timed in
//! `api_request_duration_seconds`, both labelled with the route template,
//! method, status code and application name. `/metrics` serves the text
//! exposition format.

use std::{
    sync::{Arc, OnceLock},
    time::{Duration, Instant},
};

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

pub mod names {
    pub const HTTP_REQUESTS_TOTAL: &str = "http_requests_total";
    pub const API_REQUEST_DURATION_SECONDS: &str = "api_request_duration_seconds";

    pub const APP_NAME: &str = "warden";
}

/// Prometheus client default buckets, in seconds.
const DURATION_BUCKETS: &[f64] = &[
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

fn builder() -> PrometheusBuilder {
    PrometheusBuilder::new()
        .set_buckets(DURATION_BUCKETS)
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Invalid duration buckets, exporting summaries");
            PrometheusBuilder::new()
        })
}

/// Installs the process-wide Prometheus recorder on first use and returns its handle.
pub fn init_metrics() -> PrometheusHandle {
    PROMETHEUS_HANDLE
        .get_or_init(|| {
            let recorder = builder().build_recorder();
            let handle = recorder.handle();
            match metrics::set_global_recorder(recorder) {
                Ok(()) => tracing::info!("Prometheus metrics initialized"),
                Err(e) => tracing::warn!(error = %e, "Metrics recorder already installed"),
            }
            handle
        })
        .clone()
}

/// Records request metrics for one application and renders them on `/metrics`.
#[derive(Clone)]
pub struct RequestMetrics {
    app_name: Arc<str>,
    handle: PrometheusHandle,
}

impl RequestMetrics {
    pub fn new(app_name: impl Into<Arc<str>>, handle: PrometheusHandle) -> Self {
        Self {
            app_name: app_name.into(),
            handle,
        }
    }

    pub fn render(&self) -> String {
        self.handle.render()
    }

    pub fn record(&self, method: &str, path: &str, status: u16, duration: Duration) {
        let status = status.to_string();

        counter!(
            names::HTTP_REQUESTS_TOTAL,
            "path" => path.to_owned(),
            "method" => method.to_owned(),
            "status" => status.clone(),
            "app_name" => self.app_name.to_string()
        )
        .increment(1);

        histogram!(
            names::API_REQUEST_DURATION_SECONDS,
            "path" => path.to_owned(),
            "method" => method.to_owned(),
            "status" => status,
            "app_name" => self.app_name.to_string()
        )
        .record(duration.as_secs_f64());
    }
}

/// Route middleware. Labels by the route template so `/users/{id}` stays one series.
pub async fn track_metrics(
    State(metrics): State<RequestMetrics>,
    request: Request,
    next: Next,
) -> Response {
    let started = Instant::now();
    let path = match request.extensions().get::<MatchedPath>() {
        Some(matched) => matched.as_str().to_owned(),
        None => request.uri().path().to_owned(),
    };
    let method = request.method().to_string();

    let response = next.run(request).await;

    metrics.record(
        &method,
        &path,
        response.status().as_u16(),
        started.elapsed(),
    );
    response
}
