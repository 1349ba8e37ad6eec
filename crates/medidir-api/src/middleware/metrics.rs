//! HTTP request metrics middleware.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{MatchedPath, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry};

use medidir_core::error::AppError;

const LABELS: [&str; 3] = ["method", "endpoint", "status"];

/// Endpoint label for requests that matched no route. Raw paths are never
/// used as labels.
const UNMATCHED: &str = "unmatched";

/// Request collectors, labelled by method, route template, and status.
#[derive(Debug, Clone)]
pub struct HttpMetrics {
    pub requests_total: IntCounterVec,
    pub request_duration: HistogramVec,
    pub failed_requests_total: IntCounterVec,
}

impl HttpMetrics {
    /// Create the collectors and register them on `registry`.
    pub fn new(registry: &Registry) -> Result<Self, AppError> {
        let requests_total = IntCounterVec::new(
            Opts::new("server_http_requests_total", "Total HTTP requests"),
            &LABELS,
        )
        .map_err(register_error)?;
        let request_duration = HistogramVec::new(
            HistogramOpts::new(
                "server_http_request_duration_seconds",
                "HTTP request duration in seconds",
            ),
            &LABELS,
        )
        .map_err(register_error)?;
        let failed_requests_total = IntCounterVec::new(
            Opts::new(
                "server_http_failed_requests_total",
                "HTTP requests answered with a 4xx or 5xx status",
            ),
            &LABELS,
        )
        .map_err(register_error)?;

        registry
            .register(Box::new(requests_total.clone()))
            .map_err(register_error)?;
        registry
            .register(Box::new(request_duration.clone()))
            .map_err(register_error)?;
        registry
            .register(Box::new(failed_requests_total.clone()))
            .map_err(register_error)?;

        Ok(Self {
            requests_total,
            request_duration,
            failed_requests_total,
        })
    }

    fn observe(&self, method: &str, endpoint: &str, status: u16, seconds: f64) {
        let failed = status >= 400;
        let status = status.to_string();
        let labels = [method, endpoint, status.as_str()];
        self.requests_total.with_label_values(&labels).inc();
        self.request_duration
            .with_label_values(&labels)
            .observe(seconds);
        if failed {
            self.failed_requests_total.with_label_values(&labels).inc();
        }
    }
}

fn register_error(e: prometheus::Error) -> AppError {
    AppError::internal(format!("Failed to register HTTP metrics: {e}"))
}

/// Counts and times every request.
pub async fn track_http_metrics(
    State(metrics): State<Arc<HttpMetrics>>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().to_string();
    let endpoint = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED.to_string());
    let start = Instant::now();

    let response = next.run(request).await;

    metrics.observe(
        &method,
        &endpoint,
        response.status().as_u16(),
        start.elapsed().as_secs_f64(),
    );
    response
}
