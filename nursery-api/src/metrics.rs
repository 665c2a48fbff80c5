//! Prometheus Metrics
//!
//! # Metrics
//!
//! ## Counters
//! - `nursery_http_requests_total` - HTTP requests by method, path, status
//! - `nursery_catalog_writes_total` - catalog writes by operation and outcome
//!
//! ## Histograms
//! - `nursery_http_request_duration_seconds` - HTTP request duration
//!
//! # Configuration
//!
//! - `NURSERY_METRICS_ENABLED`: expose `/metrics` (default: true)

use axum::{extract::Request, middleware::Next, response::Response};
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::Instant;

/// Metrics configuration
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Whether metrics are enabled
    pub enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl MetricsConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let enabled = std::env::var("NURSERY_METRICS_ENABLED")
            .map(|v| v.to_lowercase() != "false" && v != "0")
            .unwrap_or(true);

        Self { enabled }
    }

    pub fn disabled() -> Self {
        Self { enabled: false }
    }
}

static RECORDER: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder.
///
/// The recorder is process-global; later calls reuse the installed handle.
pub fn init_metrics(config: &MetricsConfig) -> Result<Option<PrometheusHandle>, String> {
    if !config.enabled {
        tracing::info!("Metrics disabled");
        return Ok(None);
    }

    if let Some(handle) = RECORDER.get() {
        return Ok(Some(handle.clone()));
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| format!("Failed to install metrics recorder: {}", e))?;

    tracing::info!("Metrics initialized");
    Ok(Some(RECORDER.get_or_init(|| handle).clone()))
}

/// Record a request metric
pub fn record_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", normalize_path(path)),
        ("status", status.to_string()),
    ];

    counter!("nursery_http_requests_total", &labels).increment(1);
    histogram!("nursery_http_request_duration_seconds", &labels).record(duration_secs);
}

/// Record a catalog write
pub fn record_write(operation: &'static str, succeeded: bool) {
    let outcome = if succeeded { "ok" } else { "error" };
    counter!("nursery_catalog_writes_total", "operation" => operation, "outcome" => outcome)
        .increment(1);
}

/// Normalize path for metric labels (collapse record ids)
fn normalize_path(path: &str) -> String {
    let normalized = path
        .split('/')
        .map(|part| {
            if part.len() >= 8 && part.chars().all(|c| c.is_ascii_hexdigit() || c == '-') {
                ":id"
            } else {
                part
            }
        })
        .collect::<Vec<_>>()
        .join("/");

    if normalized.len() > 50 {
        normalized.chars().take(50).collect()
    } else {
        normalized
    }
}

/// Metrics middleware for tracking HTTP requests
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    record_request(
        &method,
        &path,
        response.status().as_u16(),
        start.elapsed().as_secs_f64(),
    );

    response
}
