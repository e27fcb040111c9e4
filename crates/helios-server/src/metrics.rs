//! Prometheus metrics recorder and exposition endpoint.
//!
//! The engine and cache crates emit through the `metrics` facade; this
//! module owns the exporter. The recorder is installed once per process
//! and the `/metrics` route renders its handle as Prometheus text.

use std::sync::OnceLock;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use metrics::{describe_counter, describe_gauge, describe_histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};

/// Histogram buckets for `fetch_duration_ms`.
const FETCH_DURATION_BUCKETS: [f64; 9] =
    [50.0, 100.0, 200.0, 400.0, 800.0, 1200.0, 2000.0, 4000.0, 8000.0];

static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the global metrics recorder with the Prometheus exporter.
///
/// Safe to call multiple times; subsequent calls are no-ops. Returns a
/// handle for rendering; the handle is also kept globally for the
/// `/metrics` endpoint.
///
/// # Panics
///
/// Panics when the recorder cannot be installed. Metrics are part of the
/// service contract, so the server does not start without them.
#[allow(clippy::expect_used)]
pub fn init_metrics() -> PrometheusHandle {
    PROMETHEUS_HANDLE
        .get_or_init(|| {
            let handle = PrometheusBuilder::new()
                .set_buckets_for_metric(
                    Matcher::Full("fetch_duration_ms".to_owned()),
                    &FETCH_DURATION_BUCKETS,
                )
                .expect("fetch_duration_ms bucket list is non-empty")
                .install_recorder()
                .expect("failed to install prometheus recorder");

            describe_counter!("cache_hits", "Snapshot reads served from cache, by backend and freshness state");
            describe_counter!("cache_misses", "Upstream refresh cycles, by backend and trigger reason");
            describe_histogram!("fetch_duration_ms", "Wall time of upstream fan-out cycles in milliseconds");
            describe_gauge!("cache_age_ms", "Age of the record served by the most recent cache hit");

            tracing::info!("prometheus recorder initialized");
            handle
        })
        .clone()
}

/// The global Prometheus handle, when initialized.
pub fn prometheus_handle() -> Option<PrometheusHandle> {
    PROMETHEUS_HANDLE.get().cloned()
}

/// Handler for `GET /metrics`.
pub async fn serve_metrics() -> impl IntoResponse {
    prometheus_handle().map_or_else(
        || {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                [("content-type", "text/plain; charset=utf-8")],
                "metrics recorder not initialized".to_owned(),
            )
        },
        |handle| {
            (
                StatusCode::OK,
                [("content-type", "text/plain; charset=utf-8")],
                handle.render(),
            )
        },
    )
}
