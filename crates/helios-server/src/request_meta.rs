//! Per-request metadata extraction.
//!
//! Correlation ids arrive as `X-Request-Id` or `X-Correlation-Id` and
//! are generated when absent. The forced-refresh signal is accepted as
//! a query parameter (`?refresh=1|true`) or a header
//! (`X-Refresh-Cache: 1|true`); the first matching input wins.

use axum::http::HeaderMap;
use serde::Deserialize;
use uuid::Uuid;

/// Query parameters accepted by the snapshot routes.
#[derive(Debug, Default, Deserialize)]
pub struct SnapshotQuery {
    /// Forced-refresh signal (`1` or `true`).
    pub refresh: Option<String>,
}

/// Resolve the correlation id for a request.
///
/// `X-Request-Id` wins over `X-Correlation-Id`; a v7 UUID is generated
/// when neither header is present or readable.
pub fn correlation_id(headers: &HeaderMap) -> String {
    for name in ["x-request-id", "x-correlation-id"] {
        if let Some(value) = headers.get(name).and_then(|v| v.to_str().ok()) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return trimmed.to_owned();
            }
        }
    }
    Uuid::now_v7().to_string()
}

/// Whether the request forces an upstream refresh.
pub fn refresh_requested(query: &SnapshotQuery, headers: &HeaderMap) -> bool {
    if let Some(value) = &query.refresh {
        return truthy(value);
    }
    headers
        .get("x-refresh-cache")
        .and_then(|v| v.to_str().ok())
        .is_some_and(truthy)
}

fn truthy(value: &str) -> bool {
    let value = value.trim();
    value == "1" || value.eq_ignore_ascii_case("true")
}
