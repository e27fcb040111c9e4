//! Snapshot route handlers.
//!
//! Each snapshot route derives a correlation id, parses the
//! forced-refresh signal, calls the engine, and serializes the result
//! with the cache-state response headers the dashboard depends on.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{HeaderMap, HeaderName, HeaderValue};
use axum::response::IntoResponse;
use axum::Json;
use tracing::error;

use helios_engine::{SnapshotOptions, SnapshotResult};
use helios_types::{BodyPayload, PlanetsResponse, SnapshotMetadata};

use crate::error::ApiError;
use crate::request_meta::{correlation_id, refresh_requested, SnapshotQuery};
use crate::state::AppState;

/// `GET /` -- static health string.
pub async fn index() -> &'static str {
    "helios ephemeris service: ok\n"
}

/// `GET /api/ephemeris/planets` (and its `/state-vectors` alias).
pub async fn get_planets(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SnapshotQuery>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let request_id = correlation_id(&headers);
    let opts = SnapshotOptions {
        force_refresh: refresh_requested(&query, &headers),
        correlation_id: Some(request_id.clone()),
    };

    let result = state.engine.planets_snapshot(opts).await.map_err(|e| {
        error!(correlation_id = %request_id, error = %e, "planets_fetch_failed");
        ApiError::Refresh { message: e.to_string(), request_id: request_id.clone() }
    })?;

    Ok((cache_headers(&result), Json(snapshot_payload(&result))))
}

/// `GET /api/ephemeris/probes` -- the raw probes snapshot, without the
/// Earth-relative enrichment of `/api/voyagers`.
pub async fn get_probes(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SnapshotQuery>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let request_id = correlation_id(&headers);
    let opts = SnapshotOptions {
        force_refresh: refresh_requested(&query, &headers),
        correlation_id: Some(request_id.clone()),
    };

    let result = state.engine.probes_snapshot(opts).await.map_err(|e| {
        error!(correlation_id = %request_id, error = %e, "probes_fetch_failed");
        ApiError::Refresh { message: e.to_string(), request_id: request_id.clone() }
    })?;

    Ok((cache_headers(&result), Json(snapshot_payload(&result))))
}

/// Build the cache-state response headers for a snapshot result.
pub fn cache_headers(result: &SnapshotResult) -> HeaderMap {
    let mut headers = HeaderMap::new();
    insert(&mut headers, "x-horizons-cache", result.cache_state.as_str());
    insert(&mut headers, "x-horizons-cache-backend", result.backend.as_str());
    insert(&mut headers, "x-horizons-cache-age", &result.cache_age_ms.to_string());
    insert(&mut headers, "x-horizons-ttl", &result.ttl_ms.to_string());
    insert(
        &mut headers,
        "x-horizons-cache-stale",
        if result.cache_state.is_stale() { "1" } else { "0" },
    );
    insert(
        &mut headers,
        "x-horizons-frozen",
        if result.frozen_snapshot { "1" } else { "0" },
    );
    insert(
        &mut headers,
        "x-horizons-latency",
        &result.snapshot.response_time_ms.to_string(),
    );
    insert(&mut headers, "x-request-id", &result.request_id);
    headers
}

fn insert(headers: &mut HeaderMap, name: &'static str, value: &str) {
    if let Ok(value) = HeaderValue::from_str(value) {
        headers.insert(HeaderName::from_static(name), value);
    }
}

/// Serialize a snapshot result into the wire payload.
pub fn snapshot_payload(result: &SnapshotResult) -> PlanetsResponse {
    let bodies = result
        .snapshot
        .bodies
        .iter()
        .map(|sv| BodyPayload {
            name: sv.name.clone(),
            x_au: sv.x,
            y_au: sv.y,
            z_au: sv.z,
            vx: sv.velocity.map(|v| v.vx),
            vy: sv.velocity.map(|v| v.vy),
            vz: sv.velocity.map(|v| v.vz),
            velocity_unit: result.snapshot.velocity_unit.clone(),
        })
        .collect();

    PlanetsResponse {
        timestamp: result.snapshot.timestamp.clone(),
        metadata: SnapshotMetadata {
            source: "horizons".to_owned(),
            reference_frame: result.snapshot.reference_frame.clone(),
            distance_unit: result.snapshot.distance_unit.clone(),
            velocity_unit: result.snapshot.velocity_unit.clone(),
            response_time_ms: result.snapshot.response_time_ms,
            cache_status: result.cache_state.as_str().to_owned(),
            cache_backend: result.backend.as_str().to_owned(),
            cache_age_ms: result.cache_age_ms,
            cache_expires_in_ms: result.cache_expires_in_ms,
            cache_stale: result.cache_state.is_stale(),
            generated_at: result.generated_at.to_rfc3339(),
            frozen_snapshot: result.frozen_snapshot.then_some(true),
            freeze_reason: result.freeze_reason.clone(),
            request_id: Some(result.request_id.clone()),
        },
        bodies,
    }
}
