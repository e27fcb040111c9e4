//! The Voyager enrichment route.
//!
//! `GET /api/voyagers` reads the probes snapshot and composes it with
//! the planets snapshot (same cache, same correlation id) to derive
//! Earth-relative values: unit conversions, Sun/Earth distances, scalar
//! speed, light travel time over the Earth distance, and ecliptic
//! direction angles for position and velocity.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::Json;
use tracing::error;

use helios_engine::derived::{
    self, au_per_day_to_km_per_s, au_to_km, km_to_miles, light_time, KM_PER_MILE,
};
use helios_engine::SnapshotOptions;
use helios_types::{
    catalog::find, DistanceTriple, LightTimePayload, SpeedTriple, StateVector, TrajectoryPayload,
    Vector3, VoyagerPayload, VoyagersMetadata, VoyagersResponse,
};

use crate::error::ApiError;
use crate::handlers::cache_headers;
use crate::request_meta::{correlation_id, refresh_requested, SnapshotQuery};
use crate::state::AppState;

/// `GET /api/voyagers`.
pub async fn get_voyagers(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SnapshotQuery>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let request_id = correlation_id(&headers);
    let force = refresh_requested(&query, &headers);

    let probes = state
        .engine
        .probes_snapshot(SnapshotOptions {
            force_refresh: force,
            correlation_id: Some(request_id.clone()),
        })
        .await
        .map_err(|e| {
            error!(correlation_id = %request_id, error = %e, "voyagers_fetch_failed");
            ApiError::Refresh { message: e.to_string(), request_id: request_id.clone() }
        })?;

    // The enrichment needs Earth; the planets snapshot shares its cache
    // with the planets routes and is never force-refreshed from here.
    let planets = state
        .engine
        .planets_snapshot(SnapshotOptions {
            force_refresh: false,
            correlation_id: Some(request_id.clone()),
        })
        .await
        .map_err(|e| {
            error!(correlation_id = %request_id, error = %e, "voyagers_fetch_failed");
            ApiError::Refresh { message: e.to_string(), request_id: request_id.clone() }
        })?;

    let earth = planets.snapshot.body("earth").map(StateVector::position);

    let voyagers = probes
        .snapshot
        .bodies
        .iter()
        .map(|sv| enrich(sv, earth))
        .collect();

    let response = VoyagersResponse {
        timestamp: probes.snapshot.timestamp.clone(),
        request_id: request_id.clone(),
        metadata: VoyagersMetadata {
            source: "horizons".to_owned(),
            unit_distance_base: probes.snapshot.distance_unit.clone(),
            unit_velocity_base: probes.snapshot.velocity_unit.clone(),
            unit_distance_converted: vec!["km".to_owned(), "miles".to_owned()],
            unit_velocity_converted: vec!["km/s".to_owned(), "miles/s".to_owned()],
        },
        voyagers,
    };

    Ok((cache_headers(&probes), Json(response)))
}

/// Derive the full per-probe payload from its state vector and Earth's
/// position (when the planets snapshot carried one).
fn enrich(sv: &StateVector, earth: Option<(f64, f64, f64)>) -> VoyagerPayload {
    let entry = find(&sv.name);

    let position_au = Vector3 { x: sv.x, y: sv.y, z: sv.z };
    let position_km = scale(position_au, au_to_km(1.0));
    let position_miles = scale(position_km, 1.0 / KM_PER_MILE);

    let velocity_au_per_day = sv.velocity.map(|v| Vector3 { x: v.vx, y: v.vy, z: v.vz });
    let velocity_km_per_s = velocity_au_per_day.map(|v| scale(v, au_per_day_to_km_per_s(1.0)));
    let velocity_miles_per_s = velocity_km_per_s.map(|v| scale(v, 1.0 / KM_PER_MILE));

    let distance_from_sun = derived::magnitude(sv.x, sv.y, sv.z)
        .map_or_else(|| distance_triple(0.0), distance_triple);
    let earth_au = earth.and_then(|e| derived::delta_magnitude(sv.position(), e));
    let distance_from_earth = earth_au.map(distance_triple);

    let speed = sv
        .velocity
        .and_then(|v| derived::magnitude(v.vx, v.vy, v.vz))
        .map(|au_per_day| SpeedTriple {
            au_per_day,
            km_per_s: au_per_day_to_km_per_s(au_per_day),
            miles_per_s: au_per_day_to_km_per_s(au_per_day) / KM_PER_MILE,
        });

    let light = earth_au.map(|au| {
        let lt = light_time(au_to_km(au));
        LightTimePayload {
            one_way_seconds: lt.one_way_seconds,
            one_way_minutes: lt.one_way_minutes,
            two_way_minutes: lt.two_way_minutes,
        }
    });

    let position_angles = derived::ecliptic(sv.x, sv.y, sv.z);
    let velocity_angles = sv.velocity.and_then(|v| derived::ecliptic(v.vx, v.vy, v.vz));

    VoyagerPayload {
        id: sv.name.clone(),
        name: entry.map_or_else(|| sv.name.clone(), |e| e.label.to_owned()),
        horizons_id: entry.map_or_else(String::new, |e| e.horizons_id.to_owned()),
        position_au,
        position_km,
        position_miles,
        velocity_au_per_day,
        velocity_km_per_s,
        velocity_miles_per_s,
        distance_from_sun,
        distance_from_earth,
        speed,
        light_time: light,
        trajectory: TrajectoryPayload {
            ecliptic_lat_deg: position_angles.map_or(0.0, |a| a.lat_deg),
            ecliptic_lon_deg: position_angles.map_or(0.0, |a| a.lon_deg),
            velocity_azimuth_deg: velocity_angles.map(|a| a.lon_deg),
            velocity_lat_deg: velocity_angles.map(|a| a.lat_deg),
        },
        timestamp: sv.timestamp.clone(),
        reference_frame: sv.reference_frame.clone(),
        source: sv.source.clone(),
        velocity_unit: "AU/day".to_owned(),
    }
}

fn scale(v: Vector3, factor: f64) -> Vector3 {
    Vector3 { x: v.x * factor, y: v.y * factor, z: v.z * factor }
}

fn distance_triple(au: f64) -> DistanceTriple {
    let km = au_to_km(au);
    DistanceTriple { au, km, miles: km_to_miles(km) }
}
