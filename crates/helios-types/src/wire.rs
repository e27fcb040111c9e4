//! JSON payload types for the HTTP surface.
//!
//! These are the exact shapes the dashboard consumes; they are exported
//! to `TypeScript` via `ts-rs`. Field casing follows the wire contract
//! (camelCase metadata, `x_au`-style body coordinates), not Rust
//! convention, so serde renames are explicit.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Planets / probes snapshot payload
// ---------------------------------------------------------------------------

/// Snapshot-level metadata block, including the cache decoration the
/// dashboard uses to render degradation banners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMetadata {
    /// Upstream source tag (e.g. `horizons`).
    pub source: String,
    /// Reference frame shared by all bodies.
    pub reference_frame: String,
    /// Distance unit, always `AU`.
    pub distance_unit: String,
    /// Velocity unit, always `AU/day`.
    pub velocity_unit: String,
    /// Aggregate upstream response time for the producing fan-out (ms).
    pub response_time_ms: u64,
    /// Cache state label: `HIT`, `MISS`, `STALE`, or `FROZEN`.
    pub cache_status: String,
    /// Which tier answered: `memory` or `shared`.
    pub cache_backend: String,
    /// Age of the served record (ms); 0 on a miss.
    pub cache_age_ms: u64,
    /// Remaining freshness (ms); 0 once stale or frozen.
    pub cache_expires_in_ms: u64,
    /// True for `STALE` and `FROZEN` responses.
    pub cache_stale: bool,
    /// When this response was decorated (RFC 3339).
    pub generated_at: String,
    /// Present and true only on frozen responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frozen_snapshot: Option<bool>,
    /// Why the snapshot is frozen, when it is.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freeze_reason: Option<String>,
    /// Correlation id for this request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// One body row in a snapshot payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct BodyPayload {
    /// Internal body name (e.g. `earth`).
    pub name: String,
    /// Heliocentric X position (AU).
    pub x_au: f64,
    /// Heliocentric Y position (AU).
    pub y_au: f64,
    /// Heliocentric Z position (AU).
    pub z_au: f64,
    /// X velocity (AU/day), when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vx: Option<f64>,
    /// Y velocity (AU/day), when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vy: Option<f64>,
    /// Z velocity (AU/day), when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vz: Option<f64>,
    /// Velocity unit, always `AU/day`.
    #[serde(rename = "velocityUnit")]
    pub velocity_unit: String,
}

/// Response body for the planets and probes snapshot routes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PlanetsResponse {
    /// Snapshot timestamp (first body's, or wall clock at assembly).
    pub timestamp: String,
    /// Snapshot metadata and cache decoration.
    pub metadata: SnapshotMetadata,
    /// Bodies in catalog order.
    pub bodies: Vec<BodyPayload>,
}

// ---------------------------------------------------------------------------
// Voyagers payload
// ---------------------------------------------------------------------------

/// A plain 3-component vector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Vector3 {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component.
    pub z: f64,
}

/// A distance expressed in all three served units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct DistanceTriple {
    /// Astronomical units.
    pub au: f64,
    /// Kilometers.
    pub km: f64,
    /// Miles.
    pub miles: f64,
}

/// A scalar speed expressed in all three served units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "camelCase")]
pub struct SpeedTriple {
    /// AU per day.
    pub au_per_day: f64,
    /// Kilometers per second.
    pub km_per_s: f64,
    /// Miles per second.
    pub miles_per_s: f64,
}

/// Light travel time over a probe's Earth distance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "camelCase")]
pub struct LightTimePayload {
    /// One-way travel time in seconds.
    pub one_way_seconds: f64,
    /// One-way travel time in minutes.
    pub one_way_minutes: f64,
    /// Round-trip travel time in minutes.
    pub two_way_minutes: f64,
}

/// Direction-of-travel angles in the ecliptic frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "camelCase")]
pub struct TrajectoryPayload {
    /// Ecliptic latitude of the position vector (degrees).
    pub ecliptic_lat_deg: f64,
    /// Ecliptic longitude of the position vector (degrees, `[0, 360)`).
    pub ecliptic_lon_deg: f64,
    /// Azimuth of the velocity vector (degrees), when velocity is known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub velocity_azimuth_deg: Option<f64>,
    /// Latitude of the velocity vector (degrees), when velocity is known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub velocity_lat_deg: Option<f64>,
}

/// One fully-enriched probe entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "camelCase")]
pub struct VoyagerPayload {
    /// Internal name (`voyager1` / `voyager2`).
    pub id: String,
    /// Display label.
    pub name: String,
    /// Upstream Horizons identifier.
    pub horizons_id: String,
    /// Heliocentric position in AU.
    pub position_au: Vector3,
    /// Heliocentric position in km.
    pub position_km: Vector3,
    /// Heliocentric position in miles.
    pub position_miles: Vector3,
    /// Velocity in AU/day, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub velocity_au_per_day: Option<Vector3>,
    /// Velocity in km/s, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub velocity_km_per_s: Option<Vector3>,
    /// Velocity in miles/s, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub velocity_miles_per_s: Option<Vector3>,
    /// Distance from the Sun.
    pub distance_from_sun: DistanceTriple,
    /// Distance from Earth, when Earth is present in the planets snapshot.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_from_earth: Option<DistanceTriple>,
    /// Scalar speed, when velocity is known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<SpeedTriple>,
    /// Light travel time over the Earth distance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub light_time: Option<LightTimePayload>,
    /// Position/velocity direction angles.
    pub trajectory: TrajectoryPayload,
    /// Per-body upstream timestamp, when supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Reference frame tag.
    pub reference_frame: String,
    /// Upstream source tag.
    pub source: String,
    /// Velocity unit of the base representation.
    pub velocity_unit: String,
}

/// Metadata block for the voyagers route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "camelCase")]
pub struct VoyagersMetadata {
    /// Upstream source tag.
    pub source: String,
    /// Base distance unit (`AU`).
    pub unit_distance_base: String,
    /// Base velocity unit (`AU/day`).
    pub unit_velocity_base: String,
    /// Converted distance units served alongside the base.
    pub unit_distance_converted: Vec<String>,
    /// Converted velocity units served alongside the base.
    pub unit_velocity_converted: Vec<String>,
}

/// Response body for `GET /api/voyagers`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "camelCase")]
pub struct VoyagersResponse {
    /// Probes snapshot timestamp.
    pub timestamp: String,
    /// Correlation id for this request.
    pub request_id: String,
    /// Unit metadata.
    pub metadata: VoyagersMetadata,
    /// Enriched probe entries in catalog order.
    pub voyagers: Vec<VoyagerPayload>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// JSON body for 5xx responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Human-readable failure description.
    pub error: String,
    /// Correlation id for this request.
    pub request_id: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn metadata_serializes_camel_case_and_omits_absent_fields() {
        let meta = SnapshotMetadata {
            source: "horizons".to_owned(),
            reference_frame: "J2000-ECLIPTIC".to_owned(),
            distance_unit: "AU".to_owned(),
            velocity_unit: "AU/day".to_owned(),
            response_time_ms: 840,
            cache_status: "HIT".to_owned(),
            cache_backend: "memory".to_owned(),
            cache_age_ms: 12,
            cache_expires_in_ms: 119_988,
            cache_stale: false,
            generated_at: "2026-08-01T00:00:00+00:00".to_owned(),
            frozen_snapshot: None,
            freeze_reason: None,
            request_id: Some("req-1".to_owned()),
        };
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["cacheStatus"], "HIT");
        assert_eq!(json["cacheExpiresInMs"], 119_988);
        assert_eq!(json["requestId"], "req-1");
        assert!(json.get("frozenSnapshot").is_none());
        assert!(json.get("freezeReason").is_none());
    }

    #[test]
    fn body_payload_keeps_au_suffixed_fields() {
        let body = BodyPayload {
            name: "earth".to_owned(),
            x_au: 1.0,
            y_au: 0.0,
            z_au: 0.0,
            vx: None,
            vy: None,
            vz: None,
            velocity_unit: "AU/day".to_owned(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["x_au"], 1.0);
        assert_eq!(json["velocityUnit"], "AU/day");
        assert!(json.get("vx").is_none());
    }
}
