//! Heliocentric state vectors.
//!
//! A [`StateVector`] describes one body at one instant: position in
//! astronomical units, optional velocity in AU/day, the reference frame,
//! and the upstream-supplied timestamp. Missing velocity is modeled as
//! `Option` -- never as NaN sentinels. The parser guarantees that a
//! present [`Velocity`] has all three components finite.

use serde::{Deserialize, Serialize};

/// Canonical reference frame tag for all Helios vectors.
pub const REFERENCE_FRAME: &str = "J2000-ECLIPTIC";

/// Kilometers per astronomical unit (IAU 2012 definition).
pub const KM_PER_AU: f64 = 149_597_870.7;

/// Seconds per day, for AU/day <-> km/s conversions.
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Velocity components in AU/day.
///
/// All three components are always present together: the upstream either
/// supplies a full velocity row or none at all.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    /// X velocity component (AU/day).
    pub vx: f64,
    /// Y velocity component (AU/day).
    pub vy: f64,
    /// Z velocity component (AU/day).
    pub vz: f64,
}

/// Position and optional velocity for one body at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateVector {
    /// Internal body name from the catalog (e.g. `earth`).
    pub name: String,
    /// Heliocentric X position (AU).
    pub x: f64,
    /// Heliocentric Y position (AU).
    pub y: f64,
    /// Heliocentric Z position (AU).
    pub z: f64,
    /// Velocity, when the upstream supplied one.
    pub velocity: Option<Velocity>,
    /// Reference frame tag, canonically [`REFERENCE_FRAME`].
    pub reference_frame: String,
    /// Where the vector came from (e.g. `horizons`).
    pub source: String,
    /// Upstream-supplied timestamp, carried as an opaque string. The
    /// structured upstream shape emits ISO-8601; the embedded-text shape
    /// emits Horizons calendar dates. Absent when the upstream omits it.
    pub timestamp: Option<String>,
}

impl StateVector {
    /// Position as a `(x, y, z)` tuple in AU.
    pub const fn position(&self) -> (f64, f64, f64) {
        (self.x, self.y, self.z)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn serde_round_trip_preserves_optional_velocity() {
        let sv = StateVector {
            name: "earth".to_owned(),
            x: 0.98,
            y: -0.17,
            z: 0.0001,
            velocity: Some(Velocity { vx: 0.0028, vy: 0.0167, vz: -0.000001 }),
            reference_frame: REFERENCE_FRAME.to_owned(),
            source: "horizons".to_owned(),
            timestamp: Some("2026-08-01T00:00:00Z".to_owned()),
        };
        let json = serde_json::to_string(&sv).unwrap();
        let back: StateVector = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sv);

        let no_vel = StateVector { velocity: None, ..sv };
        let json = serde_json::to_string(&no_vel).unwrap();
        let back: StateVector = serde_json::from_str(&json).unwrap();
        assert!(back.velocity.is_none());
    }
}
