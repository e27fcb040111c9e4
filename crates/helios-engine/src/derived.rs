//! Pure derived computations over snapshots.
//!
//! Every function here is referentially transparent and synchronous:
//! norms, unit conversions, light travel time, ecliptic angles, and
//! linear position drift. Undefined inputs propagate as `None`, never as
//! NaN sentinels.

use helios_types::StateVector;

pub use helios_types::{KM_PER_AU, SECONDS_PER_DAY};

/// Speed of light (km/s).
pub const C_KM_PER_S: f64 = 299_792.458;

/// Kilometers per statute mile.
pub const KM_PER_MILE: f64 = 1.609_344;

/// Euclidean norm of a 3-vector; `None` when any component is not finite.
pub fn magnitude(x: f64, y: f64, z: f64) -> Option<f64> {
    if x.is_finite() && y.is_finite() && z.is_finite() {
        Some((x * x + y * y + z * z).sqrt())
    } else {
        None
    }
}

/// Norm of `a - b`; `None` when any component of either vector is not
/// finite.
pub fn delta_magnitude(a: (f64, f64, f64), b: (f64, f64, f64)) -> Option<f64> {
    magnitude(a.0 - b.0, a.1 - b.1, a.2 - b.2)
}

/// Convert a distance in AU to kilometers.
pub fn au_to_km(au: f64) -> f64 {
    au * KM_PER_AU
}

/// Convert a distance in kilometers to miles.
pub fn km_to_miles(km: f64) -> f64 {
    km / KM_PER_MILE
}

/// Convert a rate in AU/day to km/s.
pub fn au_per_day_to_km_per_s(rate: f64) -> f64 {
    rate * KM_PER_AU / SECONDS_PER_DAY
}

/// Light travel time over a distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightTime {
    /// One-way travel time (seconds).
    pub one_way_seconds: f64,
    /// One-way travel time (minutes).
    pub one_way_minutes: f64,
    /// Round-trip travel time (minutes).
    pub two_way_minutes: f64,
}

/// Light travel time over `distance_km`.
pub fn light_time(distance_km: f64) -> LightTime {
    let one_way_seconds = distance_km / C_KM_PER_S;
    let one_way_minutes = one_way_seconds / 60.0;
    LightTime { one_way_seconds, one_way_minutes, two_way_minutes: one_way_minutes * 2.0 }
}

/// Direction of a vector in the ecliptic frame, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EclipticAngles {
    /// Latitude above the ecliptic plane, `[-90, 90]`.
    pub lat_deg: f64,
    /// Longitude in the ecliptic plane, normalized to `[0, 360)`.
    pub lon_deg: f64,
}

/// Ecliptic latitude and longitude of a 3-vector.
///
/// `None` for the zero vector or non-finite components.
pub fn ecliptic(x: f64, y: f64, z: f64) -> Option<EclipticAngles> {
    let r = magnitude(x, y, z)?;
    if r == 0.0 {
        return None;
    }
    let lat_deg = (z / r).asin().to_degrees();
    let lon_deg = y.atan2(x).to_degrees().rem_euclid(360.0);
    Some(EclipticAngles { lat_deg, lon_deg })
}

/// Linear drift: `p + v * delta_days`.
///
/// `None` when the vector has no velocity; callers without a velocity
/// must fall back to an orbital approximation.
pub fn drift_position(sv: &StateVector, delta_days: f64) -> Option<(f64, f64, f64)> {
    let v = sv.velocity?;
    Some((
        sv.x + v.vx * delta_days,
        sv.y + v.vy * delta_days,
        sv.z + v.vz * delta_days,
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use helios_types::{Velocity, REFERENCE_FRAME};

    #[test]
    fn magnitude_of_unit_axes() {
        assert!((magnitude(1.0, 0.0, 0.0).unwrap() - 1.0).abs() < 1e-12);
        assert!((magnitude(3.0, 4.0, 0.0).unwrap() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn non_finite_inputs_propagate_to_none() {
        assert!(magnitude(f64::NAN, 0.0, 0.0).is_none());
        assert!(magnitude(1.0, f64::INFINITY, 0.0).is_none());
        assert!(delta_magnitude((f64::NAN, 0.0, 0.0), (0.0, 0.0, 0.0)).is_none());
    }

    #[test]
    fn delta_magnitude_between_probe_and_earth() {
        let d = delta_magnitude((100.0, 0.0, 0.0), (1.0, 0.0, 0.0)).unwrap();
        assert!((d - 99.0).abs() < 1e-12);
    }

    #[test]
    fn light_time_at_one_au() {
        // 1 AU is about 499 light-seconds.
        let lt = light_time(KM_PER_AU);
        assert!((lt.one_way_seconds - 499.004_784).abs() < 1e-3);
        assert!((lt.two_way_minutes - 2.0 * lt.one_way_minutes).abs() < 1e-12);
    }

    #[test]
    fn ecliptic_angles_on_axes() {
        let on_x = ecliptic(1.0, 0.0, 0.0).unwrap();
        assert!(on_x.lat_deg.abs() < 1e-12);
        assert!(on_x.lon_deg.abs() < 1e-12);

        let on_y = ecliptic(0.0, 1.0, 0.0).unwrap();
        assert!((on_y.lon_deg - 90.0).abs() < 1e-12);

        let neg_y = ecliptic(0.0, -1.0, 0.0).unwrap();
        assert!((neg_y.lon_deg - 270.0).abs() < 1e-12);

        let up = ecliptic(0.0, 0.0, 1.0).unwrap();
        assert!((up.lat_deg - 90.0).abs() < 1e-12);
    }

    #[test]
    fn ecliptic_longitude_stays_in_range() {
        for (x, y) in [(1.0, 1.0), (-1.0, 1.0), (-1.0, -1.0), (1.0, -1.0), (1.0, -1e-9)] {
            let angles = ecliptic(x, y, 0.0).unwrap();
            assert!((0.0..360.0).contains(&angles.lon_deg), "lon {}", angles.lon_deg);
        }
    }

    #[test]
    fn ecliptic_rejects_zero_vector() {
        assert!(ecliptic(0.0, 0.0, 0.0).is_none());
    }

    #[test]
    fn unit_conversions_round_numbers() {
        assert!((au_to_km(1.0) - 149_597_870.7).abs() < 1e-6);
        assert!((km_to_miles(KM_PER_MILE) - 1.0).abs() < 1e-12);
        // 1 AU/day in km/s.
        assert!((au_per_day_to_km_per_s(1.0) - 1_731.456_836_805_555_4).abs() < 1e-6);
    }

    #[test]
    fn drift_follows_velocity() {
        let sv = StateVector {
            name: "voyager1".to_owned(),
            x: 100.0,
            y: 0.0,
            z: 0.0,
            velocity: Some(Velocity { vx: 0.01, vy: -0.002, vz: 0.0 }),
            reference_frame: REFERENCE_FRAME.to_owned(),
            source: "scripted".to_owned(),
            timestamp: None,
        };
        let (x, y, z) = drift_position(&sv, 10.0).unwrap();
        assert!((x - 100.1).abs() < 1e-12);
        assert!((y + 0.02).abs() < 1e-12);
        assert!(z.abs() < 1e-12);

        let still = StateVector { velocity: None, ..sv };
        assert!(drift_position(&still, 10.0).is_none());
    }
}
