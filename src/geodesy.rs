//! Geodetic positions and great-circle distance.
//!
//! The channel physics only ever needs the horizontal separation between
//! two endpoints, so this module provides exactly that: a geodetic
//! position type and a closed-form haversine distance on a spherical
//! Earth. Altitudes ride along on the position (the two-ray ground model
//! reads them as antenna heights) but are never folded into the
//! horizontal distance.

use serde::Deserialize;

/// Earth radius used for all great-circle calculations, in metres.
pub const EARTH_RADIUS_M: f64 = 6_378_100.0;

/// A geodetic position: latitude/longitude in degrees, altitude in metres.
///
/// Altitude defaults to 0 m when a scenario file omits it.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Position {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    #[serde(default)]
    pub altitude_m: f64,
}

impl Position {
    pub fn new(latitude_deg: f64, longitude_deg: f64, altitude_m: f64) -> Self {
        Self {
            latitude_deg,
            longitude_deg,
            altitude_m,
        }
    }
}

/// Great-circle horizontal distance between two positions in metres.
///
/// # Formula
///
/// ```text
/// h = sin²(Δφ/2) + cos(φ₁)·cos(φ₂)·sin²(Δλ/2)
/// d = 2·R·asin(√h)
/// ```
///
/// Haversine on a sphere of radius [`EARTH_RADIUS_M`]. The altitude
/// components of both positions are ignored.
pub fn horizontal_distance(a: &Position, b: &Position) -> f64 {
    let phi1 = a.latitude_deg.to_radians();
    let phi2 = b.latitude_deg.to_radians();
    let delta_phi = (b.latitude_deg - a.latitude_deg).to_radians();
    let delta_lambda = (b.longitude_deg - a.longitude_deg).to_radians();

    let h = (delta_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn distance_is_zero_for_coincident_positions() {
        let p = Position::new(37.4, -122.1, 120.0);
        assert_eq!(horizontal_distance(&p, &p), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Position::new(10.0, 20.0, 0.0);
        let b = Position::new(-5.0, 48.0, 0.0);
        let ab = horizontal_distance(&a, &b);
        let ba = horizontal_distance(&b, &a);
        assert!((ab - ba).abs() < 1e-9);
    }

    #[test]
    fn equatorial_arc_matches_analytic_length() {
        // One degree of longitude along the equator is R * pi / 180.
        let a = Position::new(0.0, 0.0, 0.0);
        let b = Position::new(0.0, 1.0, 0.0);
        let expected = EARTH_RADIUS_M * PI / 180.0;
        let actual = horizontal_distance(&a, &b);
        assert!((actual - expected).abs() / expected < 1e-9);
    }

    #[test]
    fn altitude_does_not_change_horizontal_distance() {
        let low = Position::new(0.0, 0.0, 0.0);
        let high = Position::new(0.0, 0.0, 12_000.0);
        let other = Position::new(0.0, 0.5, 3_000.0);
        let d_low = horizontal_distance(&low, &other);
        let d_high = horizontal_distance(&high, &other);
        assert_eq!(d_low, d_high);
    }

    #[test]
    fn antipodal_points_do_not_produce_nan() {
        let a = Position::new(0.0, 0.0, 0.0);
        let b = Position::new(0.0, 180.0, 0.0);
        let d = horizontal_distance(&a, &b);
        assert!(d.is_finite());
        assert!((d - EARTH_RADIUS_M * PI).abs() / d < 1e-9);
    }
}
