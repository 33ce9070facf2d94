//! Geographic primitives
//!
//! Provides the WGS-84 [`Coordinate`] type and great-circle calculations
//! (haversine distance, initial bearing) used by the proximity engine and
//! the route summary.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Minimum valid latitude in degrees.
pub const MIN_LAT: f64 = -90.0;
/// Maximum valid latitude in degrees.
pub const MAX_LAT: f64 = 90.0;
/// Minimum valid longitude in degrees.
pub const MIN_LON: f64 = -180.0;
/// Maximum valid longitude in degrees.
pub const MAX_LON: f64 = 180.0;

/// Errors produced when building or parsing a coordinate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordError {
    /// Latitude is not finite or outside -90..=90.
    #[error("Invalid latitude: {0}")]
    InvalidLatitude(f64),

    /// Longitude is not finite or outside -180..=180.
    #[error("Invalid longitude: {0}")]
    InvalidLongitude(f64),

    /// Text could not be parsed as `lat,lng`.
    #[error("Malformed coordinate '{0}', expected 'lat,lng'")]
    Malformed(String),
}

/// A position on the WGS-84 ellipsoid in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees, positive north.
    pub latitude: f64,
    /// Longitude in degrees, positive east.
    pub longitude: f64,
}

impl Coordinate {
    /// Create a coordinate without validation.
    ///
    /// Use [`Coordinate::try_new`] for untrusted input.
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Create a coordinate, rejecting non-finite or out-of-range values.
    pub fn try_new(latitude: f64, longitude: f64) -> Result<Self, CoordError> {
        let coord = Self::new(latitude, longitude);
        coord.validate()?;
        Ok(coord)
    }

    /// Both components are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }

    /// Both components lie within the valid WGS-84 ranges.
    pub fn is_in_range(&self) -> bool {
        (MIN_LAT..=MAX_LAT).contains(&self.latitude)
            && (MIN_LON..=MAX_LON).contains(&self.longitude)
    }

    /// Check that the coordinate is finite and in range.
    pub fn validate(&self) -> Result<(), CoordError> {
        if !self.latitude.is_finite() || !(MIN_LAT..=MAX_LAT).contains(&self.latitude) {
            return Err(CoordError::InvalidLatitude(self.latitude));
        }
        if !self.longitude.is_finite() || !(MIN_LON..=MAX_LON).contains(&self.longitude) {
            return Err(CoordError::InvalidLongitude(self.longitude));
        }
        Ok(())
    }

    /// Great-circle distance to another coordinate in meters.
    #[inline]
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        distance_meters(self, other)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.latitude, self.longitude)
    }
}

/// Parses the admin-form format `"lat,lng"` (whitespace tolerated).
impl FromStr for Coordinate {
    type Err = CoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lon) = s
            .split_once(',')
            .ok_or_else(|| CoordError::Malformed(s.to_string()))?;

        let lat: f64 = lat
            .trim()
            .parse()
            .map_err(|_| CoordError::Malformed(s.to_string()))?;
        let lon: f64 = lon
            .trim()
            .parse()
            .map_err(|_| CoordError::Malformed(s.to_string()))?;

        Self::try_new(lat, lon)
    }
}

/// Great-circle distance between two coordinates in meters.
///
/// Uses the haversine formula with [`EARTH_RADIUS_METERS`]. The haversine
/// term is clamped to `[0, 1]` so floating-point overshoot near antipodal
/// or identical points never produces NaN.
///
/// The result is symmetric and exactly zero when `a == b`.
#[inline]
pub fn distance_meters(a: &Coordinate, b: &Coordinate) -> f64 {
    if a == b {
        return 0.0;
    }

    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = lat2 - lat1;
    let dlon = (b.longitude - a.longitude).to_radians();

    let sin_dlat = (dlat / 2.0).sin();
    let sin_dlon = (dlon / 2.0).sin();
    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon;
    let h = h.clamp(0.0, 1.0);

    2.0 * EARTH_RADIUS_METERS * h.sqrt().asin()
}

/// Initial great-circle bearing from `from` to `to`.
///
/// Returns degrees in `[0, 360)`, where 0 = North, 90 = East.
pub fn initial_bearing_degrees(from: &Coordinate, to: &Coordinate) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let dlon = (to.longitude - from.longitude).to_radians();

    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();
    let bearing = y.atan2(x).to_degrees();

    // Normalize to 0-360; rem_euclid can round tiny negatives up to 360.0
    let normalized = bearing.rem_euclid(360.0);
    if normalized >= 360.0 {
        0.0
    } else {
        normalized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Westerkerk, Amsterdam.
    const WESTERKERK: Coordinate = Coordinate::new(52.374_588, 4.883_060);
    /// Noorderkerk, Amsterdam.
    const NOORDERKERK: Coordinate = Coordinate::new(52.379_487, 4.887_455);

    #[test]
    fn test_distance_identical_points_is_zero() {
        assert_eq!(distance_meters(&WESTERKERK, &WESTERKERK), 0.0);
    }

    #[test]
    fn test_distance_known_pair() {
        // Westerkerk to Noorderkerk is roughly 625m
        let d = distance_meters(&WESTERKERK, &NOORDERKERK);
        assert!((d - 625.0).abs() < 15.0, "Expected ~625m, got {}m", d);
    }

    #[test]
    fn test_distance_one_degree_latitude() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(1.0, 0.0);
        let d = distance_meters(&a, &b);
        // 2πR / 360
        assert!((d - 111_194.9).abs() < 1.0, "got {}", d);
    }

    #[test]
    fn test_distance_antipodal_is_finite() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(0.0, 180.0);
        let d = distance_meters(&a, &b);
        assert!(d.is_finite());
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_METERS).abs() < 1.0);
    }

    #[test]
    fn test_distance_near_antipodal_is_finite() {
        let a = Coordinate::new(52.3745, 4.8838);
        let b = Coordinate::new(-52.3745, -175.1162);
        let d = distance_meters(&a, &b);
        assert!(!d.is_nan());
        assert!(d <= std::f64::consts::PI * EARTH_RADIUS_METERS + 1.0);
    }

    #[test]
    fn test_distance_tiny_offset() {
        // ~1.1cm north
        let b = Coordinate::new(WESTERKERK.latitude + 1e-7, WESTERKERK.longitude);
        let d = distance_meters(&WESTERKERK, &b);
        assert!(d > 0.0 && d < 0.05, "got {}", d);
    }

    #[test]
    fn test_bearing_cardinal_directions() {
        let origin = Coordinate::new(0.0, 0.0);
        let north = initial_bearing_degrees(&origin, &Coordinate::new(1.0, 0.0));
        let east = initial_bearing_degrees(&origin, &Coordinate::new(0.0, 1.0));
        let south = initial_bearing_degrees(&origin, &Coordinate::new(-1.0, 0.0));
        let west = initial_bearing_degrees(&origin, &Coordinate::new(0.0, -1.0));

        assert!(north.abs() < 0.1);
        assert!((east - 90.0).abs() < 0.1);
        assert!((south - 180.0).abs() < 0.1);
        assert!((west - 270.0).abs() < 0.1);
    }

    #[test]
    fn test_parse_lat_lng() {
        let c: Coordinate = "52.3745, 4.8838".parse().unwrap();
        assert_eq!(c, Coordinate::new(52.3745, 4.8838));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            "52.3745".parse::<Coordinate>(),
            Err(CoordError::Malformed(_))
        ));
        assert!(matches!(
            "abc,4.0".parse::<Coordinate>(),
            Err(CoordError::Malformed(_))
        ));
        assert!(matches!(
            "NaN,4.0".parse::<Coordinate>(),
            Err(CoordError::InvalidLatitude(_))
        ));
        assert!(matches!(
            "10.0,200.0".parse::<Coordinate>(),
            Err(CoordError::InvalidLongitude(_))
        ));
    }

    #[test]
    fn test_validate_ranges() {
        assert!(Coordinate::new(90.0, 180.0).validate().is_ok());
        assert!(Coordinate::new(90.1, 0.0).validate().is_err());
        assert!(Coordinate::new(0.0, f64::INFINITY).validate().is_err());
        assert!(!Coordinate::new(f64::NAN, 0.0).is_finite());
    }

    // Property-based tests using proptest
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_distance_symmetric(
                lat1 in -90.0..=90.0_f64,
                lon1 in -180.0..=180.0_f64,
                lat2 in -90.0..=90.0_f64,
                lon2 in -180.0..=180.0_f64,
            ) {
                let a = Coordinate::new(lat1, lon1);
                let b = Coordinate::new(lat2, lon2);
                let ab = distance_meters(&a, &b);
                let ba = distance_meters(&b, &a);
                prop_assert!((ab - ba).abs() < 1e-6, "{} != {}", ab, ba);
            }

            #[test]
            fn test_distance_identity(
                lat in -90.0..=90.0_f64,
                lon in -180.0..=180.0_f64,
            ) {
                let a = Coordinate::new(lat, lon);
                prop_assert_eq!(distance_meters(&a, &a), 0.0);
            }

            #[test]
            fn test_distance_bounded(
                lat1 in -90.0..=90.0_f64,
                lon1 in -180.0..=180.0_f64,
                lat2 in -90.0..=90.0_f64,
                lon2 in -180.0..=180.0_f64,
            ) {
                let d = distance_meters(
                    &Coordinate::new(lat1, lon1),
                    &Coordinate::new(lat2, lon2),
                );
                prop_assert!(d >= 0.0);
                prop_assert!(d <= std::f64::consts::PI * EARTH_RADIUS_METERS + 1e-6);
            }

            #[test]
            fn test_bearing_in_range(
                lat1 in -89.0..=89.0_f64,
                lon1 in -180.0..=180.0_f64,
                lat2 in -89.0..=89.0_f64,
                lon2 in -180.0..=180.0_f64,
            ) {
                let b = initial_bearing_degrees(
                    &Coordinate::new(lat1, lon1),
                    &Coordinate::new(lat2, lon2),
                );
                prop_assert!((0.0..360.0).contains(&b), "bearing {}", b);
            }
        }
    }
}
