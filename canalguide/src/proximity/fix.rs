//! Position fixes delivered by the location source.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

/// Fix timestamp in milliseconds since the Unix epoch.
///
/// This is the unit the platform geolocation API reports. Sources must
/// deliver fixes in non-decreasing timestamp order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Create a timestamp from epoch milliseconds.
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// The current wall-clock time.
    pub fn now() -> Self {
        Self(Utc::now().timestamp_millis().max(0) as u64)
    }

    /// Epoch milliseconds.
    pub const fn as_millis(&self) -> u64 {
        self.0
    }

    /// Milliseconds elapsed since `earlier`, zero if `earlier` is later.
    pub fn millis_since(&self, earlier: Timestamp) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    /// Convert to a UTC date-time, if representable.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        i64::try_from(self.0)
            .ok()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Some(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.3fZ")),
            None => write!(f, "{}ms", self.0),
        }
    }
}

/// A single timestamped location reading.
///
/// The engine treats every fix as exact; `accuracy_meters` is carried for
/// the presentation layer only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionFix {
    #[serde(flatten)]
    pub coordinates: Coordinate,
    pub timestamp: Timestamp,
    #[serde(default, rename = "accuracy", skip_serializing_if = "Option::is_none")]
    pub accuracy_meters: Option<f64>,
}

impl PositionFix {
    /// Create a fix without accuracy information.
    pub fn new(coordinates: Coordinate, timestamp: Timestamp) -> Self {
        Self {
            coordinates,
            timestamp,
            accuracy_meters: None,
        }
    }

    /// Create a fix from raw latitude/longitude and epoch milliseconds.
    pub fn at(latitude: f64, longitude: f64, timestamp_ms: u64) -> Self {
        Self::new(
            Coordinate::new(latitude, longitude),
            Timestamp::from_millis(timestamp_ms),
        )
    }

    /// Attach the reported horizontal accuracy.
    pub fn with_accuracy(mut self, accuracy_meters: f64) -> Self {
        self.accuracy_meters = Some(accuracy_meters);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_ordering() {
        assert!(Timestamp::from_millis(1) < Timestamp::from_millis(2));
        assert_eq!(Timestamp::from_millis(5).millis_since(Timestamp::from_millis(2)), 3);
        assert_eq!(Timestamp::from_millis(2).millis_since(Timestamp::from_millis(5)), 0);
    }

    #[test]
    fn test_timestamp_display() {
        let ts = Timestamp::from_millis(1_700_000_000_123);
        assert_eq!(ts.to_string(), "2023-11-14T22:13:20.123Z");
    }

    #[test]
    fn test_fix_json_shape() {
        let json = r#"{"latitude": 52.3745, "longitude": 4.8838, "timestamp": 1000, "accuracy": 5.0}"#;
        let fix: PositionFix = serde_json::from_str(json).unwrap();
        assert_eq!(fix.coordinates, Coordinate::new(52.3745, 4.8838));
        assert_eq!(fix.timestamp, Timestamp::from_millis(1000));
        assert_eq!(fix.accuracy_meters, Some(5.0));

        let json = r#"{"latitude": 52.3745, "longitude": 4.8838, "timestamp": 1000}"#;
        let fix: PositionFix = serde_json::from_str(json).unwrap();
        assert_eq!(fix.accuracy_meters, None);
    }
}
