//! Error types for the proximity engine.

use thiserror::Error;

use super::events::LocationFailure;
use super::fix::Timestamp;
use crate::poi::PoiId;

/// Errors surfaced by [`GeoProximityEngine`](super::GeoProximityEngine).
///
/// None of these are fatal to the host: the offending input is discarded
/// and later valid fixes are processed normally.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProximityError {
    /// The fix has non-finite or out-of-range coordinates.
    #[error("Invalid fix at {timestamp}: {reason}")]
    InvalidFix { timestamp: Timestamp, reason: String },

    /// The fix is older than the last processed fix.
    #[error("Out-of-order fix at {timestamp} (last processed {last})")]
    OutOfOrderFix { timestamp: Timestamp, last: Timestamp },

    /// The location source reported a failure.
    #[error("Location unavailable: {0}")]
    LocationUnavailable(LocationFailure),

    /// The radius configuration is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A point of interest in a replacement set is invalid.
    #[error("Invalid POI '{id}': {reason}")]
    InvalidPoi { id: PoiId, reason: String },

    /// The engine was disposed and no longer accepts input.
    #[error("Proximity engine has been disposed")]
    Disposed,
}

impl ProximityError {
    /// Whether this error only concerns a single dropped fix.
    pub fn is_dropped_fix(&self) -> bool {
        matches!(
            self,
            ProximityError::InvalidFix { .. } | ProximityError::OutOfOrderFix { .. }
        )
    }
}
