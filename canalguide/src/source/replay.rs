//! Recorded track replay.
//!
//! A track is a JSON array of fixes:
//!
//! ```json
//! [
//!   {"latitude": 52.3796, "longitude": 4.8876, "timestamp": 1700000000000, "accuracy": 6.0},
//!   {"latitude": 52.3794, "longitude": 4.8872, "timestamp": 1700000001000}
//! ]
//! ```

use std::path::Path;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::LocationUpdate;
use crate::geo::Coordinate;
use crate::proximity::{PositionFix, Timestamp};
use crate::route::Route;

/// Errors that can occur while loading a track.
#[derive(Debug, Error)]
pub enum TrackError {
    /// I/O error reading the track file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The track is not a valid JSON array of fixes.
    #[error("Invalid track JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A recorded sequence of fixes that can be replayed as a location source.
///
/// Fixes are replayed exactly as recorded, including any malformed or
/// out-of-order entries, so the engine's rejection paths are exercised.
#[derive(Debug, Clone, Default)]
pub struct TrackReplay {
    fixes: Vec<PositionFix>,
}

impl TrackReplay {
    /// Create a replay from fixes.
    pub fn new(fixes: Vec<PositionFix>) -> Self {
        Self { fixes }
    }

    /// Parse a track from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, TrackError> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    /// Load a track from a JSON file.
    pub fn load(path: &Path) -> Result<Self, TrackError> {
        let contents = std::fs::read_to_string(path)?;
        let track = Self::from_json_str(&contents)?;
        tracing::info!(path = %path.display(), fixes = track.len(), "Loaded track");
        Ok(track)
    }

    /// Synthesize a walk along a route.
    ///
    /// Produces one fix every `step_meters` along the route, spaced
    /// `interval` apart in time starting at `start`.
    pub fn walk_route(route: &Route, step_meters: f64, start: Timestamp, interval: Duration) -> Self {
        let interval_ms = interval.as_millis() as u64;
        let fixes = route
            .densify(step_meters)
            .into_iter()
            .enumerate()
            .map(|(i, coord): (usize, Coordinate)| {
                PositionFix::new(
                    coord,
                    Timestamp::from_millis(start.as_millis() + i as u64 * interval_ms),
                )
            })
            .collect();
        Self { fixes }
    }

    /// The recorded fixes.
    pub fn fixes(&self) -> &[PositionFix] {
        &self.fixes
    }

    /// Number of recorded fixes.
    pub fn len(&self) -> usize {
        self.fixes.len()
    }

    /// Whether the track is empty.
    pub fn is_empty(&self) -> bool {
        self.fixes.is_empty()
    }

    /// Send every fix into `tx`.
    ///
    /// With `speed` set, sleeps between fixes for the recorded gap divided
    /// by the speed factor (2.0 replays twice as fast). Without it, fixes
    /// are sent back to back. Stops early on cancellation or when the
    /// receiver is dropped. Returns the number of fixes sent.
    pub async fn replay(
        self,
        tx: mpsc::UnboundedSender<LocationUpdate>,
        speed: Option<f64>,
        cancellation_token: CancellationToken,
    ) -> usize {
        let speed = speed.filter(|s| s.is_finite() && *s > 0.0);
        let mut previous: Option<Timestamp> = None;
        let mut sent = 0;

        for fix in self.fixes {
            if let (Some(speed), Some(prev)) = (speed, previous) {
                let gap_ms = fix.timestamp.millis_since(prev) as f64 / speed;
                if gap_ms > 0.0 {
                    tokio::select! {
                        biased;
                        _ = cancellation_token.cancelled() => break,
                        _ = tokio::time::sleep(Duration::from_secs_f64(gap_ms / 1000.0)) => {}
                    }
                }
            }
            if cancellation_token.is_cancelled() {
                break;
            }

            if tx.send(LocationUpdate::Fix(fix)).is_err() {
                tracing::debug!("Track replay receiver dropped");
                break;
            }
            previous = Some(fix.timestamp);
            sent += 1;
        }

        tracing::debug!(sent, "Track replay finished");
        sent
    }
}
