//! Location sources
//!
//! Position fixes arrive asynchronously at the platform's cadence. This
//! module defines the update stream the engine consumes and a driver loop
//! that feeds it, keeping the engine itself free of async code.
//!
//! # Architecture
//!
//! ```text
//! Platform / TrackReplay ──► mpsc<LocationUpdate> ──► drive() ──► GeoProximityEngine
//!                                                                      │
//!                                                   observers ◄────────┘
//! ```

mod replay;

pub use replay::{TrackError, TrackReplay};

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::proximity::{GeoProximityEngine, LocationFailure, PositionFix, ProximityError};

/// A single message from a location source.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationUpdate {
    /// A new position fix.
    Fix(PositionFix),
    /// The source failed (permission denied, no signal, timeout).
    Unavailable(LocationFailure),
}

/// Counters collected while driving an engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DriveSummary {
    /// Fixes accepted and evaluated.
    pub fixes_processed: usize,
    /// Fixes dropped for invalid coordinates.
    pub invalid_fixes: usize,
    /// Fixes dropped for timestamp regression.
    pub out_of_order_fixes: usize,
    /// Enter events emitted.
    pub enter_events: usize,
    /// Failures reported by the source.
    pub location_failures: usize,
    /// Most recent failure, if the source had not recovered by the end.
    pub last_failure: Option<LocationFailure>,
    /// Whether the loop stopped because of cancellation.
    pub cancelled: bool,
}

/// Feed location updates into the engine until the source closes or the
/// token is cancelled.
///
/// Dropped fixes are logged and counted; the loop keeps going. A source
/// failure is forwarded to the engine's subscribers and the loop waits for
/// a fresh fix. Only `Disposed` ends the loop with an error.
pub async fn drive(
    engine: &mut GeoProximityEngine,
    updates: &mut mpsc::UnboundedReceiver<LocationUpdate>,
    cancellation_token: CancellationToken,
) -> Result<DriveSummary, ProximityError> {
    let mut summary = DriveSummary::default();

    loop {
        tokio::select! {
            biased;

            _ = cancellation_token.cancelled() => {
                tracing::debug!("Location drive cancelled");
                summary.cancelled = true;
                break;
            }

            update = updates.recv() => {
                let Some(update) = update else {
                    tracing::debug!("Location source closed");
                    break;
                };
                apply_update(engine, update, &mut summary)?;
            }
        }
    }

    summary.last_failure = engine.location_status().err().and_then(|e| match e {
        ProximityError::LocationUnavailable(failure) => Some(failure),
        _ => None,
    });

    tracing::info!(
        fixes = summary.fixes_processed,
        arrivals = summary.enter_events,
        dropped = summary.invalid_fixes + summary.out_of_order_fixes,
        "Location drive finished"
    );

    Ok(summary)
}

fn apply_update(
    engine: &mut GeoProximityEngine,
    update: LocationUpdate,
    summary: &mut DriveSummary,
) -> Result<(), ProximityError> {
    match update {
        LocationUpdate::Fix(fix) => match engine.process_fix(&fix) {
            Ok(events) => {
                summary.fixes_processed += 1;
                summary.enter_events += events.len();
            }
            Err(ProximityError::InvalidFix { .. }) => summary.invalid_fixes += 1,
            Err(ProximityError::OutOfOrderFix { .. }) => summary.out_of_order_fixes += 1,
            Err(e) => return Err(e),
        },
        LocationUpdate::Unavailable(failure) => {
            engine.report_location_unavailable(failure)?;
            summary.location_failures += 1;
        }
    }
    Ok(())
}
