//! Per-POI hysteresis state machine.
//!
//! # Transitions
//!
//! ```text
//! OUTSIDE ── d ≤ enter ──► INSIDE     (emit EnterEvent)
//! INSIDE  ── d > exit  ──► OUTSIDE    (silent, re-arms)
//! INSIDE  ── d ≤ exit  ──► INSIDE     (dead zone, no event)
//! OUTSIDE ── d > enter ──► OUTSIDE    (no-op)
//! ```

use super::config::ProximityConfig;
use super::fix::Timestamp;
use crate::poi::PoiId;

/// Outcome of evaluating one fix against one POI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// OUTSIDE → INSIDE. The caller emits an enter event.
    Entered,
    /// INSIDE → OUTSIDE.
    Exited,
    /// Still inside (within the enter radius or the dead zone).
    Remained,
    /// Still outside.
    Unchanged,
}

/// Proximity state of a single point of interest.
///
/// Owned exclusively by the engine. Created in the outside state when the
/// POI set is loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProximityState {
    poi_id: PoiId,
    inside: bool,
    last_entered_at: Option<Timestamp>,
}

impl ProximityState {
    /// Fresh outside state for a point of interest.
    pub fn new(poi_id: PoiId) -> Self {
        Self {
            poi_id,
            inside: false,
            last_entered_at: None,
        }
    }

    /// Which point of interest this state tracks.
    pub fn poi_id(&self) -> &PoiId {
        &self.poi_id
    }

    /// Whether the user is currently considered inside.
    pub fn is_inside(&self) -> bool {
        self.inside
    }

    /// Timestamp of the most recent arrival, if any.
    pub fn last_entered_at(&self) -> Option<Timestamp> {
        self.last_entered_at
    }

    /// Apply a fix at `distance_meters` from the POI.
    pub fn evaluate(
        &mut self,
        distance_meters: f64,
        config: &ProximityConfig,
        timestamp: Timestamp,
    ) -> Transition {
        if self.inside {
            if distance_meters > config.exit_radius_meters {
                self.inside = false;
                Transition::Exited
            } else {
                Transition::Remained
            }
        } else if distance_meters <= config.enter_radius_meters {
            self.inside = true;
            self.last_entered_at = Some(timestamp);
            Transition::Entered
        } else {
            Transition::Unchanged
        }
    }
}
