//! Proximity detection and POI triggering
//!
//! This module turns a stream of noisy, irregularly-arriving position fixes
//! into discrete "user has arrived at POI X" events.
//!
//! # Design
//!
//! - **One event per visit**: each POI has its own two-state machine with a
//!   hysteresis band between the enter and exit radii, so lingering near a
//!   POI or GPS jitter at the boundary never re-triggers it.
//! - **Explicit state**: all per-POI state lives in the engine, which is
//!   constructed with its configuration and POI set. There is no global
//!   location access; fixes are pushed in by the caller.
//! - **Reactive**: the engine evaluates synchronously when a fix arrives and
//!   never schedules work on its own.
//!
//! # Example
//!
//! ```ignore
//! use canalguide::proximity::{GeoProximityEngine, PositionFix, ProximityConfig};
//!
//! let mut engine = GeoProximityEngine::new(ProximityConfig::default(), pois)?;
//! for event in engine.process_fix(&PositionFix::at(52.3745, 4.8838, now_ms))? {
//!     println!("Arrived at {}", event.poi.name);
//! }
//! ```

mod config;
mod engine;
mod error;
mod events;
mod fix;
mod state;

pub use config::{ProximityConfig, DEFAULT_ENTER_RADIUS_METERS, DEFAULT_EXIT_RADIUS_FACTOR};
pub use engine::{GeoProximityEngine, PoiSetUpdate};
pub use error::ProximityError;
pub use events::{
    ChannelObserver, EnterEvent, LocationFailure, ProximityObserver, SubscriptionId, TourEvent,
};
pub use fix::{PositionFix, Timestamp};
pub use state::{ProximityState, Transition};
