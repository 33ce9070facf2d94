//! CanalGuide - Location-aware canal tour guide
//!
//! This library provides the core of a walking/boat tour guide: it follows
//! the user's GPS position and reports, exactly once per visit, when they
//! arrive at a point of interest so the presentation layer can show its
//! description and play its audio.
//!
//! # Modules
//!
//! - [`geo`]: coordinates and haversine distance
//! - [`poi`]: points of interest and the JSON catalog
//! - [`proximity`]: the hysteresis-based arrival engine
//! - [`source`]: location update stream, driver loop and track replay
//! - [`route`]: the tour polyline and stop progress
//! - [`config`]: INI configuration
//! - [`logging`]: tracing subscriber setup

pub mod config;
pub mod geo;
pub mod logging;
pub mod poi;
pub mod proximity;
pub mod route;
pub mod source;

/// Version of the library.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
