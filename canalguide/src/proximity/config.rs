//! Trigger radius configuration.
//!
//! The engine uses two radii around every point of interest:
//!
//! ```text
//!        ┌──────────── exit radius ────────────┐
//!        │     ┌──── enter radius ────┐        │
//!        │     │         POI          │        │
//!        │     └──────────────────────┘        │
//!        └─────────────────────────────────────┘
//!              dead zone between the two
//! ```
//!
//! A user becomes *inside* at or below the enter radius and only becomes
//! *outside* again beyond the exit radius. GPS jitter of a few meters inside
//! the band does not toggle state.

use super::error::ProximityError;

/// Default enter radius in meters.
pub const DEFAULT_ENTER_RADIUS_METERS: f64 = 20.0;

/// Default exit radius as a multiple of the enter radius.
pub const DEFAULT_EXIT_RADIUS_FACTOR: f64 = 1.5;

/// Radius configuration for the proximity engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityConfig {
    /// Distance at or below which a user arrives at a POI.
    pub enter_radius_meters: f64,

    /// Distance above which a user has left a POI.
    ///
    /// Must be at least `enter_radius_meters`.
    pub exit_radius_meters: f64,
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            enter_radius_meters: DEFAULT_ENTER_RADIUS_METERS,
            exit_radius_meters: DEFAULT_ENTER_RADIUS_METERS * DEFAULT_EXIT_RADIUS_FACTOR,
        }
    }
}

impl ProximityConfig {
    /// Create a validated configuration with explicit radii.
    pub fn new(enter_radius_meters: f64, exit_radius_meters: f64) -> Result<Self, ProximityError> {
        let config = Self {
            enter_radius_meters,
            exit_radius_meters,
        };
        config.validate()?;
        Ok(config)
    }

    /// Create a configuration with the default exit factor applied.
    pub fn with_enter_radius(enter_radius_meters: f64) -> Result<Self, ProximityError> {
        Self::new(
            enter_radius_meters,
            enter_radius_meters * DEFAULT_EXIT_RADIUS_FACTOR,
        )
    }

    /// Create a configuration without a hysteresis band.
    ///
    /// Permitted, but jitter around the boundary will produce repeated
    /// arrivals.
    pub fn single_radius(radius_meters: f64) -> Result<Self, ProximityError> {
        Self::new(radius_meters, radius_meters)
    }

    /// Check radius constraints.
    pub fn validate(&self) -> Result<(), ProximityError> {
        if !self.enter_radius_meters.is_finite() || self.enter_radius_meters <= 0.0 {
            return Err(ProximityError::InvalidConfiguration(format!(
                "enter radius must be a positive number of meters, got {}",
                self.enter_radius_meters
            )));
        }
        if !self.exit_radius_meters.is_finite() || self.exit_radius_meters <= 0.0 {
            return Err(ProximityError::InvalidConfiguration(format!(
                "exit radius must be a positive number of meters, got {}",
                self.exit_radius_meters
            )));
        }
        if self.exit_radius_meters < self.enter_radius_meters {
            return Err(ProximityError::InvalidConfiguration(format!(
                "exit radius ({}m) must not be smaller than enter radius ({}m)",
                self.exit_radius_meters, self.enter_radius_meters
            )));
        }
        Ok(())
    }

    /// Width of the dead zone between the two radii.
    pub fn hysteresis_band_meters(&self) -> f64 {
        self.exit_radius_meters - self.enter_radius_meters
    }
}
