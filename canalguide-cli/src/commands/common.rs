//! Shared utilities for CLI commands.

use std::path::Path;

use canalguide::config::ConfigFile;
use canalguide::poi::PoiCatalog;
use canalguide::proximity::ProximityConfig;

use crate::error::CliError;

/// Resolve the radius configuration.
///
/// Command-line values win over the config file. When only an enter radius
/// is given, the exit radius follows the default factor.
pub fn resolve_proximity(
    enter_radius: Option<f64>,
    exit_radius: Option<f64>,
    config: &ConfigFile,
) -> Result<ProximityConfig, CliError> {
    let resolved = match (enter_radius, exit_radius) {
        (None, None) => return Ok(config.proximity),
        (Some(enter), None) => ProximityConfig::with_enter_radius(enter),
        (None, Some(exit)) => ProximityConfig::new(config.proximity.enter_radius_meters, exit),
        (Some(enter), Some(exit)) => ProximityConfig::new(enter, exit),
    };
    resolved.map_err(|e| CliError::Config(e.to_string()))
}

/// Load the POI catalog.
///
/// Uses the command-line path, then `[tour] pois_file`, then the built-in
/// Amsterdam tour.
pub fn load_catalog(path: Option<&Path>, config: &ConfigFile) -> Result<PoiCatalog, CliError> {
    match path.or(config.tour.pois_file.as_deref()) {
        Some(path) => Ok(PoiCatalog::load(path)?),
        None => Ok(PoiCatalog::amsterdam_canal_tour()),
    }
}
