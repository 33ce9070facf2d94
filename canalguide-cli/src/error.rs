//! CLI error types.

use std::fmt;

use canalguide::config::ConfigError;
use canalguide::logging::LoggingError;
use canalguide::poi::{CatalogError, DraftError};
use canalguide::proximity::ProximityError;
use canalguide::source::TrackError;

/// Errors that can occur while running a CLI command.
#[derive(Debug)]
pub enum CliError {
    /// Invalid configuration or arguments.
    Config(String),

    /// Failed to read the configuration file.
    ConfigFile(ConfigError),

    /// Failed to install logging.
    Logging(LoggingError),

    /// Failed to load or save the POI catalog.
    Catalog(CatalogError),

    /// The new POI draft is incomplete.
    Draft(DraftError),

    /// Failed to load the track.
    Track(TrackError),

    /// The proximity engine rejected its setup.
    Proximity(ProximityError),

    /// Failed to create the Tokio runtime.
    RuntimeCreation(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::ConfigFile(e) => write!(f, "Failed to load config: {}", e),
            CliError::Logging(e) => write!(f, "Failed to set up logging: {}", e),
            CliError::Catalog(e) => write!(f, "POI catalog error: {}", e),
            CliError::Draft(e) => write!(f, "Cannot add POI: {}", e),
            CliError::Track(e) => write!(f, "Track error: {}", e),
            CliError::Proximity(e) => write!(f, "Proximity engine error: {}", e),
            CliError::RuntimeCreation(msg) => {
                write!(f, "Failed to create Tokio runtime: {}", msg)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::ConfigFile(e) => Some(e),
            CliError::Logging(e) => Some(e),
            CliError::Catalog(e) => Some(e),
            CliError::Draft(e) => Some(e),
            CliError::Track(e) => Some(e),
            CliError::Proximity(e) => Some(e),
            CliError::Config(_) | CliError::RuntimeCreation(_) => None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::ConfigFile(e)
    }
}

impl From<LoggingError> for CliError {
    fn from(e: LoggingError) -> Self {
        CliError::Logging(e)
    }
}

impl From<CatalogError> for CliError {
    fn from(e: CatalogError) -> Self {
        CliError::Catalog(e)
    }
}

impl From<DraftError> for CliError {
    fn from(e: DraftError) -> Self {
        CliError::Draft(e)
    }
}

impl From<TrackError> for CliError {
    fn from(e: TrackError) -> Self {
        CliError::Track(e)
    }
}

impl From<ProximityError> for CliError {
    fn from(e: ProximityError) -> Self {
        CliError::Proximity(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_error_display() {
        let err = CliError::Config("missing track".to_string());
        assert!(err.to_string().contains("Configuration error"));
        assert!(err.to_string().contains("missing track"));
    }

    #[test]
    fn test_cli_error_from_proximity_error() {
        let err: CliError = ProximityError::InvalidConfiguration("bad".to_string()).into();
        assert!(matches!(err, CliError::Proximity(_)));
        assert!(std::error::Error::source(&err).is_some());
    }
}
