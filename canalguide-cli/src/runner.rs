//! Shared command setup: configuration and logging.

use std::path::Path;

use canalguide::config::ConfigFile;
use canalguide::logging::{init_logging, WorkerGuard};

use crate::error::CliError;

/// Loads configuration and installs logging for a command run.
pub struct CliRunner {
    config: ConfigFile,
    // Flushes the log file on drop
    _log_guard: Option<WorkerGuard>,
}

impl CliRunner {
    /// Load config from `config_path` (or the default location) and set up
    /// logging.
    pub fn new(config_path: Option<&Path>) -> Result<Self, CliError> {
        let config = match config_path {
            Some(path) => ConfigFile::load(path)?,
            None => ConfigFile::load_default()?,
        };
        let log_guard = init_logging(&config.logging)?;

        Ok(Self {
            config,
            _log_guard: log_guard,
        })
    }

    /// The loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log the command being run.
    pub fn log_startup(&self, command: &str) {
        tracing::info!(
            version = canalguide::VERSION,
            command,
            enter_radius_m = self.config.proximity.enter_radius_meters,
            exit_radius_m = self.config.proximity.exit_radius_meters,
            "CanalGuide starting"
        );
    }
}
