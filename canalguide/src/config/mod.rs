//! Configuration file support
//!
//! Settings are read from an INI file, by default
//! `~/.config/canalguide/config.ini`. A missing file yields defaults.
//!
//! # Example
//!
//! ```ini
//! [proximity]
//! enter_radius = 20
//! exit_radius = 30
//!
//! [tour]
//! pois_file = /home/user/tours/amsterdam.json
//!
//! [logging]
//! directory = /home/user/.local/share/canalguide/logs
//! level = info
//! ```

use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;

use crate::proximity::{ProximityConfig, ProximityError};

/// Directory name under the platform config directory.
const CONFIG_DIR_NAME: &str = "canalguide";

/// Config file name.
const CONFIG_FILE_NAME: &str = "config.ini";

/// Default log level when none is configured.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read or parsed.
    #[error("Failed to read config: {0}")]
    Ini(#[from] ini::Error),

    /// I/O error writing the config.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A value has the wrong type.
    #[error("Invalid value for [{section}] {key}: '{value}'")]
    InvalidValue {
        section: &'static str,
        key: &'static str,
        value: String,
    },

    /// The radius settings are inconsistent.
    #[error(transparent)]
    Proximity(#[from] ProximityError),
}

/// Tour settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TourSettings {
    /// POI catalog file; the built-in tour is used when unset.
    pub pois_file: Option<PathBuf>,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Directory for rolling log files; stderr only when unset.
    pub directory: Option<PathBuf>,
    /// Default filter directive, overridden by `RUST_LOG`.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            directory: None,
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

/// Parsed configuration file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    pub proximity: ProximityConfig,
    pub tour: TourSettings,
    pub logging: LoggingSettings,
}

impl ConfigFile {
    /// Default config file location, if the platform has a config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load from the default location, falling back to defaults.
    pub fn load_default() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) => Self::load_or_default(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load from `path`, or return defaults if it does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Load from `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_file(path)?;
        Self::from_ini(&ini)
    }

    /// Parse from INI text.
    pub fn from_ini_str(contents: &str) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_str(contents).map_err(|e| ConfigError::Ini(ini::Error::Parse(e)))?;
        Self::from_ini(&ini)
    }

    fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(section) = ini.section(Some("proximity")) {
            let enter = match section.get("enter_radius") {
                Some(v) => parse_f64("proximity", "enter_radius", v)?,
                None => config.proximity.enter_radius_meters,
            };
            config.proximity = match section.get("exit_radius") {
                Some(v) => ProximityConfig::new(enter, parse_f64("proximity", "exit_radius", v)?)?,
                None => ProximityConfig::with_enter_radius(enter)?,
            };
        }

        if let Some(section) = ini.section(Some("tour")) {
            config.tour.pois_file = section
                .get("pois_file")
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from);
        }

        if let Some(section) = ini.section(Some("logging")) {
            config.logging.directory = section
                .get("directory")
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from);
            if let Some(level) = section.get("level").map(str::trim).filter(|v| !v.is_empty()) {
                config.logging.level = level.to_string();
            }
        }

        Ok(config)
    }

    /// Render as INI text.
    pub fn to_ini_string(&self) -> Result<String, ConfigError> {
        let mut ini = Ini::new();
        ini.with_section(Some("proximity"))
            .set("enter_radius", self.proximity.enter_radius_meters.to_string())
            .set("exit_radius", self.proximity.exit_radius_meters.to_string());

        if let Some(path) = &self.tour.pois_file {
            ini.with_section(Some("tour"))
                .set("pois_file", path.display().to_string());
        }

        let mut logging = ini.with_section(Some("logging"));
        logging.set("level", self.logging.level.clone());
        if let Some(dir) = &self.logging.directory {
            logging.set("directory", dir.display().to_string());
        }

        let mut out = Vec::new();
        ini.write_to(&mut out)?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    /// Write to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_ini_string()?)?;
        Ok(())
    }
}

fn parse_f64(section: &'static str, key: &'static str, value: &str) -> Result<f64, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue {
            section,
            key,
            value: value.to_string(),
        })
}
