//! Configuration management CLI commands.
//!
//! Provides `config path`, `config show` and `config init`.

use std::path::{Path, PathBuf};

use clap::Subcommand;

use canalguide::config::ConfigFile;

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show the configuration file path
    Path,

    /// Print the effective configuration
    Show,

    /// Write a configuration file with default settings
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Run a config subcommand.
pub fn run(config_path: Option<&Path>, command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Path => {
            println!("{}", resolve_path(config_path)?.display());
            Ok(())
        }
        ConfigCommands::Show => run_show(config_path),
        ConfigCommands::Init { force } => run_init(&resolve_path(config_path)?, force),
    }
}

fn resolve_path(config_path: Option<&Path>) -> Result<PathBuf, CliError> {
    config_path
        .map(Path::to_path_buf)
        .or_else(ConfigFile::default_path)
        .ok_or_else(|| {
            CliError::Config("No config directory on this platform; pass --config".to_string())
        })
}

fn run_show(config_path: Option<&Path>) -> Result<(), CliError> {
    let config = match config_path {
        Some(path) => ConfigFile::load_or_default(path)?,
        None => ConfigFile::load_default()?,
    };
    print!("{}", config.to_ini_string()?);
    Ok(())
}

fn run_init(path: &Path, force: bool) -> Result<(), CliError> {
    if path.exists() && !force {
        return Err(CliError::Config(format!(
            "{} already exists; use --force to overwrite",
            path.display()
        )));
    }

    ConfigFile::default().save(path)?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}
