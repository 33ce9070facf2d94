//! CanalGuide CLI - Command-line interface
//!
//! Replays a walk through the canal tour, manages the POI catalog and the
//! configuration file.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::config::ConfigCommands;
use commands::distance::DistanceArgs;
use commands::pois::PoiCommands;
use commands::simulate::SimulateArgs;
use error::CliError;

#[derive(Debug, Parser)]
#[command(name = "canalguide")]
#[command(version, about = "Location-aware canal tour guide", long_about = None)]
struct Cli {
    /// Path to the config file (defaults to ~/.config/canalguide/config.ini)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Replay a walk and print arrivals at points of interest
    Simulate(SimulateArgs),

    /// List or add points of interest
    Pois {
        #[command(subcommand)]
        command: PoiCommands,
    },

    /// Distance and bearing between two coordinates
    Distance(DistanceArgs),

    /// View or initialize the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Simulate(args) => commands::simulate::run(config_path, args),
        Commands::Pois { command } => commands::pois::run(config_path, command),
        Commands::Distance(args) => commands::distance::run(args),
        Commands::Config { command } => commands::config::run(config_path, command),
    }
}
