//! POI catalog commands.
//!
//! `pois list` prints the catalog; `pois add` appends a new point of
//! interest to a catalog file, creating it from the built-in tour if it
//! does not exist yet.

use std::path::{Path, PathBuf};

use clap::Subcommand;
use console::style;

use canalguide::poi::{NewPoi, PoiCatalog};

use super::common::load_catalog;
use crate::error::CliError;
use crate::runner::CliRunner;

/// POI subcommands.
#[derive(Debug, Subcommand)]
pub enum PoiCommands {
    /// List points of interest
    List {
        /// POI catalog file (overrides [tour] pois_file)
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Add a point of interest to a catalog file
    Add {
        /// Display name
        #[arg(long)]
        name: Option<String>,

        /// Location as "lat,lng"
        #[arg(long, allow_hyphen_values = true)]
        coordinates: Option<String>,

        /// Description shown on arrival
        #[arg(long)]
        description: Option<String>,

        /// Audio commentary URL
        #[arg(long)]
        audio_url: Option<String>,

        /// Catalog file to update (overrides [tour] pois_file)
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

/// Run a POI subcommand.
pub fn run(config_path: Option<&Path>, command: PoiCommands) -> Result<(), CliError> {
    let runner = CliRunner::new(config_path)?;

    match command {
        PoiCommands::List { file } => {
            let catalog = load_catalog(file.as_deref(), runner.config())?;
            print_catalog(&catalog);
            Ok(())
        }
        PoiCommands::Add {
            name,
            coordinates,
            description,
            audio_url,
            file,
        } => {
            let path = file
                .or_else(|| runner.config().tour.pois_file.clone())
                .ok_or_else(|| {
                    CliError::Config(
                        "No catalog file given; pass --file or set [tour] pois_file".to_string(),
                    )
                })?;
            let draft = NewPoi {
                name,
                coordinates,
                description,
                audio_ref: audio_url,
            };
            run_add(&path, draft)
        }
    }
}

fn run_add(path: &Path, draft: NewPoi) -> Result<(), CliError> {
    let mut catalog = if path.exists() {
        PoiCatalog::load(path)?
    } else {
        PoiCatalog::amsterdam_canal_tour()
    };

    let poi = draft.build()?;
    println!("Added {} ({}) at {}", style(&poi.name).bold(), poi.id, poi.coordinates);
    catalog.push(poi)?;
    catalog.save(path)?;

    println!("Catalog now has {} stops: {}", catalog.len(), path.display());
    Ok(())
}

fn print_catalog(catalog: &PoiCatalog) {
    if catalog.is_empty() {
        println!("No points of interest.");
        return;
    }

    for (i, poi) in catalog.iter().enumerate() {
        println!(
            "{:>2}. {}  {}",
            i + 1,
            style(&poi.name).bold(),
            style(poi.coordinates).dim()
        );
        if !poi.description.is_empty() {
            println!("    {}", poi.description);
        }
        if poi.has_audio() {
            println!("    {} {}", style("Audio:").green(), poi.audio_ref);
        }
    }
}
