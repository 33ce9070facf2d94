//! Simulate command - replay a walk through the tour.
//!
//! Fixes come from a recorded track file, or are synthesized by walking the
//! built-in canal route. Arrivals are printed as info cards as they happen.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use console::style;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use canalguide::poi::PoiCatalog;
use canalguide::proximity::{ChannelObserver, GeoProximityEngine, Timestamp, TourEvent};
use canalguide::route::{Route, TourProgress};
use canalguide::source::{drive, DriveSummary, TrackReplay};

use super::common::{load_catalog, resolve_proximity};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Default spacing of synthesized fixes along the route.
const DEFAULT_STEP_METERS: f64 = 5.0;

/// Time between synthesized fixes.
const SYNTHETIC_FIX_INTERVAL: Duration = Duration::from_secs(1);

/// Arguments for the simulate command.
#[derive(Debug, Args)]
pub struct SimulateArgs {
    /// Recorded track (JSON array of fixes); walks the canal route when omitted
    #[arg(long)]
    pub track: Option<PathBuf>,

    /// POI catalog file (overrides [tour] pois_file)
    #[arg(long)]
    pub pois: Option<PathBuf>,

    /// Arrival radius in meters
    #[arg(long)]
    pub enter_radius: Option<f64>,

    /// Departure radius in meters (defaults to 1.5x the arrival radius)
    #[arg(long)]
    pub exit_radius: Option<f64>,

    /// Replay speed factor; fixes are sent back to back when omitted
    #[arg(long)]
    pub speed: Option<f64>,

    /// Spacing of synthesized fixes in meters
    #[arg(long, default_value_t = DEFAULT_STEP_METERS)]
    pub step: f64,
}

/// Run the simulate command.
pub fn run(config_path: Option<&Path>, args: SimulateArgs) -> Result<(), CliError> {
    let runner = CliRunner::new(config_path)?;
    runner.log_startup("simulate");

    if !(args.step.is_finite() && args.step > 0.0) {
        return Err(CliError::Config(format!(
            "Step must be a positive number of meters, got {}",
            args.step
        )));
    }

    let proximity = resolve_proximity(args.enter_radius, args.exit_radius, runner.config())?;
    let catalog = load_catalog(args.pois.as_deref(), runner.config())?;
    let track = match &args.track {
        Some(path) => TrackReplay::load(path)?,
        None => TrackReplay::walk_route(
            &Route::amsterdam_canal_tour(),
            args.step,
            Timestamp::now(),
            SYNTHETIC_FIX_INTERVAL,
        ),
    };

    println!(
        "Touring {} stops with {} fixes (arrive within {} m, leave beyond {} m)",
        catalog.len(),
        track.len(),
        proximity.enter_radius_meters,
        proximity.exit_radius_meters
    );
    println!();

    let mut engine = GeoProximityEngine::from_catalog(proximity, &catalog)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::RuntimeCreation(e.to_string()))?;

    let (summary, progress) =
        runtime.block_on(simulate(&mut engine, &catalog, track, args.speed))?;

    print_summary(&summary, &progress);
    Ok(())
}

async fn simulate(
    engine: &mut GeoProximityEngine,
    catalog: &PoiCatalog,
    track: TrackReplay,
    speed: Option<f64>,
) -> Result<(DriveSummary, TourProgress), CliError> {
    let cancellation_token = CancellationToken::new();

    let (observer, events) = ChannelObserver::channel();
    engine.subscribe(Arc::new(observer));

    let printer = tokio::spawn(print_events(events, TourProgress::new(catalog)));

    let ctrl_c_token = cancellation_token.clone();
    tokio::spawn(async move {
        tokio::select! {
            _ = ctrl_c_token.cancelled() => {}
            result = tokio::signal::ctrl_c() => {
                if result.is_ok() {
                    tracing::info!("Interrupted, stopping tour");
                    ctrl_c_token.cancel();
                }
            }
        }
    });

    let (tx, mut updates) = mpsc::unbounded_channel();
    let replay = tokio::spawn(track.replay(tx, speed, cancellation_token.clone()));

    let result = drive(engine, &mut updates, cancellation_token.clone()).await;

    // Stop the replay and ctrl-c tasks, then close the event channel so the
    // printer drains and returns.
    cancellation_token.cancel();
    drop(updates);
    if let Err(e) = replay.await {
        tracing::warn!(error = %e, "Track replay task failed");
    }
    engine.dispose();

    let progress = printer
        .await
        .map_err(|e| CliError::Config(format!("Event printer failed: {}", e)))?;

    Ok((result?, progress))
}

async fn print_events(
    mut events: mpsc::UnboundedReceiver<TourEvent>,
    mut progress: TourProgress,
) -> TourProgress {
    while let Some(event) = events.recv().await {
        match event {
            TourEvent::Entered(enter) => {
                progress.record(&enter);
                let poi = &enter.poi;
                println!(
                    "{} {}  {}",
                    style(progress.stop_label()).dim(),
                    style(&poi.name).bold().cyan(),
                    style(enter.fix.timestamp).dim()
                );
                if !poi.description.is_empty() {
                    println!("  {}", poi.description);
                }
                if poi.has_audio() {
                    println!("  {} {}", style("Audio:").green(), poi.audio_ref);
                }
                println!();
            }
            TourEvent::LocationUnavailable(failure) => {
                println!(
                    "{} location unavailable ({})",
                    style("!").yellow().bold(),
                    failure
                );
            }
        }
    }
    progress
}

fn print_summary(summary: &DriveSummary, progress: &TourProgress) {
    println!("{}", style("Tour summary").bold());
    println!("  Fixes processed:  {}", summary.fixes_processed);
    println!(
        "  Fixes dropped:    {} invalid, {} out of order",
        summary.invalid_fixes, summary.out_of_order_fixes
    );
    println!("  Arrivals:         {}", summary.enter_events);
    println!(
        "  Stops visited:    {} of {}",
        progress.visited().len(),
        progress.total_stops()
    );
    if let Some(failure) = summary.last_failure {
        println!("  Location:         {}", style(failure).yellow());
    }
    if summary.cancelled {
        println!("  {}", style("Stopped early").yellow());
    } else if progress.is_complete() {
        println!("  {}", style("Tour complete").green());
    }
}
