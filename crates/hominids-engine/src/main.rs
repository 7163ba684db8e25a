//! Command-line runner for the Hominids foraging simulation.
//!
//! # Startup Sequence
//!
//! 1. Load configuration (path from the first argument, otherwise
//!    `hominids-config.yaml` if present, otherwise defaults)
//! 2. Initialize structured logging (tracing) from the `logging` section
//! 3. Build the starting landscape and plant catalog
//! 4. Run the simulation for the configured number of years
//! 5. Print the run report as JSON on stdout
//!
//! Logs go to stderr so stdout carries only the report.

mod error;
mod report_callback;

use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use hominids_core::config::LoggingConfig;
use hominids_core::{
    DaySnapshot, LogFormat, Simulation, SimulationConfig, SimulationResult, log_simulation_end,
    run_simulation,
};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::report_callback::ReportCallback;

/// Config file looked up in the working directory when no path is given.
const DEFAULT_CONFIG_FILE: &str = "hominids-config.yaml";

/// Flag that keeps per-day cell activity in the output.
const DAILY_ACTIVITY_FLAG: &str = "--daily-activity";

/// Everything written to stdout.
#[derive(Debug, Serialize)]
struct EngineOutput {
    /// Run outcome and report.
    result: SimulationResult,
    /// One snapshot per completed day.
    days: Vec<DaySnapshot>,
}

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, setup, the run, or writing the report
/// fails.
fn main() -> anyhow::Result<()> {
    let mut config_path = None;
    let mut daily_activity = false;
    for arg in std::env::args().skip(1) {
        if arg == DAILY_ACTIVITY_FLAG {
            daily_activity = true;
        } else {
            config_path = Some(PathBuf::from(arg));
        }
    }

    // 1. Load configuration.
    let config = load_config(config_path.as_deref()).context("loading configuration")?;

    // 2. Initialize structured logging.
    init_tracing(&config.logging);
    info!(
        world_name = config.world.name,
        seed = config.world.seed,
        landscape = config.world.landscape,
        years = config.world.years,
        boisei = config.population.boisei.count,
        ergaster = config.population.ergaster.count,
        "Configuration loaded"
    );

    // 3-5. Build, run, report.
    let output = run(config, daily_activity).context("running simulation")?;
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &output).map_err(EngineError::from)?;
    writeln!(stdout).context("writing report")?;

    info!("hominids-engine finished");
    Ok(())
}

fn run(config: SimulationConfig, daily_activity: bool) -> Result<EngineOutput, EngineError> {
    let mut sim = Simulation::with_starting_world(config)?;
    info!(
        width = sim.grid.width(),
        height = sim.grid.height(),
        plant_species = sim.catalog.len(),
        agents = sim.agents.len(),
        "Starting world created"
    );

    let mut callback = ReportCallback::new(daily_activity);
    let result = run_simulation(&mut sim, None, &mut callback)?;
    log_simulation_end(&result);

    Ok(EngineOutput {
        result,
        days: callback.take_days(),
    })
}

/// Load configuration from `path`, or from [`DEFAULT_CONFIG_FILE`] when it
/// exists, or fall back to defaults.
fn load_config(path: Option<&Path>) -> Result<SimulationConfig, EngineError> {
    if let Some(path) = path {
        return Ok(SimulationConfig::from_file(path)?);
    }
    let default_path = Path::new(DEFAULT_CONFIG_FILE);
    if default_path.exists() {
        Ok(SimulationConfig::from_file(default_path)?)
    } else {
        Ok(SimulationConfig::parse("{}")?)
    }
}

/// Install the global subscriber. `RUST_LOG` takes precedence over the
/// configured level.
fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.as_str()));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);
    match logging.format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}
