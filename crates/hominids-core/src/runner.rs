//! Bounded simulation loop.
//!
//! [`run_simulation`] drives [`run_tick`] until the planned number of years
//! (or an explicit tick budget) has elapsed, or until every agent has been
//! removed by the starvation policy. A [`TickCallback`] sees every tick as
//! it completes.
//!
//! [`run_tick`]: crate::tick::run_tick

use serde::Serialize;
use tracing::info;

use crate::stats::RunReport;
use crate::tick::{self, Simulation, SimulationError, TickSummary};

/// Errors that can occur during the simulation run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A tick execution failed.
    #[error("tick error: {source}")]
    Tick {
        /// The underlying simulation error.
        #[from]
        source: SimulationError,
    },
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationEndReason {
    /// The tick budget was used up.
    Completed,
    /// No active agents remained.
    Extinction,
}

/// Result of the simulation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationResult {
    /// The reason the simulation ended.
    pub end_reason: SimulationEndReason,
    /// Total number of ticks executed by this call.
    pub total_ticks: u64,
    /// Everything the run produced.
    pub report: RunReport,
}

/// Callback invoked after each tick completes.
///
/// Implementations can collect day snapshots, stream tick summaries, and
/// so on. The callback receives the tick summary and the simulation state.
pub trait TickCallback {
    /// Called after a tick completes successfully.
    fn on_tick(&mut self, summary: &TickSummary, sim: &Simulation);
}

/// A no-op tick callback.
pub struct NoOpCallback;

impl TickCallback for NoOpCallback {
    fn on_tick(&mut self, _summary: &TickSummary, _sim: &Simulation) {}
}

/// Run the simulation loop until a termination condition is met.
///
/// # Arguments
///
/// * `sim` - Simulation state (world, agents, clock)
/// * `max_ticks` - Tick budget; `None` runs `world.years` full years
/// * `callback` - Called after each tick
///
/// # Errors
///
/// Returns [`RunnerError`] if the tick budget cannot be computed or a tick
/// fails.
pub fn run_simulation(
    sim: &mut Simulation,
    max_ticks: Option<u64>,
    callback: &mut dyn TickCallback,
) -> Result<SimulationResult, RunnerError> {
    let budget = match max_ticks {
        Some(ticks) => ticks,
        None => sim.planned_ticks().map_err(SimulationError::from)?,
    };

    info!(
        max_ticks = budget,
        years = sim.config.world.years,
        agents = sim.agents.len(),
        "Simulation starting"
    );

    let mut total_ticks: u64 = 0;
    let mut end_reason = SimulationEndReason::Completed;
    while total_ticks < budget {
        let summary = tick::run_tick(sim)?;
        total_ticks = total_ticks.saturating_add(1);

        callback.on_tick(&summary, sim);

        if sim.active_agents() == 0 {
            info!(tick = summary.reading.tick, "No active agents remain");
            end_reason = SimulationEndReason::Extinction;
            break;
        }
    }

    Ok(SimulationResult {
        end_reason,
        total_ticks,
        report: sim.report(),
    })
}

/// Log the simulation end sequence.
pub fn log_simulation_end(result: &SimulationResult) {
    let report = &result.report;
    let starving = report.agents.iter().filter(|a| a.starving).count();
    info!(
        reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        days = report.days,
        seasons = report.seasons.len(),
        agents = report.agents.len(),
        starving,
        carcasses_spawned = report.carcasses.spawned,
        carcasses_consumed = report.carcasses.consumed,
        plant_grams_consumed = report.plant_grams_consumed,
        "Simulation ended"
    );
}
