//! Simulation clock, configuration, tick cycle, and statistics for the
//! Hominids foraging simulation.
//!
//! This crate orchestrates the world and agent crates: it owns the clock,
//! loads configuration, runs the per-minute tick cycle, and rolls agent
//! activity up into day, season, and run snapshots.
//!
//! # Modules
//!
//! - [`clock`] -- Tick counter and calendar readings ([`SimClock`])
//! - [`config`] -- YAML configuration ([`SimulationConfig`])
//! - [`runner`] -- Bounded run loop with a per-tick callback
//! - [`stats`] -- Spatial activity tallies, season accumulators, run report
//! - [`tick`] -- Simulation state and the tick cycle ([`Simulation`])

pub mod clock;
pub mod config;
pub mod runner;
pub mod stats;
pub mod tick;

pub use clock::{ClockError, SimClock, TimeReading};
pub use config::{ConfigError, LogFormat, SimulationConfig};
pub use runner::{
    NoOpCallback, RunnerError, SimulationEndReason, SimulationResult, TickCallback,
    log_simulation_end, run_simulation,
};
pub use stats::{DaySnapshot, RunReport, SeasonAccumulator, SpatialActivity};
pub use tick::{ActivityCounts, Simulation, SimulationError, TickSummary, run_tick};
