//! Forager agents for the Hominids simulation.
//!
//! This crate holds everything that operates on a single forager: its
//! capability set, the per-minute decision procedure (scan, choose, act),
//! carcass cooperation and waiting, wandering, nesting, and the end-of-day
//! starvation check. It reads and mutates the world through a
//! [`StepContext`] lent by the orchestrator and never owns world state.
//!
//! # Modules
//!
//! - [`agent`] -- [`Agent`] state and the per-minute state machine.
//! - [`capabilities`] -- [`Capabilities`] parsed from option strings such as `"gdmc"`.
//! - [`communication`] -- [`CommunicationChannel`], the per-tick carcass call registry.
//! - [`config`] -- [`ForagingConfig`], [`SpeciesTraits`], and [`StarvationPolicy`].
//! - [`error`] -- Error types for agent construction ([`AgentError`]).
//! - [`foraging`] -- Food options and the return-rate choice rule.
//! - [`ledger`] -- [`CalorieLedger`], per-agent calorie accounting.
//! - [`occupancy`] -- [`Occupancy`], the live index of who stands where.

pub mod agent;
pub mod capabilities;
pub mod communication;
pub mod config;
pub mod error;
pub mod foraging;
pub mod ledger;
pub mod occupancy;

// Re-export primary types at crate root for convenience.
pub use agent::{Agent, DayOutcome, StepContext, StepReport, WaitState};
pub use capabilities::Capabilities;
pub use communication::CommunicationChannel;
pub use config::{ForagingConfig, SpeciesTraits, StarvationPolicy};
pub use error::AgentError;
pub use foraging::{FoodOption, FoodSource, choose};
pub use ledger::CalorieLedger;
pub use occupancy::{Occupancy, Occupant};
