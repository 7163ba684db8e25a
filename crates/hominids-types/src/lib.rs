//! Shared type definitions for the Hominids foraging simulation.
//!
//! This crate is the single source of truth for the identifiers, enums, and
//! output records used across the workspace. It has no behavior beyond small
//! derivations (season index, zone label parsing).
//!
//! # Modules
//!
//! - [`ids`] -- Integer newtype identifiers for agents, carcasses, plant species
//! - [`enums`] -- Topography zones, seasons, hominid species, carcass sizes,
//!   discovery states, agent activities
//! - [`position`] -- Grid coordinates
//! - [`records`] -- Read-only output records produced at day, season, and run
//!   checkpoints

pub mod enums;
pub mod ids;
pub mod position;
pub mod records;

// Re-export all public types at crate root for convenience.
pub use enums::{Activity, CarcassSize, DiscoveryState, HominidSpecies, Season, Zone};
pub use ids::{AgentId, CarcassId, PlantSpeciesId};
pub use position::Position;
pub use records::{
    AgentReport, CellActivity, DailyCalories, SPECIES_COUNT, SeasonCalories, SeasonSummary,
    SpeciesSeasonStats,
};
