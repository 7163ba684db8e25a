//! Read-only output records.
//!
//! These are the tables handed to report writers at day, season, and run
//! checkpoints. The simulation core fills them in; it never writes them to
//! disk itself.

use serde::{Deserialize, Serialize};

use crate::enums::{Activity, HominidSpecies, Season};
use crate::ids::AgentId;
use crate::position::Position;

/// Number of hominid species tracked in per-species arrays.
pub const SPECIES_COUNT: usize = HominidSpecies::ALL.len();

/// Activity tallies for one grid cell, split by hominid species.
///
/// Array slots are indexed by [`HominidSpecies::index`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellActivity {
    /// Column of the cell.
    pub x: i32,
    /// Row of the cell.
    pub y: i32,
    /// Agent-minutes spent eating plants or scavenging meat here.
    pub eating: [u64; SPECIES_COUNT],
    /// Agent-minutes spent stepping into this cell.
    pub traveling: [u64; SPECIES_COUNT],
    /// Agent-nights spent nesting here.
    pub nesting: [u64; SPECIES_COUNT],
}

impl CellActivity {
    /// Create an empty tally for the cell at `position`.
    pub const fn new(position: Position) -> Self {
        Self {
            x: position.x,
            y: position.y,
            eating: [0; SPECIES_COUNT],
            traveling: [0; SPECIES_COUNT],
            nesting: [0; SPECIES_COUNT],
        }
    }

    /// Count one agent-minute of `activity` by an agent of `species`.
    ///
    /// Scanning and waiting are not tallied.
    pub fn record(&mut self, species: HominidSpecies, activity: Activity) {
        let slot = if activity.is_feeding() {
            &mut self.eating
        } else if activity.is_travel() {
            &mut self.traveling
        } else if activity == Activity::Nesting {
            &mut self.nesting
        } else {
            return;
        };
        if let Some(count) = slot.get_mut(species.index()) {
            *count = count.saturating_add(1);
        }
    }

    /// Whether nothing has been tallied in this cell.
    pub fn is_empty(&self) -> bool {
        self.eating.iter().chain(&self.traveling).chain(&self.nesting).all(|c| *c == 0)
    }
}

/// An agent's calorie intake over one season, cumulative across years.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonCalories {
    /// The season.
    pub season: Season,
    /// Calories from all plant foods.
    pub plant: f64,
    /// Calories from carcass meat.
    pub meat: f64,
    /// Plant calories from dug foods (tubers, rhizomes).
    pub root: f64,
    /// Plant calories from foods that need no digging.
    pub non_root: f64,
}

/// An agent's calorie intake for one simulated day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyCalories {
    /// Absolute day number (0-based).
    pub day: u64,
    /// Calories from plant foods.
    pub plant: f64,
    /// Calories from carcass meat.
    pub meat: f64,
}

impl DailyCalories {
    /// Total calories for the day.
    pub fn total(&self) -> f64 {
        self.plant + self.meat
    }
}

/// Population and intake aggregates for one species over one season.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesSeasonStats {
    /// The species.
    pub species: HominidSpecies,
    /// Agents of this species created at start.
    pub agents: u32,
    /// Agents still being stepped (not retired by the starvation policy).
    pub active: u32,
    /// Agents currently flagged as starving.
    pub starving: u32,
    /// Plant calories eaten by the species during the season.
    pub plant_calories: f64,
    /// Meat calories eaten by the species during the season.
    pub meat_calories: f64,
    /// Mean calories per agent-day during the season.
    pub mean_daily_calories: f64,
}

/// Season-level population and food summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonSummary {
    /// Zero-based simulated year.
    pub year: u64,
    /// The season that just ended.
    pub season: Season,
    /// Number of days the season lasted.
    pub days: u32,
    /// Per-species aggregates, in [`HominidSpecies::ALL`] order.
    pub species: Vec<SpeciesSeasonStats>,
    /// Standing plant food across the whole grid at season end, in grams.
    pub standing_plant_grams: f64,
    /// Carcasses that appeared during the season.
    pub carcasses_spawned: u64,
    /// Carcasses eaten down to nothing during the season.
    pub carcasses_consumed: u64,
    /// Carcasses removed by the expiry policy during the season.
    pub carcasses_expired: u64,
    /// Carcasses still on the landscape at season end.
    pub live_carcasses: u64,
}

/// Per-agent report at the end of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentReport {
    /// The agent.
    pub id: AgentId,
    /// Its species.
    pub species: HominidSpecies,
    /// Can dig for tubers and rhizomes.
    pub can_dig: bool,
    /// Can eat carcass meat.
    pub can_eat_meat: bool,
    /// Cooperates on medium and large carcasses.
    pub cooperates: bool,
    /// Nests with its group rather than alone.
    pub nests_in_group: bool,
    /// Final position.
    pub position: Position,
    /// Flagged as starving at the last evaluation.
    pub starving: bool,
    /// Retired by the starvation policy.
    pub removed: bool,
    /// Mean calories per recorded day.
    pub mean_daily_calories: f64,
    /// Calorie breakdown per season.
    pub season_calories: Vec<SeasonCalories>,
    /// Calorie totals per day.
    pub daily_calories: Vec<DailyCalories>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_routes_activities_to_tallies() {
        let mut cell = CellActivity::new(Position::new(3, 4));
        cell.record(HominidSpecies::Boisei, Activity::Eating);
        cell.record(HominidSpecies::Ergaster, Activity::Scavenging);
        cell.record(HominidSpecies::Ergaster, Activity::Moving);
        cell.record(HominidSpecies::Boisei, Activity::Nesting);
        cell.record(HominidSpecies::Boisei, Activity::Waiting);

        assert_eq!(cell.eating, [1, 1]);
        assert_eq!(cell.traveling, [0, 1]);
        assert_eq!(cell.nesting, [1, 0]);
        assert!(!cell.is_empty());
    }

    #[test]
    fn scanning_is_not_tallied() {
        let mut cell = CellActivity::new(Position::default());
        cell.record(HominidSpecies::Boisei, Activity::Scanning);
        assert!(cell.is_empty());
    }
}
