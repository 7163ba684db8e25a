//! Statistics rollups produced at day, season, and run checkpoints.
//!
//! The simulation core performs no file I/O. These types collect tallies
//! while the run progresses and expose them as serializable snapshots for
//! whoever drives the run.

use hominids_agents::Agent;
use hominids_types::{
    Activity, AgentReport, CellActivity, DailyCalories, HominidSpecies, Position, SPECIES_COUNT,
    Season, SeasonSummary, SpeciesSeasonStats,
};
use hominids_world::{CarcassLifecycle, CarcassTotals, Grid};
use serde::Serialize;

/// Per-cell eating, travel, and nesting tallies over the whole grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpatialActivity {
    /// One entry per grid cell, row-major.
    cells: Vec<CellActivity>,
}

impl SpatialActivity {
    /// Empty tallies for every cell of `grid`.
    pub fn new(grid: &Grid) -> Self {
        Self {
            cells: grid
                .cells()
                .map(|cell| CellActivity::new(cell.position()))
                .collect(),
        }
    }

    /// Count one agent-minute of `activity` at `position`.
    ///
    /// Activities that are neither feeding, travel, nor nesting are ignored
    /// by [`CellActivity::record`].
    pub fn record(
        &mut self,
        grid: &Grid,
        position: Position,
        species: HominidSpecies,
        activity: Activity,
    ) {
        if let Some(cell) = grid
            .index_of(position)
            .and_then(|index| self.cells.get_mut(index))
        {
            cell.record(species, activity);
        }
    }

    /// Zero every tally.
    pub fn reset(&mut self) {
        for cell in &mut self.cells {
            *cell = CellActivity::new(Position::new(cell.x, cell.y));
        }
    }

    /// All cells, row-major.
    pub fn cells(&self) -> &[CellActivity] {
        &self.cells
    }

    /// Cells with at least one non-zero tally.
    pub fn active_cells(&self) -> Vec<CellActivity> {
        self.cells
            .iter()
            .filter(|cell| !cell.is_empty())
            .cloned()
            .collect()
    }
}

/// Summary of a single simulated day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySnapshot {
    /// Absolute day (0-based).
    pub day: u64,
    /// Year (0-based).
    pub year: u64,
    /// Season the day fell in.
    pub season: Season,
    /// Agents still participating at the end of the day.
    pub active_agents: u32,
    /// Agents flagged as starving after the day's evaluation.
    pub starving_agents: u32,
    /// Agents that crossed into starvation today.
    pub newly_starving: u32,
    /// Plant calories eaten by all agents today.
    pub plant_calories: f64,
    /// Meat calories eaten by all agents today.
    pub meat_calories: f64,
    /// Carcasses that appeared at the start of the day.
    pub carcasses_spawned: u32,
    /// Carcasses that expired at the start of the day.
    pub carcasses_expired: u32,
    /// Carcasses on the landscape at the end of the day.
    pub live_carcasses: u32,
    /// Plant grams standing on the landscape at the end of the day.
    pub standing_plant_grams: f64,
    /// Cells that saw activity today.
    pub activity: Vec<CellActivity>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct SpeciesTally {
    plant: f64,
    meat: f64,
    agent_days: u32,
}

/// Running totals for the season in progress.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonAccumulator {
    days: u32,
    species: [SpeciesTally; SPECIES_COUNT],
    carcass_baseline: CarcassTotals,
}

impl SeasonAccumulator {
    /// Start a season. `baseline` is the carcass lifecycle's lifetime
    /// counters at the moment the season begins.
    pub fn new(baseline: CarcassTotals) -> Self {
        Self {
            days: 0,
            species: [SpeciesTally::default(); SPECIES_COUNT],
            carcass_baseline: baseline,
        }
    }

    /// Add one active agent's closed day.
    pub fn record_agent_day(&mut self, species: HominidSpecies, calories: &DailyCalories) {
        if let Some(tally) = self.species.get_mut(species.index()) {
            tally.plant += calories.plant;
            tally.meat += calories.meat;
            tally.agent_days = tally.agent_days.saturating_add(1);
        }
    }

    /// Count a completed day.
    pub const fn close_day(&mut self) {
        self.days = self.days.saturating_add(1);
    }

    /// Days counted so far this season.
    pub const fn days(&self) -> u32 {
        self.days
    }

    /// Build the season summary from the tallies and current world state.
    pub fn summarize(
        &self,
        year: u64,
        season: Season,
        agents: &[Agent],
        grid: &Grid,
        carcasses: &CarcassLifecycle,
    ) -> SeasonSummary {
        let species = HominidSpecies::ALL
            .into_iter()
            .map(|kind| {
                let tally = self
                    .species
                    .get(kind.index())
                    .copied()
                    .unwrap_or_default();
                let members = agents.iter().filter(|agent| agent.species() == kind);
                let (mut total, mut active, mut starving) = (0_u32, 0_u32, 0_u32);
                for agent in members {
                    total = total.saturating_add(1);
                    if !agent.is_removed() {
                        active = active.saturating_add(1);
                    }
                    if agent.is_starving() {
                        starving = starving.saturating_add(1);
                    }
                }
                let mean_daily_calories = if tally.agent_days == 0 {
                    0.0
                } else {
                    (tally.plant + tally.meat) / f64::from(tally.agent_days)
                };
                SpeciesSeasonStats {
                    species: kind,
                    agents: total,
                    active,
                    starving,
                    plant_calories: tally.plant,
                    meat_calories: tally.meat,
                    mean_daily_calories,
                }
            })
            .collect();

        let totals = carcasses.totals();
        SeasonSummary {
            year,
            season,
            days: self.days,
            species,
            standing_plant_grams: grid.standing_plant_grams(),
            carcasses_spawned: totals.spawned.saturating_sub(self.carcass_baseline.spawned),
            carcasses_consumed: totals.consumed.saturating_sub(self.carcass_baseline.consumed),
            carcasses_expired: totals.expired.saturating_sub(self.carcass_baseline.expired),
            live_carcasses: u64::try_from(carcasses.len()).unwrap_or(u64::MAX),
        }
    }
}

/// Everything a finished (or stopped) run produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    /// Ticks executed.
    pub ticks: u64,
    /// Whole days completed.
    pub days: u64,
    /// Every season summary, in order.
    pub seasons: Vec<SeasonSummary>,
    /// Final state of every agent, ascending id.
    pub agents: Vec<AgentReport>,
    /// Cumulative activity for cells that saw any.
    pub activity: Vec<CellActivity>,
    /// Lifetime carcass counters.
    pub carcasses: CarcassTotals,
    /// Plant grams eaten from the landscape over the run.
    pub plant_grams_consumed: f64,
}
