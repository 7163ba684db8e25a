//! Tick cycle: the per-minute loop that drives the Hominids simulation.
//!
//! Each tick runs these phases in order:
//!
//! 1. **Calls** -- clear the communication channel and re-publish the calls
//!    of agents waiting alone at a carcass.
//! 2. **Dawn** (first minute of a day only) -- daily plant growth/decay, then
//!    carcass expiry and appearance.
//! 3. **Forage** -- rebuild the occupancy index, then step every active agent
//!    in ascending id. On the last minute of the day agents nest instead.
//!    Food depletion is applied immediately and is visible to later agents
//!    in the same tick.
//! 4. **Dusk** (last minute only) -- starvation checks, day snapshot, reset
//!    of per-day agent state.
//! 5. **Season end** (last minute of a season only) -- season summary.
//! 6. **Advance** the clock.
//!
//! The cycle is deterministic given the same configuration and seed: one
//! seeded RNG drives every random draw and agents are always visited in the
//! same order.

use hominids_agents::{Agent, AgentError, CommunicationChannel, Occupancy, StepContext};
use hominids_types::{Activity, AgentId, HominidSpecies, Position, SeasonSummary};
use hominids_world::{
    CarcassDayReport, CarcassLifecycle, Grid, Landscape, PlantCatalog, WorldError,
    river_landscape, starting_catalog,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{debug, info};

use crate::clock::{ClockError, SimClock, TimeReading};
use crate::config::{ConfigError, SimulationConfig};
use crate::stats::{DaySnapshot, RunReport, SeasonAccumulator, SpatialActivity};

/// Errors that can occur while building or running a simulation.
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    /// The configuration failed validation.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ConfigError,
    },

    /// A clock operation failed.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },

    /// Building the world failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },

    /// Agent setup failed.
    #[error("agent error: {source}")]
    Agent {
        /// The underlying agent error.
        #[from]
        source: AgentError,
    },

    /// The landscape does not match the configured grid size.
    #[error("landscape is {actual_width}x{actual_height}, config expects {width}x{height}")]
    LandscapeSize {
        /// Configured width.
        width: i32,
        /// Configured height.
        height: i32,
        /// Landscape width.
        actual_width: i32,
        /// Landscape height.
        actual_height: i32,
    },
}

/// Agent counts per activity for a single tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ActivityCounts {
    /// Agents that scanned without acting.
    pub scanning: u32,
    /// Agents that took a step.
    pub moving: u32,
    /// Agents that ate plants.
    pub eating: u32,
    /// Agents that ate meat.
    pub scavenging: u32,
    /// Agents waiting at a carcass.
    pub waiting: u32,
    /// Agents that nested.
    pub nesting: u32,
}

impl ActivityCounts {
    const fn record(&mut self, activity: Activity) {
        let slot = match activity {
            Activity::Scanning => &mut self.scanning,
            Activity::Moving => &mut self.moving,
            Activity::Eating => &mut self.eating,
            Activity::Scavenging => &mut self.scavenging,
            Activity::Waiting => &mut self.waiting,
            Activity::Nesting => &mut self.nesting,
        };
        *slot = slot.saturating_add(1);
    }
}

/// Summary of a completed tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickSummary {
    /// Calendar position of the tick that was executed.
    pub reading: TimeReading,
    /// Agents that took part in the tick.
    pub active_agents: u32,
    /// What those agents did.
    pub activities: ActivityCounts,
    /// Plant grams eaten during the tick.
    pub plant_grams: f64,
    /// Meat grams eaten during the tick.
    pub meat_grams: f64,
    /// Calories gained during the tick.
    pub calories: f64,
    /// Day snapshot, on the last minute of a day.
    pub day: Option<DaySnapshot>,
    /// Season summary, on the last minute of a season.
    pub season: Option<SeasonSummary>,
}

/// The mutable simulation state passed through the tick cycle.
///
/// World state is public so drivers and tests can inspect or arrange it
/// between ticks. Run bookkeeping is private.
#[derive(Debug)]
pub struct Simulation {
    /// Validated configuration.
    pub config: SimulationConfig,
    /// Simulation clock.
    pub clock: SimClock,
    /// Toroidal grid with per-cell plant resource fields.
    pub grid: Grid,
    /// Immutable plant species catalog for the landscape.
    pub catalog: PlantCatalog,
    /// Live carcasses and their lifecycle counters.
    pub carcasses: CarcassLifecycle,
    /// Carcass calls for the current tick.
    pub channel: CommunicationChannel,
    /// Agents per cell.
    pub occupancy: Occupancy,
    /// Every agent, ascending id. Removed agents stay for reporting.
    pub agents: Vec<Agent>,
    /// The one random stream of the run.
    rng: ChaCha8Rng,
    /// Cumulative spatial activity for the run.
    activity: SpatialActivity,
    /// Spatial activity for the current day.
    daily_activity: SpatialActivity,
    /// Totals for the season in progress.
    season: SeasonAccumulator,
    /// Completed season summaries.
    seasons: Vec<SeasonSummary>,
    /// Carcass events from the current day's dawn.
    dawn_report: CarcassDayReport,
}

impl Simulation {
    /// Build a simulation on an explicit landscape and catalog.
    ///
    /// Agents are created all boisei first, then ergaster, with ascending
    /// ids and positions drawn from the seeded RNG.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError`] if the configuration is invalid or the
    /// landscape does not match the configured grid.
    pub fn new(
        config: SimulationConfig,
        landscape: &Landscape,
        catalog: PlantCatalog,
    ) -> Result<Self, SimulationError> {
        config.validate()?;
        if landscape.width() != config.world.width || landscape.height() != config.world.height {
            return Err(SimulationError::LandscapeSize {
                width: config.world.width,
                height: config.world.height,
                actual_width: landscape.width(),
                actual_height: landscape.height(),
            });
        }

        let clock = SimClock::new(&config.time)?;
        let grid = Grid::new(landscape, &catalog, config.plants.initial_fraction)?;
        let carcasses = CarcassLifecycle::new(config.carcasses.clone())?;
        let mut rng = ChaCha8Rng::seed_from_u64(config.world.seed);

        let mut agents = Vec::new();
        let mut next_id = 0_u32;
        for species in HominidSpecies::ALL {
            let population = config.population.species(species);
            let capabilities = population.parsed_capabilities(species)?;
            let traits = config.foraging.traits(species);
            for _ in 0..population.count {
                let position = Position::new(
                    rng.random_range(0..grid.width()),
                    rng.random_range(0..grid.height()),
                );
                agents.push(Agent::new(
                    AgentId(next_id),
                    species,
                    capabilities,
                    position,
                    traits,
                ));
                next_id = next_id.saturating_add(1);
            }
        }

        let mut occupancy = Occupancy::new();
        occupancy.rebuild(agents.iter().map(|a| (a.position(), a.occupant())));

        let activity = SpatialActivity::new(&grid);
        let season = SeasonAccumulator::new(*carcasses.totals());

        info!(
            name = config.world.name,
            landscape = landscape.name(),
            width = grid.width(),
            height = grid.height(),
            plant_species = catalog.len(),
            agents = agents.len(),
            seed = config.world.seed,
            "Simulation initialised"
        );

        Ok(Self {
            config,
            clock,
            grid,
            catalog,
            carcasses,
            channel: CommunicationChannel::new(),
            occupancy,
            agents,
            rng,
            daily_activity: activity.clone(),
            activity,
            season,
            seasons: Vec::new(),
            dawn_report: CarcassDayReport::default(),
        })
    }

    /// Build a simulation on the built-in river landscape and the plant
    /// catalog named by `world.landscape`.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError`] if the landscape name is unknown or the
    /// configuration is invalid.
    pub fn with_starting_world(config: SimulationConfig) -> Result<Self, SimulationError> {
        let landscape = river_landscape(
            config.world.landscape.as_str(),
            config.world.width,
            config.world.height,
        )?;
        let catalog = starting_catalog(&config.world.landscape)?;
        Self::new(config, &landscape, catalog)
    }

    /// Agent by id.
    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.iter().find(|a| a.id() == id)
    }

    /// Agents not removed by the starvation policy.
    pub fn active_agents(&self) -> usize {
        self.agents.iter().filter(|a| !a.is_removed()).count()
    }

    /// Cumulative spatial activity since the start of the run.
    pub const fn activity(&self) -> &SpatialActivity {
        &self.activity
    }

    /// Completed season summaries.
    pub fn seasons(&self) -> &[SeasonSummary] {
        &self.seasons
    }

    /// Ticks needed to cover `world.years`.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] on overflow.
    pub fn planned_ticks(&self) -> Result<u64, ClockError> {
        self.clock.ticks_for_years(self.config.world.years)
    }

    /// Snapshot everything produced so far.
    pub fn report(&self) -> RunReport {
        let ticks = self.clock.tick();
        RunReport {
            ticks,
            days: ticks
                .checked_div(u64::from(self.clock.minutes_per_day()))
                .unwrap_or(0),
            seasons: self.seasons.clone(),
            agents: self.agents.iter().map(Agent::report).collect(),
            activity: self.activity.active_cells(),
            carcasses: *self.carcasses.totals(),
            plant_grams_consumed: self.grid.consumed_plant_grams(),
        }
    }
}

/// Tallies gathered while stepping agents.
#[derive(Debug, Default)]
struct ForageResult {
    active_agents: u32,
    activities: ActivityCounts,
    plant_grams: f64,
    meat_grams: f64,
    calories: f64,
}

/// Execute one tick of the simulation.
///
/// # Errors
///
/// Returns [`SimulationError::Clock`] if the tick counter overflows.
pub fn run_tick(sim: &mut Simulation) -> Result<TickSummary, SimulationError> {
    let reading = sim.clock.reading();

    // --- Phase 1: Calls ---
    phase_calls(sim);

    // --- Phase 2: Dawn ---
    if reading.is_day_start {
        phase_dawn(sim, &reading);
    }

    // --- Phase 3: Forage ---
    let forage = phase_forage(sim, &reading);

    // --- Phase 4: Dusk ---
    let day = reading.is_last_minute.then(|| phase_dusk(sim, &reading));

    // --- Phase 5: Season end ---
    let season = reading.is_season_end.then(|| phase_season_end(sim, &reading));

    // --- Phase 6: Advance ---
    sim.clock.advance()?;

    Ok(TickSummary {
        reading,
        active_agents: forage.active_agents,
        activities: forage.activities,
        plant_grams: forage.plant_grams,
        meat_grams: forage.meat_grams,
        calories: forage.calories,
        day,
        season,
    })
}

/// Reset the channel and carry over the calls of lone waiters.
fn phase_calls(sim: &mut Simulation) {
    sim.channel.clear();
    for (id, position) in sim.agents.iter().filter_map(Agent::announcement) {
        if sim.carcasses.get(id).is_some() {
            sim.channel.publish(id, position);
        }
    }
}

fn phase_dawn(sim: &mut Simulation, reading: &TimeReading) {
    sim.grid
        .daily_plant_update(reading.season, &sim.catalog, sim.config.plants.reseed_fraction);
    sim.dawn_report = sim
        .carcasses
        .daily_update(&mut sim.grid, reading.day, &mut sim.rng);

    debug!(
        day = reading.day,
        season = ?reading.season,
        spawned = sim.dawn_report.spawned.len(),
        expired = sim.dawn_report.expired.len(),
        live = sim.carcasses.len(),
        standing_plant_grams = sim.grid.standing_plant_grams(),
        "Dawn"
    );
}

fn phase_forage(sim: &mut Simulation, reading: &TimeReading) -> ForageResult {
    sim.occupancy.rebuild(
        sim.agents
            .iter()
            .filter(|a| !a.is_removed())
            .map(|a| (a.position(), a.occupant())),
    );

    let mut ctx = StepContext {
        grid: &mut sim.grid,
        catalog: &sim.catalog,
        carcasses: &mut sim.carcasses,
        channel: &mut sim.channel,
        occupancy: &mut sim.occupancy,
        config: &sim.config.foraging,
        season: reading.season,
        day: reading.day,
    };

    let mut result = ForageResult::default();
    for agent in sim.agents.iter_mut().filter(|a| !a.is_removed()) {
        let report = if reading.is_last_minute {
            agent.nest(&mut ctx)
        } else {
            agent.step(&mut ctx, &mut sim.rng)
        };

        result.active_agents = result.active_agents.saturating_add(1);
        result.activities.record(report.activity);
        result.plant_grams += report.plant_grams;
        result.meat_grams += report.meat_grams;
        result.calories += report.calories;

        sim.activity
            .record(ctx.grid, report.position, agent.species(), report.activity);
        sim.daily_activity
            .record(ctx.grid, report.position, agent.species(), report.activity);
    }
    result
}

fn phase_dusk(sim: &mut Simulation, reading: &TimeReading) -> DaySnapshot {
    let policy = sim.config.foraging.starvation;
    let (mut active, mut starving, mut newly_starving) = (0_u32, 0_u32, 0_u32);
    let (mut plant_calories, mut meat_calories) = (0.0, 0.0);

    for agent in &mut sim.agents {
        let was_active = !agent.is_removed();
        let traits = sim.config.foraging.traits(agent.species());
        let outcome = agent.end_day(reading.day, traits, policy);

        if was_active {
            sim.season.record_agent_day(agent.species(), &outcome.calories);
            plant_calories += outcome.calories.plant;
            meat_calories += outcome.calories.meat;
        }
        if !outcome.removed {
            active = active.saturating_add(1);
        }
        if outcome.starving {
            starving = starving.saturating_add(1);
        }
        if outcome.newly_starving {
            newly_starving = newly_starving.saturating_add(1);
        }
    }
    sim.season.close_day();

    let snapshot = DaySnapshot {
        day: reading.day,
        year: reading.year,
        season: reading.season,
        active_agents: active,
        starving_agents: starving,
        newly_starving,
        plant_calories,
        meat_calories,
        carcasses_spawned: u32::try_from(sim.dawn_report.spawned.len()).unwrap_or(u32::MAX),
        carcasses_expired: u32::try_from(sim.dawn_report.expired.len()).unwrap_or(u32::MAX),
        live_carcasses: u32::try_from(sim.carcasses.len()).unwrap_or(u32::MAX),
        standing_plant_grams: sim.grid.standing_plant_grams(),
        activity: sim.daily_activity.active_cells(),
    };
    sim.daily_activity.reset();

    info!(
        day = reading.day,
        year = reading.year,
        season = ?reading.season,
        active,
        starving,
        newly_starving,
        plant_calories,
        meat_calories,
        live_carcasses = snapshot.live_carcasses,
        "Day complete"
    );
    snapshot
}

fn phase_season_end(sim: &mut Simulation, reading: &TimeReading) -> SeasonSummary {
    let summary = sim.season.summarize(
        reading.year,
        reading.season,
        &sim.agents,
        &sim.grid,
        &sim.carcasses,
    );
    sim.season = SeasonAccumulator::new(*sim.carcasses.totals());
    sim.seasons.push(summary.clone());

    info!(
        year = reading.year,
        season = ?reading.season,
        days = summary.days,
        carcasses_spawned = summary.carcasses_spawned,
        carcasses_consumed = summary.carcasses_consumed,
        standing_plant_grams = summary.standing_plant_grams,
        "Season complete"
    );
    summary
}
