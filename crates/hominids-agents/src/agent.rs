//! Forager state and the per-minute state machine.
//!
//! Each active minute an [`Agent`] either continues waiting at a carcass or
//! runs one pass of the decision procedure:
//!
//! 1. Scan the Moore neighbourhood for plant food (one detection trial per
//!    candidate) and look for carcasses in detection range or called within
//!    earshot.
//! 2. Choose the option with the highest return rate.
//! 3. Act: eat plants in the current cell, scavenge or wait at a carcass in
//!    the current cell, or take one step toward the chosen option. With
//!    nothing worth eating in view the agent wanders.
//!
//! At the last minute of the day the orchestrator calls [`Agent::nest`]
//! instead, and after the day closes [`Agent::end_day`] runs the starvation
//! check and resets the daily counters.
//!
//! Every mutation of shared food happens immediately, so agents stepped
//! later in the same tick see the depleted amounts.

use std::collections::{BTreeSet, VecDeque};

use hominids_types::{
    Activity, AgentId, AgentReport, CarcassId, DailyCalories, DiscoveryState, HominidSpecies,
    PlantSpeciesId, Position, Season,
};
use hominids_world::{CarcassLifecycle, Grid, PlantCatalog};
use rand::Rng;
use rand::seq::IndexedRandom;

use crate::capabilities::Capabilities;
use crate::communication::CommunicationChannel;
use crate::config::{ForagingConfig, SpeciesTraits, StarvationPolicy};
use crate::foraging::{self, FoodSource};
use crate::ledger::CalorieLedger;
use crate::occupancy::{Occupancy, Occupant};

/// The world state an agent reads and mutates during its turn.
///
/// Lent by the orchestrator for one agent at a time.
#[derive(Debug)]
pub struct StepContext<'a> {
    /// Cells and their standing plant food.
    pub grid: &'a mut Grid,
    /// Plant species parameters.
    pub catalog: &'a PlantCatalog,
    /// Live carcasses.
    pub carcasses: &'a mut CarcassLifecycle,
    /// This tick's carcass calls.
    pub channel: &'a mut CommunicationChannel,
    /// Who stands where.
    pub occupancy: &'a mut Occupancy,
    /// Decision parameters.
    pub config: &'a ForagingConfig,
    /// Current season.
    pub season: Season,
    /// Absolute day number.
    pub day: u64,
}

/// A cooperator's vigil at a carcass too big to eat alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitState {
    /// The carcass being guarded.
    pub carcass: CarcassId,
    /// Minutes left before giving up.
    pub minutes_left: u32,
    /// Whether this agent is alone at the carcass and keeps calling others.
    pub announcer: bool,
}

/// What an agent did with one minute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepReport {
    /// The activity performed.
    pub activity: Activity,
    /// The cell the activity is tallied against.
    pub position: Position,
    /// Grams of plant food eaten.
    pub plant_grams: f64,
    /// Grams of meat eaten.
    pub meat_grams: f64,
    /// Kilocalories gained.
    pub calories: f64,
}

impl StepReport {
    const fn idle(activity: Activity, position: Position) -> Self {
        Self {
            activity,
            position,
            plant_grams: 0.0,
            meat_grams: 0.0,
            calories: 0.0,
        }
    }
}

/// The result of closing an agent's day.
#[derive(Debug, Clone, PartialEq)]
pub struct DayOutcome {
    /// Calories eaten during the day.
    pub calories: DailyCalories,
    /// Starvation flag after the check.
    pub starving: bool,
    /// The flag was raised by this check.
    pub newly_starving: bool,
    /// The agent has been retired.
    pub removed: bool,
}

/// One hominid forager.
#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    id: AgentId,
    species: HominidSpecies,
    capabilities: Capabilities,
    position: Position,
    gut_grams: f64,
    belly_capacity: f64,
    history: VecDeque<f64>,
    wait: Option<WaitState>,
    ignored: BTreeSet<CarcassId>,
    visited: BTreeSet<Position>,
    wander_target: Option<Position>,
    nest_site: Option<Position>,
    activity: Activity,
    starving: bool,
    removed: bool,
    ledger: CalorieLedger,
}

impl Agent {
    /// Create an agent with an empty gut standing on `position`.
    pub fn new(
        id: AgentId,
        species: HominidSpecies,
        capabilities: Capabilities,
        position: Position,
        traits: &SpeciesTraits,
    ) -> Self {
        Self {
            id,
            species,
            capabilities,
            position,
            gut_grams: 0.0,
            belly_capacity: traits.belly_capacity_grams,
            history: VecDeque::with_capacity(traits.diet_track_length),
            wait: None,
            ignored: BTreeSet::new(),
            visited: BTreeSet::from([position]),
            wander_target: None,
            nest_site: None,
            activity: Activity::Scanning,
            starving: false,
            removed: false,
            ledger: CalorieLedger::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// Agent id; agents are stepped in ascending id order.
    pub const fn id(&self) -> AgentId {
        self.id
    }

    /// Hominid species.
    pub const fn species(&self) -> HominidSpecies {
        self.species
    }

    /// Behavioural switches.
    pub const fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Current cell.
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Grams in the gut, within `[0, belly_capacity]`.
    pub const fn gut_grams(&self) -> f64 {
        self.gut_grams
    }

    /// Current gut capacity in grams.
    pub const fn belly_capacity(&self) -> f64 {
        self.belly_capacity
    }

    /// Kilocalories eaten so far today.
    pub fn calories_today(&self) -> f64 {
        self.ledger.today()
    }

    /// Daily calorie totals of the last closed days, oldest first.
    pub const fn history(&self) -> &VecDeque<f64> {
        &self.history
    }

    /// The carcass vigil in progress, if any.
    pub const fn wait(&self) -> Option<WaitState> {
        self.wait
    }

    /// Carcasses given up on today.
    pub const fn ignored(&self) -> &BTreeSet<CarcassId> {
        &self.ignored
    }

    /// Where the agent slept last.
    pub const fn nest_site(&self) -> Option<Position> {
        self.nest_site
    }

    /// The last activity performed.
    pub const fn activity(&self) -> Activity {
        self.activity
    }

    /// Whether the starvation flag is set.
    pub const fn is_starving(&self) -> bool {
        self.starving
    }

    /// Whether the agent has been retired.
    pub const fn is_removed(&self) -> bool {
        self.removed
    }

    /// Calorie accounting.
    pub const fn ledger(&self) -> &CalorieLedger {
        &self.ledger
    }

    /// This agent's entry in the occupancy index.
    pub const fn occupant(&self) -> Occupant {
        Occupant {
            id: self.id,
            species: self.species,
            cooperates: self.capabilities.cooperates,
        }
    }

    /// The call this agent keeps making while it waits alone at a carcass.
    pub fn announcement(&self) -> Option<(CarcassId, Position)> {
        self.wait
            .filter(|w| w.announcer && !self.removed)
            .map(|w| (w.carcass, self.position))
    }

    /// Grams of free gut space.
    pub fn belly_room(&self) -> f64 {
        (self.belly_capacity - self.gut_grams).max(0.0)
    }

    /// Teleport the agent, keeping `occupancy` in sync.
    pub fn place(&mut self, position: Position, occupancy: &mut Occupancy) {
        occupancy.relocate(self.occupant(), self.position, position);
        self.position = position;
        self.visited.insert(position);
        self.wander_target = None;
    }

    // -----------------------------------------------------------------------
    // Per-minute decision procedure
    // -----------------------------------------------------------------------

    /// Spend one active minute.
    pub fn step<R: Rng + ?Sized>(&mut self, ctx: &mut StepContext<'_>, rng: &mut R) -> StepReport {
        let report = self.decide(ctx, rng);
        self.activity = report.activity;
        report
    }

    fn decide<R: Rng + ?Sized>(&mut self, ctx: &mut StepContext<'_>, rng: &mut R) -> StepReport {
        if self.removed {
            return StepReport::idle(Activity::Scanning, self.position);
        }
        if let Some(report) = self.continue_waiting(ctx) {
            return report;
        }
        if self.belly_room() <= 0.0 {
            return StepReport::idle(Activity::Scanning, self.position);
        }

        let mut options = foraging::scan_plants(
            ctx.grid,
            ctx.catalog,
            self.position,
            self.species,
            self.capabilities.can_dig,
            ctx.season,
            rng,
        );
        options.extend(foraging::scan_carcasses(
            ctx.carcasses,
            ctx.channel,
            ctx.grid,
            self.position,
            self.id,
            self.capabilities,
            ctx.config,
            &self.ignored,
        ));

        let Some(best) = foraging::choose(&options).copied() else {
            return self.wander(ctx, rng);
        };
        tracing::trace!(
            agent = %self.id,
            source = ?best.source,
            rate = best.return_rate,
            x = best.position.x,
            y = best.position.y,
            "food chosen"
        );
        self.wander_target = None;

        if best.position != self.position {
            let next = ctx.grid.step_toward(self.position, best.position);
            return self.move_to(ctx, next);
        }
        match best.source {
            FoodSource::Plant(id) => self.eat_plant(ctx, id),
            FoodSource::Carcass(id) => self.at_carcass(ctx, id),
        }
    }

    fn eat_plant(&mut self, ctx: &mut StepContext<'_>, id: PlantSpeciesId) -> StepReport {
        let Some(plant) = ctx.catalog.get(id) else {
            return StepReport::idle(Activity::Scanning, self.position);
        };
        let wanted = plant.grams_per_feeding_unit.min(self.belly_room());
        let grams = ctx.grid.consume_plant(self.position, id, wanted);
        if grams <= 0.0 {
            return StepReport::idle(Activity::Scanning, self.position);
        }
        let calories = grams * plant.calories_per_gram;
        self.gut_grams = (self.gut_grams + grams).min(self.belly_capacity);
        self.ledger
            .record_plant(ctx.season, calories, grams, plant.is_root());
        StepReport {
            activity: Activity::Eating,
            position: self.position,
            plant_grams: grams,
            meat_grams: 0.0,
            calories,
        }
    }

    /// Standing on a chosen carcass: eat it, or wait for help.
    fn at_carcass(&mut self, ctx: &mut StepContext<'_>, id: CarcassId) -> StepReport {
        let Some(carcass) = ctx.carcasses.get(id) else {
            return StepReport::idle(Activity::Scanning, self.position);
        };
        if !carcass.requires_cooperation() {
            let ration = ctx.config.meat_ration(false, 1);
            return self.scavenge(ctx, id, ration);
        }
        if !self.capabilities.cooperates {
            self.ignore(ctx, id);
            return StepReport::idle(Activity::Scanning, self.position);
        }

        let present = ctx.occupancy.cooperators_at(self.position, self.species);
        if present >= ctx.config.agents_per_carcass {
            let ration = ctx.config.meat_ration(true, present);
            return self.scavenge(ctx, id, ration);
        }

        if carcass.state() == DiscoveryState::Undiscovered {
            ctx.carcasses.mark_discovered(id);
        }
        let announcer = present <= 1;
        if announcer {
            ctx.channel.publish(id, self.position);
        }
        self.wait = Some(WaitState {
            carcass: id,
            minutes_left: ctx.config.wait_minutes,
            announcer,
        });
        tracing::debug!(
            agent = %self.id,
            carcass = %id,
            present,
            needed = ctx.config.agents_per_carcass,
            announcer,
            "waiting for cooperators"
        );
        StepReport::idle(Activity::Waiting, self.position)
    }

    /// Advance a vigil. Returns `None` when there is no vigil (or it ended
    /// because the carcass is gone) and the agent should forage instead.
    fn continue_waiting(&mut self, ctx: &mut StepContext<'_>) -> Option<StepReport> {
        let wait = self.wait?;
        let still_here = ctx
            .carcasses
            .get(wait.carcass)
            .is_some_and(|c| c.position() == self.position);
        if !still_here {
            self.wait = None;
            return None;
        }

        let present = ctx.occupancy.cooperators_at(self.position, self.species);
        if present >= ctx.config.agents_per_carcass {
            self.wait = None;
            let ration = ctx.config.meat_ration(true, present);
            return Some(self.scavenge(ctx, wait.carcass, ration));
        }

        let minutes_left = wait.minutes_left.saturating_sub(1);
        if minutes_left == 0 {
            self.wait = None;
            self.ignore(ctx, wait.carcass);
            tracing::debug!(agent = %self.id, carcass = %wait.carcass, present, "gave up waiting");
            return Some(StepReport::idle(Activity::Scanning, self.position));
        }
        // Whoever is alone at the carcass keeps calling.
        let announcer = present <= 1;
        if announcer {
            ctx.channel.publish(wait.carcass, self.position);
        }
        self.wait = Some(WaitState {
            carcass: wait.carcass,
            minutes_left,
            announcer,
        });
        Some(StepReport::idle(Activity::Waiting, self.position))
    }

    fn scavenge(&mut self, ctx: &mut StepContext<'_>, id: CarcassId, ration: f64) -> StepReport {
        let wanted = ration.min(self.belly_room());
        let grams = ctx.carcasses.consume(ctx.grid, id, wanted);
        if grams <= 0.0 {
            return StepReport::idle(Activity::Scanning, self.position);
        }
        let calories = grams * ctx.config.meat_calories_per_gram;
        self.gut_grams = (self.gut_grams + grams).min(self.belly_capacity);
        self.ledger.record_meat(ctx.season, calories, grams);
        StepReport {
            activity: Activity::Scavenging,
            position: self.position,
            plant_grams: 0.0,
            meat_grams: grams,
            calories,
        }
    }

    fn ignore(&mut self, ctx: &mut StepContext<'_>, id: CarcassId) {
        self.ignored.insert(id);
        ctx.carcasses.mark_ignored(id, self.id);
    }

    // -----------------------------------------------------------------------
    // Movement
    // -----------------------------------------------------------------------

    fn move_to(&mut self, ctx: &mut StepContext<'_>, next: Position) -> StepReport {
        ctx.occupancy.relocate(self.occupant(), self.position, next);
        self.position = next;
        self.visited.insert(next);
        StepReport::idle(Activity::Moving, next)
    }

    /// Head for a cell on the wander ring, picking a fresh one when the
    /// current target is reached.
    fn wander<R: Rng + ?Sized>(&mut self, ctx: &mut StepContext<'_>, rng: &mut R) -> StepReport {
        if self.wander_target.is_none_or(|t| t == self.position) {
            self.wander_target =
                self.pick_wander_target(ctx.grid, ctx.config.wandering_distance, rng);
        }
        match self.wander_target {
            Some(target) if target != self.position => {
                let next = ctx.grid.step_toward(self.position, target);
                self.move_to(ctx, next)
            }
            _ => StepReport::idle(Activity::Scanning, self.position),
        }
    }

    /// A random cell at Chebyshev distance `distance`, preferring cells not
    /// visited today.
    fn pick_wander_target<R: Rng + ?Sized>(
        &self,
        grid: &Grid,
        distance: u32,
        rng: &mut R,
    ) -> Option<Position> {
        let reach = i32::try_from(distance).unwrap_or(i32::MAX);
        let mut ring: BTreeSet<Position> = BTreeSet::new();
        for dy in -reach..=reach {
            for dx in -reach..=reach {
                if dx.abs().max(dy.abs()) != reach {
                    continue;
                }
                let p = grid.normalize(
                    self.position.x.saturating_add(dx),
                    self.position.y.saturating_add(dy),
                );
                if p != self.position {
                    ring.insert(p);
                }
            }
        }
        let fresh: Vec<Position> = ring.difference(&self.visited).copied().collect();
        if fresh.is_empty() {
            let ring: Vec<Position> = ring.into_iter().collect();
            ring.choose(rng).copied()
        } else {
            fresh.choose(rng).copied()
        }
    }

    // -----------------------------------------------------------------------
    // End of day
    // -----------------------------------------------------------------------

    /// Settle for the night at the last minute of the day.
    ///
    /// Group nesters join the nearest cell within nest scan distance that
    /// holds at least `ceil(others x group_nesting_threshold)` (minimum one)
    /// other agents of their species. Anyone without such a group heads for
    /// the nearest cell with a nesting tree, or sleeps where they stand.
    pub fn nest(&mut self, ctx: &mut StepContext<'_>) -> StepReport {
        if self.removed {
            return StepReport::idle(Activity::Scanning, self.position);
        }
        self.wait = None;
        let traits = ctx.config.traits(self.species);
        let radius = ctx.config.nest_scan_distance;
        let group = if self.capabilities.nests_in_group {
            self.group_nest_site(ctx.grid, ctx.occupancy, radius, traits.group_nesting_threshold)
        } else {
            None
        };
        let site = group
            .or_else(|| self.tree_nest_site(ctx.grid, ctx.catalog, radius))
            .unwrap_or(self.position);

        ctx.occupancy.relocate(self.occupant(), self.position, site);
        self.position = site;
        self.nest_site = Some(site);
        self.activity = Activity::Nesting;
        tracing::debug!(
            agent = %self.id,
            x = site.x,
            y = site.y,
            grouped = group.is_some(),
            "nested"
        );
        StepReport::idle(Activity::Nesting, site)
    }

    fn group_nest_site(
        &self,
        grid: &Grid,
        occupancy: &Occupancy,
        radius: u32,
        threshold: f64,
    ) -> Option<Position> {
        let others: u32 = occupancy
            .occupied()
            .map(|(p, _)| occupancy.species_at(p, self.species, Some(self.id)))
            .sum();
        if others == 0 {
            return None;
        }
        let needed = (f64::from(others) * threshold).ceil().max(1.0);
        grid.positions_within(self.position, radius)
            .into_iter()
            .find(|p| f64::from(occupancy.species_at(*p, self.species, Some(self.id))) >= needed)
    }

    fn tree_nest_site(&self, grid: &Grid, catalog: &PlantCatalog, radius: u32) -> Option<Position> {
        grid.positions_within(self.position, radius)
            .into_iter()
            .find(|p| {
                grid.cell(*p).is_some_and(|cell| {
                    cell.food()
                        .entries()
                        .any(|(id, entry)| entry.capacity > 0.0 && catalog.is_nesting_tree(id))
                })
            })
    }

    /// Close absolute day `day`: record the day's calories, run the
    /// starvation check, apply `policy`, and reset the daily state.
    ///
    /// The agent is starving once its history window is full and the share
    /// of days below `diet_threshold` of the requirement reaches
    /// `starvation_proportion`.
    pub fn end_day(
        &mut self,
        day: u64,
        traits: &SpeciesTraits,
        policy: StarvationPolicy,
    ) -> DayOutcome {
        // Retired agents no longer live through days.
        if self.removed {
            return DayOutcome {
                calories: DailyCalories {
                    day,
                    plant: 0.0,
                    meat: 0.0,
                },
                starving: self.starving,
                newly_starving: false,
                removed: true,
            };
        }
        let calories = self.ledger.close_day(day);
        let was_starving = self.starving;

        self.history.push_back(calories.total());
        while self.history.len() > traits.diet_track_length {
            self.history.pop_front();
        }
        self.starving = self.history.len() >= traits.diet_track_length
            && short_day_share(&self.history, traits.short_day_calories())
                >= traits.starvation_proportion;

        match policy {
            StarvationPolicy::Record => {}
            StarvationPolicy::CapBelly { fraction } => {
                let scale = if self.starving { fraction } else { 1.0 };
                self.belly_capacity = traits.belly_capacity_grams * scale;
            }
            StarvationPolicy::Remove => self.removed = self.starving,
        }

        let newly_starving = self.starving && !was_starving;
        if newly_starving {
            tracing::info!(
                agent = %self.id,
                species = %self.species,
                day,
                removed = self.removed,
                "agent starving"
            );
        }

        self.gut_grams = 0.0;
        self.ignored.clear();
        self.wait = None;
        self.visited.clear();
        self.visited.insert(self.position);
        self.wander_target = None;
        self.activity = Activity::Scanning;

        DayOutcome {
            calories,
            starving: self.starving,
            newly_starving,
            removed: self.removed,
        }
    }

    /// Read-only summary for run reports.
    pub fn report(&self) -> AgentReport {
        AgentReport {
            id: self.id,
            species: self.species,
            can_dig: self.capabilities.can_dig,
            can_eat_meat: self.capabilities.can_eat_meat,
            cooperates: self.capabilities.cooperates,
            nests_in_group: self.capabilities.nests_in_group,
            position: self.position,
            starving: self.starving,
            removed: self.removed,
            mean_daily_calories: self.ledger.mean_daily_calories(),
            season_calories: self.ledger.seasons().to_vec(),
            daily_calories: self.ledger.daily().to_vec(),
        }
    }
}

/// Fraction of `history` below `limit`.
fn short_day_share(history: &VecDeque<f64>, limit: f64) -> f64 {
    if history.is_empty() {
        return 0.0;
    }
    let short = history.iter().filter(|c| **c < limit).count();
    let short = u32::try_from(short).unwrap_or(u32::MAX);
    let total = u32::try_from(history.len()).unwrap_or(u32::MAX);
    f64::from(short) / f64::from(total)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use hominids_types::{CarcassSize, Zone};
    use hominids_world::{CarcassConfig, Landscape, PlantSpecies};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    const FIG: PlantSpeciesId = PlantSpeciesId(1);
    const ACACIA: PlantSpeciesId = PlantSpeciesId(2);

    struct World {
        grid: Grid,
        catalog: PlantCatalog,
        carcasses: CarcassLifecycle,
        channel: CommunicationChannel,
        occupancy: Occupancy,
        config: ForagingConfig,
    }

    impl World {
        fn new(fig_visibility: f64) -> Self {
            let landscape = Landscape::uniform("test", 20, 20, Zone::Flooded).unwrap();
            let mut fig = PlantSpecies::new(FIG, "fig").with_uniform_density(1.0);
            fig.visibility_probability = fig_visibility;
            let mut acacia = PlantSpecies::new(ACACIA, "acacia");
            acacia.nesting_tree = true;
            acacia.edible_by_boisei = false;
            acacia.edible_by_ergaster = false;
            let catalog = PlantCatalog::new("test", vec![fig, acacia], 0.0).unwrap();
            let grid = Grid::new(&landscape, &catalog, 0.0).unwrap();
            Self {
                grid,
                catalog,
                carcasses: CarcassLifecycle::new(CarcassConfig::default()).unwrap(),
                channel: CommunicationChannel::new(),
                occupancy: Occupancy::new(),
                config: ForagingConfig::default(),
            }
        }

        fn ctx(&mut self) -> StepContext<'_> {
            StepContext {
                grid: &mut self.grid,
                catalog: &self.catalog,
                carcasses: &mut self.carcasses,
                channel: &mut self.channel,
                occupancy: &mut self.occupancy,
                config: &self.config,
                season: Season::First,
                day: 0,
            }
        }

        fn seat(&mut self, agents: &[&Agent]) {
            self.occupancy
                .rebuild(agents.iter().map(|a| (a.position(), a.occupant())));
        }
    }

    fn agent(id: u32, caps: &str, at: Position) -> Agent {
        Agent::new(
            AgentId(id),
            HominidSpecies::Boisei,
            Capabilities::parse(caps).unwrap(),
            at,
            &SpeciesTraits::boisei(),
        )
    }

    #[test]
    fn eats_visible_food_in_own_cell() {
        let mut world = World::new(1.0);
        let here = Position::new(5, 5);
        world.grid.cell_mut(here).unwrap().food_mut().set_amount(FIG, 900.0);
        let mut a = agent(0, "i", here);
        world.seat(&[&a]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let report = a.step(&mut world.ctx(), &mut rng);
        assert_eq!(report.activity, Activity::Eating);
        assert!((report.plant_grams - 100.0).abs() < 1e-9);
        assert!((a.gut_grams() - 100.0).abs() < 1e-9);
        assert!((a.calories_today() - 200.0).abs() < 1e-9);
        assert!((world.grid.cell(here).unwrap().food().amount(FIG) - 800.0).abs() < 1e-9);
    }

    #[test]
    fn steps_toward_food_in_neighbour_cell() {
        let mut world = World::new(1.0);
        let food = Position::new(6, 6);
        world.grid.cell_mut(food).unwrap().food_mut().set_amount(FIG, 500.0);
        let mut a = agent(0, "i", Position::new(5, 5));
        world.seat(&[&a]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let report = a.step(&mut world.ctx(), &mut rng);
        assert_eq!(report.activity, Activity::Moving);
        assert_eq!(a.position(), food);
        assert_eq!(world.occupancy.at(food).len(), 1);
    }

    #[test]
    fn gut_never_exceeds_capacity() {
        let mut world = World::new(1.0);
        let here = Position::new(2, 2);
        world.grid.cell_mut(here).unwrap().food_mut().set_amount(FIG, 1000.0);
        let mut a = agent(0, "i", here);
        a.belly_capacity = 250.0;
        world.seat(&[&a]);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        for _ in 0..5 {
            a.step(&mut world.ctx(), &mut rng);
            assert!(a.gut_grams() <= a.belly_capacity());
        }
        assert!((a.gut_grams() - 250.0).abs() < 1e-9);
    }

    #[test]
    fn wanders_when_nothing_is_visible() {
        let mut world = World::new(0.0);
        let start = Position::new(10, 10);
        let mut a = agent(0, "i", start);
        world.seat(&[&a]);
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let report = a.step(&mut world.ctx(), &mut rng);
        assert_eq!(report.activity, Activity::Moving);
        assert!(world.grid.manhattan_distance(start, a.position()) <= 2);
        assert_ne!(a.position(), start);
    }

    #[test]
    fn wander_target_prefers_unvisited_ring_cells() {
        let world = World::new(0.0);
        let start = Position::new(10, 10);
        let mut a = agent(0, "i", start);
        let open = Position::new(12, 9);
        for dy in -2..=2_i32 {
            for dx in -2..=2_i32 {
                let p = Position::new(start.x.saturating_add(dx), start.y.saturating_add(dy));
                if p != open {
                    a.visited.insert(p);
                }
            }
        }
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..5 {
            assert_eq!(a.pick_wander_target(&world.grid, 2, &mut rng), Some(open));
        }

        a.visited.insert(open);
        let fallback = a.pick_wander_target(&world.grid, 2, &mut rng).unwrap();
        let (dx, dy) = world.grid.wrapped_delta(start, fallback);
        assert_eq!(dx.abs().max(dy.abs()), 2);
    }

    #[test]
    fn lone_cooperator_waits_then_ignores() {
        let mut world = World::new(0.0);
        let here = Position::new(3, 3);
        let id = world
            .carcasses
            .spawn_at(&mut world.grid, here, CarcassSize::Large, 0)
            .unwrap();
        let mut a = agent(0, "gmc", here);
        world.seat(&[&a]);
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        let first = a.step(&mut world.ctx(), &mut rng);
        assert_eq!(first.activity, Activity::Waiting);
        assert_eq!(a.announcement(), Some((id, here)));
        assert_eq!(world.channel.len(), 1);
        assert_eq!(
            world.carcasses.get(id).unwrap().state(),
            DiscoveryState::Discovered
        );

        for _ in 0..10 {
            a.step(&mut world.ctx(), &mut rng);
        }
        assert!(a.wait().is_none());
        assert!(a.ignored().contains(&id));
        assert!(world.carcasses.get(id).unwrap().is_ignored_by(AgentId(0)));
        assert!((world.carcasses.get(id).unwrap().remaining_grams() - 100_000.0).abs() < 1e-9);
    }

    #[test]
    fn lone_cooperator_calls_for_known_carcass() {
        let mut world = World::new(0.0);
        let here = Position::new(3, 3);
        let id = world
            .carcasses
            .spawn_at(&mut world.grid, here, CarcassSize::Large, 0)
            .unwrap();
        world.carcasses.mark_discovered(id);
        let mut a = agent(0, "gmc", here);
        world.seat(&[&a]);
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        let report = a.step(&mut world.ctx(), &mut rng);
        assert_eq!(report.activity, Activity::Waiting);
        assert_eq!(a.announcement(), Some((id, here)));
        assert_eq!(world.channel.len(), 1);
    }

    #[test]
    fn waiter_left_alone_takes_over_the_call() {
        let mut world = World::new(0.0);
        let here = Position::new(3, 3);
        let id = world
            .carcasses
            .spawn_at(&mut world.grid, here, CarcassSize::Large, 0)
            .unwrap();
        let mut first = agent(0, "gmc", here);
        let mut second = agent(1, "gmc", here);
        world.seat(&[&first, &second]);
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        first.step(&mut world.ctx(), &mut rng);
        second.step(&mut world.ctx(), &mut rng);
        assert_eq!(first.announcement(), None);
        assert_eq!(second.announcement(), None);
        assert!(world.channel.is_empty());

        // The companion wanders off; the one left behind starts calling.
        world.seat(&[&second]);
        second.step(&mut world.ctx(), &mut rng);
        assert_eq!(second.announcement(), Some((id, here)));
        assert_eq!(world.channel.len(), 1);
    }

    #[test]
    fn quorum_of_cooperators_scavenges() {
        let mut world = World::new(0.0);
        let here = Position::new(3, 3);
        let id = world
            .carcasses
            .spawn_at(&mut world.grid, here, CarcassSize::Medium, 0)
            .unwrap();
        let mut crew = [agent(0, "gmc", here), agent(1, "gmc", here), agent(2, "gmc", here)];
        world.seat(&crew.iter().collect::<Vec<_>>());
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        for a in &mut crew {
            let report = a.step(&mut world.ctx(), &mut rng);
            assert_eq!(report.activity, Activity::Scavenging);
            assert!((report.meat_grams - 50.0 / 3.0).abs() < 1e-9);
        }
        let left = world.carcasses.get(id).unwrap().remaining_grams();
        assert!((left - 9_950.0).abs() < 1e-9);
    }

    #[test]
    fn non_cooperator_eats_small_carcass_alone() {
        let mut world = World::new(0.0);
        let here = Position::new(7, 7);
        world
            .carcasses
            .spawn_at(&mut world.grid, here, CarcassSize::Small, 0)
            .unwrap();
        let mut a = agent(0, "im", here);
        world.seat(&[&a]);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let report = a.step(&mut world.ctx(), &mut rng);
        assert_eq!(report.activity, Activity::Scavenging);
        assert!((report.calories - 50.0 * 1.57).abs() < 1e-9);
        assert!((a.ledger().meat_grams() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn individual_nester_finds_tree() {
        let mut world = World::new(0.0);
        let mut acacia = PlantSpecies::new(ACACIA, "acacia");
        acacia.nesting_tree = true;
        acacia.plants_per_flooded = 1.0;
        let catalog = PlantCatalog::new("test", vec![acacia], 0.0).unwrap();
        let landscape = Landscape::from_rows("test", &["UUUUU", "UUUUU", "UUUUF", "UUUUU"]).unwrap();
        world.grid = Grid::new(&landscape, &catalog, 0.0).unwrap();
        world.catalog = catalog;
        let mut a = agent(0, "i", Position::new(1, 2));
        world.seat(&[&a]);

        let report = a.nest(&mut world.ctx());
        assert_eq!(report.activity, Activity::Nesting);
        assert_eq!(a.nest_site(), Some(Position::new(4, 2)));
    }

    #[test]
    fn group_nester_joins_conspecifics() {
        let mut world = World::new(0.0);
        let camp = Position::new(8, 8);
        let others = [agent(1, "g", camp), agent(2, "g", camp)];
        let mut a = agent(0, "g", Position::new(5, 8));
        let mut seated: Vec<&Agent> = others.iter().collect();
        seated.push(&a);
        world.seat(&seated);

        a.nest(&mut world.ctx());
        assert_eq!(a.position(), camp);
        assert_eq!(world.occupancy.species_at(camp, HominidSpecies::Boisei, None), 3);
    }

    #[test]
    fn starvation_needs_a_full_window() {
        let traits = SpeciesTraits {
            diet_track_length: 3,
            ..SpeciesTraits::boisei()
        };
        let mut a = agent(0, "i", Position::new(0, 0));
        assert!(!a.end_day(0, &traits, StarvationPolicy::Record).starving);
        assert!(!a.end_day(1, &traits, StarvationPolicy::Record).starving);
        let third = a.end_day(2, &traits, StarvationPolicy::Record);
        assert!(third.starving);
        assert!(third.newly_starving);
        assert!(!a.end_day(3, &traits, StarvationPolicy::Record).newly_starving);
        assert_eq!(a.history().len(), 3);
    }

    #[test]
    fn starvation_policies_apply() {
        let traits = SpeciesTraits {
            diet_track_length: 1,
            ..SpeciesTraits::boisei()
        };
        let mut capped = agent(0, "i", Position::new(0, 0));
        capped.end_day(0, &traits, StarvationPolicy::CapBelly { fraction: 0.5 });
        assert!((capped.belly_capacity() - 2250.0).abs() < 1e-9);

        let mut retired = agent(1, "i", Position::new(0, 0));
        let outcome = retired.end_day(0, &traits, StarvationPolicy::Remove);
        assert!(outcome.removed);
        assert!(retired.is_removed());
        assert_eq!(retired.announcement(), None);
    }

    #[test]
    fn retired_agent_records_no_further_days() {
        let traits = SpeciesTraits {
            diet_track_length: 1,
            ..SpeciesTraits::boisei()
        };
        let mut a = agent(0, "i", Position::new(0, 0));
        assert!(a.end_day(0, &traits, StarvationPolicy::Remove).removed);
        assert_eq!(a.report().daily_calories.len(), 1);

        for day in 1..4 {
            let outcome = a.end_day(day, &traits, StarvationPolicy::Remove);
            assert!(outcome.removed);
            assert!(!outcome.newly_starving);
        }
        let report = a.report();
        assert_eq!(report.daily_calories.len(), 1);
        assert_eq!(a.history().len(), 1);
    }

    #[test]
    fn end_day_resets_daily_state() {
        let mut world = World::new(1.0);
        let here = Position::new(5, 5);
        world.grid.cell_mut(here).unwrap().food_mut().set_amount(FIG, 900.0);
        let mut a = agent(0, "i", here);
        world.seat(&[&a]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        a.step(&mut world.ctx(), &mut rng);

        let outcome = a.end_day(0, &SpeciesTraits::boisei(), StarvationPolicy::Record);
        assert!((outcome.calories.plant - 200.0).abs() < 1e-9);
        assert!(a.gut_grams().abs() < f64::EPSILON);
        assert!(a.calories_today().abs() < f64::EPSILON);
        assert_eq!(a.report().daily_calories.len(), 1);
    }
}
