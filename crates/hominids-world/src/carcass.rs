//! Carcass records and their daily lifecycle.
//!
//! The [`CarcassLifecycle`] owns every live [`Carcass`] in a registry keyed
//! by id; the grid only indexes the id at the carcass's cell. Once per day
//! the lifecycle clears per-agent ignore marks, expires stale carcasses
//! according to the [`ExpiryPolicy`], and rolls a Bernoulli appearance trial
//! for every empty cell in row-major order. During the day, scavengers feed
//! through [`CarcassLifecycle::consume`], which removes a carcass the moment
//! it is exhausted.

use std::collections::{BTreeMap, BTreeSet};

use hominids_types::{AgentId, CarcassId, CarcassSize, DiscoveryState, Position, Zone};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::WorldError;
use crate::grid::Grid;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Appearance odds for one topography zone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneCarcassOdds {
    /// Daily probability that a carcass appears in a cell of this zone.
    pub appearance_probability: f64,
    /// Probability that a new carcass is small.
    pub small_probability: f64,
    /// Probability that a new carcass is medium; large takes the remainder.
    pub medium_probability: f64,
}

impl ZoneCarcassOdds {
    /// Draw a size class from the zone's distribution.
    pub fn draw_size<R: Rng + ?Sized>(&self, rng: &mut R) -> CarcassSize {
        let roll: f64 = rng.random();
        if roll < self.small_probability {
            CarcassSize::Small
        } else if roll < self.small_probability + self.medium_probability {
            CarcassSize::Medium
        } else {
            CarcassSize::Large
        }
    }
}

/// When an unconsumed carcass disappears.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryPolicy {
    /// Carcasses stay until eaten.
    Persist,
    /// Carcasses left over from a previous day vanish at the next day start.
    DayRollover,
    /// Carcasses vanish once they are this many days old.
    AfterDays(u32),
}

impl Default for ExpiryPolicy {
    fn default() -> Self {
        Self::AfterDays(3)
    }
}

/// Carcass appearance, size, and expiry parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarcassConfig {
    /// Odds for channel cells.
    pub channel: ZoneCarcassOdds,
    /// Odds for flooded cells.
    pub flooded: ZoneCarcassOdds,
    /// Odds for unflooded cells.
    pub unflooded: ZoneCarcassOdds,
    /// Mean weight of a small carcass in grams.
    pub small_weight_grams: f64,
    /// Mean weight of a medium carcass in grams.
    pub medium_weight_grams: f64,
    /// Mean weight of a large carcass in grams.
    pub large_weight_grams: f64,
    /// Uniform spread around the mean weight, as a fraction in `[0, 1)`.
    pub weight_variance: f64,
    /// Expiry rule for unconsumed carcasses.
    pub expiry: ExpiryPolicy,
}

impl Default for CarcassConfig {
    fn default() -> Self {
        Self {
            channel: ZoneCarcassOdds {
                appearance_probability: 0.000_456_621,
                small_probability: 0.333,
                medium_probability: 0.267,
            },
            flooded: ZoneCarcassOdds {
                appearance_probability: 0.000_194_825,
                small_probability: 0.125,
                medium_probability: 0.625,
            },
            unflooded: ZoneCarcassOdds {
                appearance_probability: 0.000_273_972_6,
                small_probability: 0.091,
                medium_probability: 0.818,
            },
            small_weight_grams: 1_000.0,
            medium_weight_grams: 10_000.0,
            large_weight_grams: 100_000.0,
            weight_variance: 0.0,
            expiry: ExpiryPolicy::default(),
        }
    }
}

impl CarcassConfig {
    /// Appearance odds for `zone`.
    pub const fn odds(&self, zone: Zone) -> &ZoneCarcassOdds {
        match zone {
            Zone::Channel => &self.channel,
            Zone::Flooded => &self.flooded,
            Zone::Unflooded => &self.unflooded,
        }
    }

    /// Mean weight of `size` in grams.
    pub const fn mean_weight(&self, size: CarcassSize) -> f64 {
        match size {
            CarcassSize::Small => self.small_weight_grams,
            CarcassSize::Medium => self.medium_weight_grams,
            CarcassSize::Large => self.large_weight_grams,
        }
    }

    /// Check probabilities and weights.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidCarcassConfig`] naming the first bad field.
    pub fn validate(&self) -> Result<(), WorldError> {
        let invalid = |reason: String| Err(WorldError::InvalidCarcassConfig { reason });
        for zone in Zone::ALL {
            let odds = self.odds(zone);
            for (field, p) in [
                ("appearance_probability", odds.appearance_probability),
                ("small_probability", odds.small_probability),
                ("medium_probability", odds.medium_probability),
            ] {
                if !(0.0..=1.0).contains(&p) {
                    return invalid(format!("{zone:?}.{field} must be within [0, 1], got {p}"));
                }
            }
            if odds.small_probability + odds.medium_probability > 1.0 + 1e-9 {
                return invalid(format!("{zone:?} small + medium probability exceeds 1"));
            }
        }
        for (field, grams) in [
            ("small_weight_grams", self.small_weight_grams),
            ("medium_weight_grams", self.medium_weight_grams),
            ("large_weight_grams", self.large_weight_grams),
        ] {
            if !grams.is_finite() || grams <= 0.0 {
                return invalid(format!("{field} must be positive, got {grams}"));
            }
        }
        if !(0.0..1.0).contains(&self.weight_variance) {
            return invalid(format!(
                "weight_variance must be within [0, 1), got {}",
                self.weight_variance
            ));
        }
        Ok(())
    }

    fn draw_weight<R: Rng + ?Sized>(&self, size: CarcassSize, rng: &mut R) -> f64 {
        let mean = self.mean_weight(size);
        if self.weight_variance <= 0.0 {
            return mean;
        }
        let spread = mean * self.weight_variance;
        rng.random_range((mean - spread)..=(mean + spread))
    }
}

// ---------------------------------------------------------------------------
// Carcass
// ---------------------------------------------------------------------------

/// A dead animal lying on one cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Carcass {
    id: CarcassId,
    size: CarcassSize,
    position: Position,
    initial_grams: f64,
    remaining_grams: f64,
    state: DiscoveryState,
    spawned_day: u64,
    ignored_by: BTreeSet<AgentId>,
}

impl Carcass {
    /// Registry id.
    pub const fn id(&self) -> CarcassId {
        self.id
    }

    /// Size class.
    pub const fn size(&self) -> CarcassSize {
        self.size
    }

    /// Cell the carcass lies on.
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Weight at spawn.
    pub const fn initial_grams(&self) -> f64 {
        self.initial_grams
    }

    /// Meat left; never increases.
    pub const fn remaining_grams(&self) -> f64 {
        self.remaining_grams
    }

    /// Discovery state.
    pub const fn state(&self) -> DiscoveryState {
        self.state
    }

    /// Absolute day the carcass appeared.
    pub const fn spawned_day(&self) -> u64 {
        self.spawned_day
    }

    /// Whether `agent` gave up on this carcass today.
    pub fn is_ignored_by(&self, agent: AgentId) -> bool {
        self.ignored_by.contains(&agent)
    }

    /// Agents that gave up on this carcass today.
    pub const fn ignored_by(&self) -> &BTreeSet<AgentId> {
        &self.ignored_by
    }

    /// Whether eating it takes a group of cooperators.
    pub const fn requires_cooperation(&self) -> bool {
        self.size.requires_cooperation()
    }
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// What one daily update did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CarcassDayReport {
    /// Carcasses that appeared, in row-major order.
    pub spawned: Vec<CarcassId>,
    /// Carcasses removed by the expiry policy.
    pub expired: Vec<CarcassId>,
}

/// Lifetime counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CarcassTotals {
    /// Carcasses that appeared.
    pub spawned: u64,
    /// Carcasses eaten down to nothing.
    pub consumed: u64,
    /// Carcasses removed by the expiry policy.
    pub expired: u64,
    /// Grams of meat removed by scavengers.
    pub meat_removed_grams: f64,
    /// Grams of meat that vanished with expired carcasses.
    pub meat_expired_grams: f64,
}

/// Registry of live carcasses plus the rules that create and expire them.
#[derive(Debug, Clone)]
pub struct CarcassLifecycle {
    config: CarcassConfig,
    carcasses: BTreeMap<CarcassId, Carcass>,
    next_id: u64,
    totals: CarcassTotals,
}

impl CarcassLifecycle {
    /// Create an empty registry.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidCarcassConfig`] if `config` is out of range.
    pub fn new(config: CarcassConfig) -> Result<Self, WorldError> {
        config.validate()?;
        Ok(Self {
            config,
            carcasses: BTreeMap::new(),
            next_id: 0,
            totals: CarcassTotals::default(),
        })
    }

    /// The active configuration.
    pub const fn config(&self) -> &CarcassConfig {
        &self.config
    }

    /// Run the day-start update for absolute day `day`.
    ///
    /// Order: clear ignore marks, expire, then spawn.
    pub fn daily_update<R: Rng + ?Sized>(
        &mut self,
        grid: &mut Grid,
        day: u64,
        rng: &mut R,
    ) -> CarcassDayReport {
        self.reset_daily_ignores();
        let expired = self.expire(grid, day);

        let mut spawned = Vec::new();
        for cell in grid.cells_mut() {
            let odds = *self.config.odds(cell.zone());
            let roll: f64 = rng.random();
            if roll >= odds.appearance_probability || cell.carcass().is_some() {
                continue;
            }
            let size = odds.draw_size(rng);
            let grams = self.config.draw_weight(size, rng);
            let id = self.insert(cell.position(), size, grams, day);
            cell.set_carcass(Some(id));
            tracing::debug!(
                carcass = %id,
                ?size,
                grams,
                x = cell.position().x,
                y = cell.position().y,
                "carcass appeared"
            );
            spawned.push(id);
        }

        CarcassDayReport { spawned, expired }
    }

    /// Place a carcass of `size` at its mean weight on `position`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::OutOfBounds`] for a position off the grid and
    /// [`WorldError::CellOccupied`] if the cell already holds a carcass.
    pub fn spawn_at(
        &mut self,
        grid: &mut Grid,
        position: Position,
        size: CarcassSize,
        day: u64,
    ) -> Result<CarcassId, WorldError> {
        let cell = grid
            .cell_mut(position)
            .ok_or(WorldError::OutOfBounds(position))?;
        if let Some(carcass) = cell.carcass() {
            return Err(WorldError::CellOccupied { position, carcass });
        }
        let grams = self.config.mean_weight(size);
        let id = self.insert(position, size, grams, day);
        cell.set_carcass(Some(id));
        Ok(id)
    }

    fn insert(&mut self, position: Position, size: CarcassSize, grams: f64, day: u64) -> CarcassId {
        let id = CarcassId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        self.totals.spawned = self.totals.spawned.saturating_add(1);
        self.carcasses.insert(
            id,
            Carcass {
                id,
                size,
                position,
                initial_grams: grams,
                remaining_grams: grams,
                state: DiscoveryState::Undiscovered,
                spawned_day: day,
                ignored_by: BTreeSet::new(),
            },
        );
        id
    }

    fn expire(&mut self, grid: &mut Grid, day: u64) -> Vec<CarcassId> {
        let stale: Vec<CarcassId> = self
            .carcasses
            .values()
            .filter(|c| match self.config.expiry {
                ExpiryPolicy::Persist => false,
                ExpiryPolicy::DayRollover => c.spawned_day < day,
                ExpiryPolicy::AfterDays(days) => {
                    day.saturating_sub(c.spawned_day) >= u64::from(days)
                }
            })
            .map(|c| c.id)
            .collect();
        for id in &stale {
            if let Some(carcass) = self.remove(grid, *id) {
                self.totals.expired = self.totals.expired.saturating_add(1);
                self.totals.meat_expired_grams += carcass.remaining_grams;
                tracing::debug!(carcass = %id, grams = carcass.remaining_grams, "carcass expired");
            }
        }
        stale
    }

    /// Look up a live carcass.
    pub fn get(&self, id: CarcassId) -> Option<&Carcass> {
        self.carcasses.get(&id)
    }

    /// Iterate live carcasses in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Carcass> {
        self.carcasses.values()
    }

    /// Number of live carcasses.
    pub fn len(&self) -> usize {
        self.carcasses.len()
    }

    /// Whether no carcass is alive.
    pub fn is_empty(&self) -> bool {
        self.carcasses.is_empty()
    }

    /// Lifetime counters.
    pub const fn totals(&self) -> &CarcassTotals {
        &self.totals
    }

    /// Live carcasses within Manhattan `radius` of `position`, nearest first,
    /// ties by id.
    pub fn carcasses_near(&self, grid: &Grid, position: Position, radius: u32) -> Vec<&Carcass> {
        let mut near: Vec<(u32, &Carcass)> = self
            .carcasses
            .values()
            .filter(|c| c.remaining_grams > 0.0)
            .filter_map(|c| {
                let distance = grid.manhattan_distance(position, c.position);
                (distance <= radius).then_some((distance, c))
            })
            .collect();
        near.sort_by_key(|(distance, c)| (*distance, c.id));
        near.into_iter().map(|(_, c)| c).collect()
    }

    /// Promote an undiscovered carcass to discovered.
    pub fn mark_discovered(&mut self, id: CarcassId) {
        if let Some(carcass) = self.carcasses.get_mut(&id)
            && carcass.state == DiscoveryState::Undiscovered
        {
            carcass.state = DiscoveryState::Discovered;
        }
    }

    /// Record that `agent` gave up on carcass `id` for the rest of the day.
    pub fn mark_ignored(&mut self, id: CarcassId, agent: AgentId) {
        if let Some(carcass) = self.carcasses.get_mut(&id) {
            carcass.ignored_by.insert(agent);
        }
    }

    /// Clear every carcass's ignore marks.
    pub fn reset_daily_ignores(&mut self) {
        for carcass in self.carcasses.values_mut() {
            carcass.ignored_by.clear();
        }
    }

    /// Remove up to `grams` of meat from carcass `id`, returning the grams
    /// actually removed. An exhausted carcass leaves the registry and its
    /// cell.
    pub fn consume(&mut self, grid: &mut Grid, id: CarcassId, grams: f64) -> f64 {
        if !grams.is_finite() || grams <= 0.0 {
            return 0.0;
        }
        let Some(carcass) = self.carcasses.get_mut(&id) else {
            return 0.0;
        };
        let taken = grams.min(carcass.remaining_grams).max(0.0);
        carcass.remaining_grams = (carcass.remaining_grams - taken).max(0.0);
        carcass.state = DiscoveryState::BeingConsumed;
        self.totals.meat_removed_grams += taken;
        if carcass.remaining_grams <= 0.0 {
            self.remove(grid, id);
            self.totals.consumed = self.totals.consumed.saturating_add(1);
            tracing::debug!(carcass = %id, "carcass eaten");
        }
        taken
    }

    /// Drop carcass `id` from the registry and unindex it from its cell.
    pub fn remove(&mut self, grid: &mut Grid, id: CarcassId) -> Option<Carcass> {
        let carcass = self.carcasses.remove(&id)?;
        if let Some(cell) = grid.cell_mut(carcass.position)
            && cell.carcass() == Some(id)
        {
            cell.set_carcass(None);
        }
        Some(carcass)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use hominids_types::PlantSpeciesId;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::landscape::Landscape;
    use crate::plants::{PlantCatalog, PlantSpecies};

    fn grid() -> Grid {
        let landscape = Landscape::uniform("test", 10, 10, Zone::Flooded).unwrap();
        let catalog = PlantCatalog::new(
            "test",
            vec![PlantSpecies::new(PlantSpeciesId(1), "fig")],
            0.0,
        )
        .unwrap();
        Grid::new(&landscape, &catalog, 0.0).unwrap()
    }

    fn always_config(expiry: ExpiryPolicy) -> CarcassConfig {
        let certain = ZoneCarcassOdds {
            appearance_probability: 1.0,
            small_probability: 0.0,
            medium_probability: 1.0,
        };
        CarcassConfig {
            channel: certain,
            flooded: certain,
            unflooded: certain,
            expiry,
            ..CarcassConfig::default()
        }
    }

    fn never_config(expiry: ExpiryPolicy) -> CarcassConfig {
        let never = ZoneCarcassOdds {
            appearance_probability: 0.0,
            small_probability: 1.0,
            medium_probability: 0.0,
        };
        CarcassConfig {
            channel: never,
            flooded: never,
            unflooded: never,
            expiry,
            ..CarcassConfig::default()
        }
    }

    #[test]
    fn default_config_is_valid() {
        assert!(CarcassConfig::default().validate().is_ok());
    }

    #[test]
    fn bad_size_distribution_rejected() {
        let mut config = CarcassConfig::default();
        config.flooded.small_probability = 0.7;
        config.flooded.medium_probability = 0.7;
        assert!(CarcassLifecycle::new(config).is_err());
    }

    #[test]
    fn certain_appearance_fills_every_cell_once() {
        let mut g = grid();
        let mut life = CarcassLifecycle::new(always_config(ExpiryPolicy::Persist)).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let report = life.daily_update(&mut g, 0, &mut rng);
        assert_eq!(report.spawned.len(), 100);
        assert!(g.cells().all(|c| c.carcass().is_some()));
        assert!(life.iter().all(|c| c.size() == CarcassSize::Medium));

        let again = life.daily_update(&mut g, 1, &mut rng);
        assert!(again.spawned.is_empty());
        assert_eq!(life.len(), 100);
    }

    #[test]
    fn spawn_is_deterministic_for_a_seed() {
        let mut config = CarcassConfig::default();
        config.flooded.appearance_probability = 0.05;
        config.weight_variance = 0.2;
        let run = || {
            let mut g = grid();
            let mut life = CarcassLifecycle::new(config.clone()).unwrap();
            let mut rng = ChaCha8Rng::seed_from_u64(42);
            for day in 0..20 {
                life.daily_update(&mut g, day, &mut rng);
            }
            life.iter()
                .map(|c| (c.id(), c.position(), c.size(), c.initial_grams().to_bits()))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn occupied_cell_rejects_second_carcass() {
        let mut g = grid();
        let mut life = CarcassLifecycle::new(never_config(ExpiryPolicy::Persist)).unwrap();
        let at = Position::new(3, 3);
        let first = life.spawn_at(&mut g, at, CarcassSize::Large, 0).unwrap();
        let err = life.spawn_at(&mut g, at, CarcassSize::Small, 0).unwrap_err();
        assert!(matches!(err, WorldError::CellOccupied { carcass, .. } if carcass == first));
        assert!(matches!(
            life.spawn_at(&mut g, Position::new(10, 0), CarcassSize::Small, 0),
            Err(WorldError::OutOfBounds(_))
        ));
    }

    #[test]
    fn consume_clamps_and_removes_when_empty() {
        let mut g = grid();
        let mut life = CarcassLifecycle::new(never_config(ExpiryPolicy::Persist)).unwrap();
        let at = Position::new(1, 2);
        let id = life.spawn_at(&mut g, at, CarcassSize::Small, 0).unwrap();

        assert!((life.consume(&mut g, id, 600.0) - 600.0).abs() < 1e-9);
        assert_eq!(life.get(id).unwrap().state(), DiscoveryState::BeingConsumed);
        assert!((life.consume(&mut g, id, 600.0) - 400.0).abs() < 1e-9);
        assert!(life.get(id).is_none());
        assert_eq!(g.cell(at).unwrap().carcass(), None);
        assert_eq!(life.totals().consumed, 1);
        assert!((life.totals().meat_removed_grams - 1000.0).abs() < 1e-9);
        assert!(life.consume(&mut g, id, 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn after_days_policy_expires_old_carcasses() {
        let mut g = grid();
        let mut life = CarcassLifecycle::new(never_config(ExpiryPolicy::AfterDays(2))).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let id = life.spawn_at(&mut g, Position::new(0, 0), CarcassSize::Medium, 5).unwrap();

        assert!(life.daily_update(&mut g, 6, &mut rng).expired.is_empty());
        let report = life.daily_update(&mut g, 7, &mut rng);
        assert_eq!(report.expired, vec![id]);
        assert!(life.is_empty());
        assert_eq!(g.cell(Position::new(0, 0)).unwrap().carcass(), None);
        assert_eq!(life.totals().expired, 1);
    }

    #[test]
    fn day_rollover_policy_keeps_same_day_carcasses() {
        let mut g = grid();
        let mut life = CarcassLifecycle::new(never_config(ExpiryPolicy::DayRollover)).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        life.spawn_at(&mut g, Position::new(0, 0), CarcassSize::Medium, 3).unwrap();
        assert!(life.daily_update(&mut g, 3, &mut rng).expired.is_empty());
        assert_eq!(life.daily_update(&mut g, 4, &mut rng).expired.len(), 1);
    }

    #[test]
    fn persist_policy_never_expires() {
        let mut g = grid();
        let mut life = CarcassLifecycle::new(never_config(ExpiryPolicy::Persist)).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        life.spawn_at(&mut g, Position::new(0, 0), CarcassSize::Large, 0).unwrap();
        for day in 1..50 {
            life.daily_update(&mut g, day, &mut rng);
        }
        assert_eq!(life.len(), 1);
    }

    #[test]
    fn ignore_marks_clear_each_day() {
        let mut g = grid();
        let mut life = CarcassLifecycle::new(never_config(ExpiryPolicy::Persist)).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let id = life.spawn_at(&mut g, Position::new(2, 2), CarcassSize::Large, 0).unwrap();
        life.mark_ignored(id, AgentId(4));
        assert!(life.get(id).unwrap().is_ignored_by(AgentId(4)));
        life.daily_update(&mut g, 1, &mut rng);
        assert!(!life.get(id).unwrap().is_ignored_by(AgentId(4)));
    }

    #[test]
    fn carcasses_near_orders_by_distance_then_id() {
        let mut g = grid();
        let mut life = CarcassLifecycle::new(never_config(ExpiryPolicy::Persist)).unwrap();
        let far = life.spawn_at(&mut g, Position::new(3, 0), CarcassSize::Large, 0).unwrap();
        let near_b = life.spawn_at(&mut g, Position::new(0, 1), CarcassSize::Small, 0).unwrap();
        let near_a = life.spawn_at(&mut g, Position::new(9, 0), CarcassSize::Small, 0).unwrap();
        life.spawn_at(&mut g, Position::new(5, 5), CarcassSize::Small, 0).unwrap();

        let ids: Vec<CarcassId> = life
            .carcasses_near(&g, Position::new(0, 0), 3)
            .iter()
            .map(|c| c.id())
            .collect();
        assert_eq!(ids, vec![near_b, near_a, far]);
    }

    #[test]
    fn expiry_policy_yaml_shape() {
        let json = serde_json::to_string(&ExpiryPolicy::AfterDays(3)).unwrap();
        assert_eq!(json, r#"{"after_days":3}"#);
        let parsed: ExpiryPolicy = serde_json::from_str(r#""day_rollover""#).unwrap();
        assert_eq!(parsed, ExpiryPolicy::DayRollover);
    }
}
