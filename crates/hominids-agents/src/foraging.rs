//! Food options and the choice rule.
//!
//! A scan produces [`FoodOption`]s: plant entries that passed their
//! detection trial in the Moore neighbourhood, and carcasses seen within
//! detection range or heard about over the channel. [`choose`] picks the
//! option with the highest return rate, breaking ties by distance and then
//! by a stable key so that runs are reproducible.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use hominids_types::{AgentId, CarcassId, HominidSpecies, PlantSpeciesId, Position, Season};
use hominids_world::{Carcass, CarcassLifecycle, Grid, PlantCatalog};
use rand::Rng;

use crate::capabilities::Capabilities;
use crate::communication::CommunicationChannel;
use crate::config::ForagingConfig;

/// Where a meal would come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FoodSource {
    /// Standing crop of a plant species.
    Plant(PlantSpeciesId),
    /// Meat from a carcass.
    Carcass(CarcassId),
}

/// One candidate meal found by a scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FoodOption {
    /// What would be eaten.
    pub source: FoodSource,
    /// The cell it lies on.
    pub position: Position,
    /// Expected kilocalories per minute.
    pub return_rate: f64,
    /// Wrapped Euclidean distance from the forager.
    pub distance: f64,
}

/// Order options from best to worst.
fn rank(a: &FoodOption, b: &FoodOption) -> Ordering {
    b.return_rate
        .total_cmp(&a.return_rate)
        .then_with(|| a.distance.total_cmp(&b.distance))
        .then_with(|| a.source.cmp(&b.source))
        .then_with(|| a.position.cmp(&b.position))
}

/// The best option: highest return rate, then nearest, then plants before
/// carcasses by ascending id, then by position.
pub fn choose(options: &[FoodOption]) -> Option<&FoodOption> {
    options.iter().min_by(|a, b| rank(a, b))
}

/// Plant entries in the Moore neighbourhood of `from` that the forager can
/// eat and happens to notice.
///
/// Every fruiting, edible entry with food standing gets one Bernoulli trial
/// at its species' visibility probability. Cells are visited row by row and
/// species in ascending id, so the random stream is consumed in a fixed
/// order.
pub fn scan_plants<R: Rng + ?Sized>(
    grid: &Grid,
    catalog: &PlantCatalog,
    from: Position,
    species: HominidSpecies,
    can_dig: bool,
    season: Season,
    rng: &mut R,
) -> Vec<FoodOption> {
    let mut found = Vec::new();
    for position in grid.moore_neighborhood(from, true) {
        let Some(cell) = grid.cell(position) else {
            continue;
        };
        for (id, entry) in cell.food().entries() {
            let Some(plant) = catalog.get(id) else {
                continue;
            };
            if entry.amount <= 0.0 || !plant.is_fruiting(season) || !plant.edible_by(species, can_dig)
            {
                continue;
            }
            let roll: f64 = rng.random();
            if roll < plant.visibility_probability {
                found.push(FoodOption {
                    source: FoodSource::Plant(id),
                    position,
                    return_rate: plant.return_rate(),
                    distance: grid.euclidean_distance(from, position),
                });
            }
        }
    }
    found
}

/// Carcasses the forager sees within detection range or hears called within
/// earshot.
///
/// Carcasses the forager ignored today are skipped, and foragers that do not
/// cooperate only consider carcasses small enough to eat alone.
#[allow(clippy::too_many_arguments)]
pub fn scan_carcasses(
    carcasses: &CarcassLifecycle,
    channel: &CommunicationChannel,
    grid: &Grid,
    from: Position,
    agent: AgentId,
    capabilities: Capabilities,
    config: &ForagingConfig,
    ignored: &BTreeSet<CarcassId>,
) -> Vec<FoodOption> {
    if !capabilities.can_eat_meat {
        return Vec::new();
    }
    let viable = |carcass: &Carcass| {
        !ignored.contains(&carcass.id())
            && !carcass.is_ignored_by(agent)
            && carcass.remaining_grams() > 0.0
            && (capabilities.cooperates || !carcass.requires_cooperation())
    };
    let option = |carcass: &Carcass| FoodOption {
        source: FoodSource::Carcass(carcass.id()),
        position: carcass.position(),
        return_rate: config.meat_return_rate(carcass.requires_cooperation()),
        distance: grid.euclidean_distance(from, carcass.position()),
    };

    let mut found: Vec<FoodOption> = carcasses
        .carcasses_near(grid, from, config.carcass_detection_range)
        .into_iter()
        .filter(|&c| viable(c))
        .map(option)
        .collect();

    let heard = channel
        .query(grid, from, capabilities.cooperates, config.earshot_distance, ignored)
        .and_then(|(id, _)| carcasses.get(id));
    if let Some(carcass) = heard
        && viable(carcass)
        && !found
            .iter()
            .any(|o| o.source == FoodSource::Carcass(carcass.id()))
    {
        found.push(option(carcass));
    }
    found
}
