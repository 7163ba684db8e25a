//! Plant species parameters and the immutable species catalog.
//!
//! A [`PlantSpecies`] describes one food plant: where it grows and how
//! densely, when it fruits, who can eat it, and what it yields per feeding
//! unit. The [`PlantCatalog`] validates a landscape's species list once and
//! precomputes each species' return rate, after which it is shared read-only
//! by every cell and agent.

use hominids_types::{HominidSpecies, PlantSpeciesId, Season, Zone};
use serde::{Deserialize, Serialize};

use crate::error::WorldError;

/// Default logistic growth rate per day.
pub const DEFAULT_GROWTH_RATE: f64 = 0.1;

/// Default exponential decay rate per day.
pub const DEFAULT_DECAY_RATE: f64 = 0.05;

/// Static parameters for one plant food species.
///
/// Construct with [`PlantSpecies::new`] and adjust the public fields; the
/// return rate is filled in when the species is added to a [`PlantCatalog`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantSpecies {
    /// Catalog key.
    pub id: PlantSpeciesId,
    /// Common or botanical name.
    pub name: String,
    /// Disabled species never grow food and are never eaten.
    #[serde(default)]
    pub disabled: bool,
    /// Whether *boisei* agents eat this species.
    pub edible_by_boisei: bool,
    /// Whether *ergaster* agents eat this species.
    pub edible_by_ergaster: bool,
    /// Eating requires a digging stick.
    #[serde(default)]
    pub tools_required: bool,
    /// The edible part is an underground storage organ.
    #[serde(default)]
    pub has_digging_phase: bool,
    /// Agents can nest in this species.
    #[serde(default)]
    pub nesting_tree: bool,
    /// Plants per cell in channel cells.
    pub plants_per_channel: f64,
    /// Plants per cell in flooded cells.
    pub plants_per_flooded: f64,
    /// Plants per cell in unflooded cells.
    pub plants_per_unflooded: f64,
    /// Standing crop of one plant, in grams.
    pub grams_per_plant: f64,
    /// Fruiting flag per season, indexed by [`Season::index`].
    pub fruiting: [bool; 4],
    /// Grams taken in one feeding unit (one minute of eating).
    pub grams_per_feeding_unit: f64,
    /// Kilocalories per gram eaten.
    pub calories_per_gram: f64,
    /// Probability that a forager notices the food in one scan.
    pub visibility_probability: f64,
    /// Minutes of handling per feeding unit.
    pub handling_time_minutes: f64,
    /// Logistic growth rate `r` per day.
    #[serde(default = "default_growth_rate")]
    pub growth_rate: f64,
    /// Exponential decay rate `d` per day.
    #[serde(default = "default_decay_rate")]
    pub decay_rate: f64,
    #[serde(skip)]
    return_rate: f64,
}

const fn default_growth_rate() -> f64 {
    DEFAULT_GROWTH_RATE
}

const fn default_decay_rate() -> f64 {
    DEFAULT_DECAY_RATE
}

impl PlantSpecies {
    /// Create a species edible by both hominids, fruiting all year, with no
    /// density in any zone.
    pub fn new(id: PlantSpeciesId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            disabled: false,
            edible_by_boisei: true,
            edible_by_ergaster: true,
            tools_required: false,
            has_digging_phase: false,
            nesting_tree: false,
            plants_per_channel: 0.0,
            plants_per_flooded: 0.0,
            plants_per_unflooded: 0.0,
            grams_per_plant: 1000.0,
            fruiting: [true; 4],
            grams_per_feeding_unit: 100.0,
            calories_per_gram: 2.0,
            visibility_probability: 0.7,
            handling_time_minutes: 5.0,
            growth_rate: DEFAULT_GROWTH_RATE,
            decay_rate: DEFAULT_DECAY_RATE,
            return_rate: 0.0,
        }
    }

    /// Set the same plant density in every zone.
    #[must_use]
    pub const fn with_uniform_density(mut self, plants_per_cell: f64) -> Self {
        self.plants_per_channel = plants_per_cell;
        self.plants_per_flooded = plants_per_cell;
        self.plants_per_unflooded = plants_per_cell;
        self
    }

    /// Whether the species fruits (grows) in `season`.
    pub fn is_fruiting(&self, season: Season) -> bool {
        self.fruiting.get(season.index()).copied().unwrap_or(false)
    }

    /// Root foods feed the root calorie bucket.
    pub const fn is_root(&self) -> bool {
        self.tools_required || self.has_digging_phase
    }

    /// Whether an agent of `species` with the given digging capability can
    /// eat this plant.
    pub const fn edible_by(&self, species: HominidSpecies, can_dig: bool) -> bool {
        if self.disabled || (self.tools_required && !can_dig) {
            return false;
        }
        match species {
            HominidSpecies::Boisei => self.edible_by_boisei,
            HominidSpecies::Ergaster => self.edible_by_ergaster,
        }
    }

    /// Plants per cell in `zone`.
    pub const fn density(&self, zone: Zone) -> f64 {
        match zone {
            Zone::Channel => self.plants_per_channel,
            Zone::Flooded => self.plants_per_flooded,
            Zone::Unflooded => self.plants_per_unflooded,
        }
    }

    /// Carrying capacity in grams for one cell of `zone`.
    pub fn capacity(&self, zone: Zone) -> f64 {
        if self.disabled {
            return 0.0;
        }
        self.density(zone) * self.grams_per_plant
    }

    /// Kilocalories per minute of handling, including travel amortization.
    ///
    /// Zero until the species has been added to a [`PlantCatalog`].
    pub const fn return_rate(&self) -> f64 {
        self.return_rate
    }

    /// Kilocalories in one full feeding unit.
    pub fn calories_per_feeding_unit(&self) -> f64 {
        self.grams_per_feeding_unit * self.calories_per_gram
    }

    fn validate(&self, travel_amortization_minutes: f64) -> Result<(), WorldError> {
        let invalid = |reason: &str| WorldError::InvalidSpecies {
            id: self.id,
            reason: reason.to_owned(),
        };
        let non_negative = [
            ("plants_per_channel", self.plants_per_channel),
            ("plants_per_flooded", self.plants_per_flooded),
            ("plants_per_unflooded", self.plants_per_unflooded),
            ("grams_per_plant", self.grams_per_plant),
            ("grams_per_feeding_unit", self.grams_per_feeding_unit),
            ("calories_per_gram", self.calories_per_gram),
            ("handling_time_minutes", self.handling_time_minutes),
            ("growth_rate", self.growth_rate),
            ("decay_rate", self.decay_rate),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(&format!("{field} must be finite and >= 0, got {value}")));
            }
        }
        if !(0.0..=1.0).contains(&self.visibility_probability) {
            return Err(invalid(&format!(
                "visibility_probability must be within [0, 1], got {}",
                self.visibility_probability
            )));
        }
        if self.handling_time_minutes + travel_amortization_minutes <= 0.0 {
            return Err(invalid("handling time plus travel amortization must be positive"));
        }
        Ok(())
    }
}

/// The validated, immutable plant species list for one landscape.
///
/// Species are kept sorted by id so iteration order is stable across runs.
#[derive(Debug, Clone, PartialEq)]
pub struct PlantCatalog {
    landscape: String,
    travel_amortization_minutes: f64,
    species: Vec<PlantSpecies>,
}

impl PlantCatalog {
    /// Validate `species` and compute each return rate.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::DuplicateSpecies`] if two entries share an id and
    /// [`WorldError::InvalidSpecies`] if any parameter is out of range.
    pub fn new(
        landscape: impl Into<String>,
        mut species: Vec<PlantSpecies>,
        travel_amortization_minutes: f64,
    ) -> Result<Self, WorldError> {
        species.sort_by_key(|s| s.id);
        for pair in species.windows(2) {
            if let [a, b] = pair
                && a.id == b.id
            {
                return Err(WorldError::DuplicateSpecies(a.id));
            }
        }
        let amortization = if travel_amortization_minutes.is_finite() {
            travel_amortization_minutes.max(0.0)
        } else {
            0.0
        };
        for entry in &mut species {
            entry.validate(amortization)?;
            entry.return_rate =
                entry.calories_per_feeding_unit() / (entry.handling_time_minutes + amortization);
        }
        Ok(Self {
            landscape: landscape.into(),
            travel_amortization_minutes: amortization,
            species,
        })
    }

    /// Name of the landscape this catalog belongs to.
    pub fn landscape(&self) -> &str {
        &self.landscape
    }

    /// Travel minutes folded into every return rate.
    pub const fn travel_amortization_minutes(&self) -> f64 {
        self.travel_amortization_minutes
    }

    /// Look up a species by id.
    pub fn get(&self, id: PlantSpeciesId) -> Option<&PlantSpecies> {
        self.species
            .binary_search_by_key(&id, |s| s.id)
            .ok()
            .and_then(|index| self.species.get(index))
    }

    /// Iterate species in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &PlantSpecies> {
        self.species.iter()
    }

    /// Number of species, disabled ones included.
    pub fn len(&self) -> usize {
        self.species.len()
    }

    /// Whether the catalog has no species.
    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    /// Whether `id` names an enabled nesting tree.
    pub fn is_nesting_tree(&self, id: PlantSpeciesId) -> bool {
        self.get(id).is_some_and(|s| s.nesting_tree && !s.disabled)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn species(id: u16) -> PlantSpecies {
        PlantSpecies::new(PlantSpeciesId(id), format!("plant-{id}")).with_uniform_density(2.0)
    }

    #[test]
    fn return_rate_includes_travel_amortization() {
        let mut fig = species(1);
        fig.grams_per_feeding_unit = 50.0;
        fig.calories_per_gram = 3.0;
        fig.handling_time_minutes = 4.0;
        let catalog = PlantCatalog::new("test", vec![fig], 1.0).unwrap();
        let rate = catalog.get(PlantSpeciesId(1)).unwrap().return_rate();
        assert!((rate - 30.0).abs() < 1e-12);
    }

    #[test]
    fn catalog_sorts_by_id() {
        let catalog = PlantCatalog::new("test", vec![species(3), species(1), species(2)], 0.0)
            .unwrap();
        let ids: Vec<u16> = catalog.iter().map(|s| s.id.into_inner()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn duplicate_ids_rejected() {
        let result = PlantCatalog::new("test", vec![species(4), species(4)], 0.0);
        assert!(matches!(result, Err(WorldError::DuplicateSpecies(PlantSpeciesId(4)))));
    }

    #[test]
    fn visibility_out_of_range_rejected() {
        let mut bad = species(1);
        bad.visibility_probability = 1.5;
        let result = PlantCatalog::new("test", vec![bad], 0.0);
        assert!(matches!(result, Err(WorldError::InvalidSpecies { .. })));
    }

    #[test]
    fn zero_handling_time_rejected_without_amortization() {
        let mut bad = species(1);
        bad.handling_time_minutes = 0.0;
        assert!(PlantCatalog::new("test", vec![bad.clone()], 0.0).is_err());
        assert!(PlantCatalog::new("test", vec![bad], 2.0).is_ok());
    }

    #[test]
    fn tools_gate_edibility() {
        let mut tuber = species(1);
        tuber.tools_required = true;
        assert!(!tuber.edible_by(HominidSpecies::Boisei, false));
        assert!(tuber.edible_by(HominidSpecies::Boisei, true));
        assert!(tuber.is_root());

        tuber.edible_by_ergaster = false;
        assert!(!tuber.edible_by(HominidSpecies::Ergaster, true));
    }

    #[test]
    fn disabled_species_has_no_capacity() {
        let mut off = species(1);
        assert!((off.capacity(Zone::Flooded) - 2000.0).abs() < 1e-9);
        off.disabled = true;
        assert!(off.capacity(Zone::Flooded).abs() < f64::EPSILON);
        assert!(!off.edible_by(HominidSpecies::Ergaster, true));
    }

    #[test]
    fn fruiting_follows_calendar() {
        let mut seasonal = species(1);
        seasonal.fruiting = [true, false, false, true];
        assert!(seasonal.is_fruiting(Season::First));
        assert!(!seasonal.is_fruiting(Season::Second));
        assert!(seasonal.is_fruiting(Season::Fourth));
    }
}
