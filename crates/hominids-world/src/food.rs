//! Per-cell standing crop of plant food.
//!
//! Every cell owns one [`PlantResourceField`] with an entry for each enabled
//! species that has a non-zero carrying capacity in the cell's zone. Amounts
//! change in exactly two ways: the once-per-day growth/decay update, and
//! live consumption by agents during the day.

use std::collections::BTreeMap;

use hominids_types::{PlantSpeciesId, Season, Zone};
use serde::{Deserialize, Serialize};

use crate::plants::PlantCatalog;

/// Standing amount and carrying capacity of one species in one cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FoodEntry {
    /// Grams currently available, always within `[0, capacity]`.
    pub amount: f64,
    /// Carrying capacity `K` in grams.
    pub capacity: f64,
}

/// One logistic growth step, clamped to `[0, capacity]`.
pub fn logistic_step(amount: f64, capacity: f64, rate: f64) -> f64 {
    if capacity <= 0.0 {
        return 0.0;
    }
    let grown = amount + rate * amount * (1.0 - amount / capacity);
    grown.clamp(0.0, capacity)
}

/// One exponential decay step, clamped to `>= 0`.
pub fn decay_step(amount: f64, rate: f64) -> f64 {
    (amount * (-rate).exp()).max(0.0)
}

/// Standing plant food in a single cell, keyed by species.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlantResourceField {
    entries: BTreeMap<PlantSpeciesId, FoodEntry>,
    consumed_grams: f64,
}

impl PlantResourceField {
    /// Build the field for a cell of `zone`, starting every entry at
    /// `initial_fraction` of its capacity.
    pub fn new(zone: Zone, catalog: &PlantCatalog, initial_fraction: f64) -> Self {
        let fraction = initial_fraction.clamp(0.0, 1.0);
        let entries = catalog
            .iter()
            .filter_map(|species| {
                let capacity = species.capacity(zone);
                (capacity > 0.0).then_some((
                    species.id,
                    FoodEntry {
                        amount: capacity * fraction,
                        capacity,
                    },
                ))
            })
            .collect();
        Self {
            entries,
            consumed_grams: 0.0,
        }
    }

    /// Advance every entry by one day.
    ///
    /// Fruiting species grow logistically from their current (post-consumption)
    /// amount; an exhausted fruiting species is reseeded to
    /// `reseed_fraction` of capacity. Non-fruiting species decay.
    pub fn daily_update(&mut self, season: Season, catalog: &PlantCatalog, reseed_fraction: f64) {
        for (id, entry) in &mut self.entries {
            let Some(species) = catalog.get(*id) else {
                continue;
            };
            entry.amount = if species.is_fruiting(season) {
                if entry.amount <= 0.0 {
                    (entry.capacity * reseed_fraction).clamp(0.0, entry.capacity)
                } else {
                    logistic_step(entry.amount, entry.capacity, species.growth_rate)
                }
            } else {
                decay_step(entry.amount, species.decay_rate)
            };
        }
    }

    /// Remove up to `grams` of species `id`, returning the grams actually
    /// removed.
    pub fn consume(&mut self, id: PlantSpeciesId, grams: f64) -> f64 {
        if !grams.is_finite() || grams <= 0.0 {
            return 0.0;
        }
        let Some(entry) = self.entries.get_mut(&id) else {
            return 0.0;
        };
        let taken = grams.min(entry.amount).max(0.0);
        entry.amount = (entry.amount - taken).max(0.0);
        self.consumed_grams += taken;
        taken
    }

    /// Overwrite the standing amount of `id`, clamped to its capacity.
    ///
    /// Returns the amount actually stored; species without an entry stay at
    /// zero.
    pub fn set_amount(&mut self, id: PlantSpeciesId, grams: f64) -> f64 {
        match self.entries.get_mut(&id) {
            Some(entry) => {
                entry.amount = if grams.is_finite() {
                    grams.clamp(0.0, entry.capacity)
                } else {
                    0.0
                };
                entry.amount
            }
            None => 0.0,
        }
    }

    /// Grams of `id` currently standing.
    pub fn amount(&self, id: PlantSpeciesId) -> f64 {
        self.entries.get(&id).map_or(0.0, |e| e.amount)
    }

    /// Carrying capacity of `id` in this cell.
    pub fn capacity(&self, id: PlantSpeciesId) -> f64 {
        self.entries.get(&id).map_or(0.0, |e| e.capacity)
    }

    /// Iterate entries in ascending species order.
    pub fn entries(&self) -> impl Iterator<Item = (PlantSpeciesId, &FoodEntry)> {
        self.entries.iter().map(|(id, entry)| (*id, entry))
    }

    /// Total grams standing across all species.
    pub fn standing_grams(&self) -> f64 {
        self.entries.values().map(|e| e.amount).sum()
    }

    /// Grams removed by agents from this cell over the run.
    pub const fn consumed_grams(&self) -> f64 {
        self.consumed_grams
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::plants::PlantSpecies;

    const FIG: PlantSpeciesId = PlantSpeciesId(1);

    fn catalog(fruiting: [bool; 4]) -> PlantCatalog {
        let mut fig = PlantSpecies::new(FIG, "fig").with_uniform_density(1.0);
        fig.grams_per_plant = 1000.0;
        fig.fruiting = fruiting;
        fig.growth_rate = 0.3;
        fig.decay_rate = 0.2;
        PlantCatalog::new("test", vec![fig], 0.0).unwrap()
    }

    #[test]
    fn new_field_starts_at_initial_fraction() {
        let field = PlantResourceField::new(Zone::Flooded, &catalog([true; 4]), 0.25);
        assert!((field.amount(FIG) - 250.0).abs() < 1e-9);
        assert!((field.capacity(FIG) - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn growth_converges_to_capacity_without_overshoot() {
        let catalog = catalog([true; 4]);
        let mut field = PlantResourceField::new(Zone::Channel, &catalog, 0.05);
        let mut previous = field.amount(FIG);
        for _ in 0..200 {
            field.daily_update(Season::First, &catalog, 0.01);
            let now = field.amount(FIG);
            assert!(now >= previous);
            assert!(now <= 1000.0);
            previous = now;
        }
        assert!(previous > 999.0);
    }

    #[test]
    fn decay_is_monotone_and_non_negative() {
        let catalog = catalog([false; 4]);
        let mut field = PlantResourceField::new(Zone::Channel, &catalog, 1.0);
        let mut previous = field.amount(FIG);
        for _ in 0..500 {
            field.daily_update(Season::Third, &catalog, 0.01);
            let now = field.amount(FIG);
            assert!(now <= previous);
            assert!(now >= 0.0);
            previous = now;
        }
    }

    #[test]
    fn exhausted_fruiting_species_reseeds() {
        let catalog = catalog([true; 4]);
        let mut field = PlantResourceField::new(Zone::Channel, &catalog, 0.0);
        field.daily_update(Season::First, &catalog, 0.01);
        assert!((field.amount(FIG) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn consume_clamps_to_available() {
        let catalog = catalog([true; 4]);
        let mut field = PlantResourceField::new(Zone::Channel, &catalog, 0.1);
        assert!((field.consume(FIG, 60.0) - 60.0).abs() < 1e-9);
        assert!((field.consume(FIG, 60.0) - 40.0).abs() < 1e-9);
        assert!(field.consume(FIG, 60.0).abs() < f64::EPSILON);
        assert!(field.amount(FIG).abs() < f64::EPSILON);
        assert!((field.consumed_grams() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn consumption_is_not_reverted_by_growth() {
        let catalog = catalog([true; 4]);
        let mut field = PlantResourceField::new(Zone::Channel, &catalog, 0.5);
        field.consume(FIG, 400.0);
        field.daily_update(Season::First, &catalog, 0.01);
        let expected = logistic_step(100.0, 1000.0, 0.3);
        assert!((field.amount(FIG) - expected).abs() < 1e-9);
    }

    #[test]
    fn set_amount_clamps_to_capacity() {
        let catalog = catalog([true; 4]);
        let mut field = PlantResourceField::new(Zone::Channel, &catalog, 0.0);
        assert!((field.set_amount(FIG, 5000.0) - 1000.0).abs() < 1e-9);
        assert!(field.set_amount(FIG, -3.0).abs() < f64::EPSILON);
        assert!(field.set_amount(PlantSpeciesId(99), 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_density_zone_has_no_entry() {
        let mut reed = PlantSpecies::new(FIG, "reed");
        reed.plants_per_channel = 3.0;
        let catalog = PlantCatalog::new("test", vec![reed], 0.0).unwrap();
        let field = PlantResourceField::new(Zone::Unflooded, &catalog, 1.0);
        assert_eq!(field.entries().count(), 0);
    }
}
