//! Built-in starting landscape and plant catalogs.
//!
//! [`river_landscape`] lays out a meandering river channel down the middle
//! of the grid with a flooded margin on either side and dry unflooded land
//! beyond. [`starting_catalog`] returns the plant species list for one of the
//! two named landscapes, `voi` (bushland savanna) and `turkana` (arid lake
//! basin).

use hominids_types::{PlantSpeciesId, Zone};

use crate::error::WorldError;
use crate::landscape::Landscape;
use crate::plants::{PlantCatalog, PlantSpecies};

/// Travel minutes folded into every built-in return rate.
pub const DEFAULT_TRAVEL_AMORTIZATION_MINUTES: f64 = 1.0;

/// Names accepted by [`starting_catalog`].
pub const KNOWN_LANDSCAPES: [&str; 2] = ["voi", "turkana"];

/// Column offsets of the channel centre, one entry per eight rows.
const MEANDER: [i32; 8] = [0, 1, 2, 1, 0, -1, -2, -1];

/// Build a river landscape of the given size.
///
/// The channel is three cells wide; the flooded margin extends a further
/// eighth of the width (at least one cell) on each side.
///
/// # Errors
///
/// Returns [`WorldError::InvalidDimensions`] for non-positive dimensions.
pub fn river_landscape(
    name: impl Into<String>,
    width: i32,
    height: i32,
) -> Result<Landscape, WorldError> {
    if width <= 0 || height <= 0 {
        return Err(WorldError::InvalidDimensions { width, height });
    }
    let flood_band = width.saturating_div(8).max(1);
    let mut zones = Vec::new();
    for y in 0..height {
        let bend = usize::try_from(y.saturating_div(8).rem_euclid(8))
            .ok()
            .and_then(|i| MEANDER.get(i).copied())
            .unwrap_or(0);
        let centre = width.saturating_div(2).saturating_add(bend);
        for x in 0..width {
            let raw = x.saturating_sub(centre).rem_euclid(width);
            let offset = raw.min(width.saturating_sub(raw));
            let zone = if offset <= 1 {
                Zone::Channel
            } else if offset <= flood_band.saturating_add(1) {
                Zone::Flooded
            } else {
                Zone::Unflooded
            };
            zones.push(zone);
        }
    }
    Landscape::new(name, width, height, zones)
}

/// Plant catalog for a named landscape.
///
/// # Errors
///
/// Returns [`WorldError::UnknownLandscape`] for a name outside
/// [`KNOWN_LANDSCAPES`].
pub fn starting_catalog(landscape: &str) -> Result<PlantCatalog, WorldError> {
    let species = match landscape.to_ascii_lowercase().as_str() {
        "voi" => voi_species(),
        "turkana" => turkana_species(),
        other => return Err(WorldError::UnknownLandscape(other.to_owned())),
    };
    PlantCatalog::new(landscape, species, DEFAULT_TRAVEL_AMORTIZATION_MINUTES)
}

/// Per-zone densities, standing crop, and yield for one species.
struct Yield {
    density: [f64; 3],
    grams_per_plant: f64,
    grams_per_unit: f64,
    calories_per_gram: f64,
    visibility: f64,
    handling: f64,
}

fn plant(id: u16, name: &str, fruiting: [bool; 4], y: &Yield) -> PlantSpecies {
    let mut s = PlantSpecies::new(PlantSpeciesId(id), name);
    let [channel, flooded, unflooded] = y.density;
    s.plants_per_channel = channel;
    s.plants_per_flooded = flooded;
    s.plants_per_unflooded = unflooded;
    s.grams_per_plant = y.grams_per_plant;
    s.fruiting = fruiting;
    s.grams_per_feeding_unit = y.grams_per_unit;
    s.calories_per_gram = y.calories_per_gram;
    s.visibility_probability = y.visibility;
    s.handling_time_minutes = y.handling;
    s
}

fn tree(mut s: PlantSpecies) -> PlantSpecies {
    s.nesting_tree = true;
    s
}

fn dug(mut s: PlantSpecies) -> PlantSpecies {
    s.tools_required = true;
    s.has_digging_phase = true;
    s
}

fn rhizome(mut s: PlantSpecies) -> PlantSpecies {
    s.has_digging_phase = true;
    s
}

fn only_boisei(mut s: PlantSpecies) -> PlantSpecies {
    s.edible_by_ergaster = false;
    s
}

fn voi_species() -> Vec<PlantSpecies> {
    const WET: [bool; 4] = [true, false, false, true];
    const DRY: [bool; 4] = [false, true, true, false];
    const LATE: [bool; 4] = [false, false, true, true];
    vec![
        plant(1, "Grewia bicolor", WET, &Yield {
            density: [0.0, 4.0, 6.0],
            grams_per_plant: 500.0,
            grams_per_unit: 50.0,
            calories_per_gram: 3.0,
            visibility: 0.6,
            handling: 4.0,
        }),
        tree(plant(2, "Ficus sycomorus", [true, true, false, false], &Yield {
            density: [2.0, 3.0, 0.5],
            grams_per_plant: 5000.0,
            grams_per_unit: 120.0,
            calories_per_gram: 2.6,
            visibility: 0.9,
            handling: 3.0,
        })),
        tree(plant(3, "Hyphaene compressa", DRY, &Yield {
            density: [1.0, 2.0, 0.5],
            grams_per_plant: 3000.0,
            grams_per_unit: 80.0,
            calories_per_gram: 3.5,
            visibility: 0.8,
            handling: 6.0,
        })),
        dug(plant(4, "Cyperus rotundus", [true; 4], &Yield {
            density: [6.0, 5.0, 0.0],
            grams_per_plant: 200.0,
            grams_per_unit: 40.0,
            calories_per_gram: 3.2,
            visibility: 0.5,
            handling: 8.0,
        })),
        rhizome(plant(5, "Typha domingensis", [true; 4], &Yield {
            density: [8.0, 2.0, 0.0],
            grams_per_plant: 400.0,
            grams_per_unit: 60.0,
            calories_per_gram: 2.9,
            visibility: 0.7,
            handling: 7.0,
        })),
        tree(plant(6, "Acacia tortilis", LATE, &Yield {
            density: [0.0, 2.0, 4.0],
            grams_per_plant: 2000.0,
            grams_per_unit: 70.0,
            calories_per_gram: 2.8,
            visibility: 0.8,
            handling: 5.0,
        })),
        plant(7, "Salvadora persica", [true, false, false, false], &Yield {
            density: [1.0, 3.0, 2.0],
            grams_per_plant: 800.0,
            grams_per_unit: 60.0,
            calories_per_gram: 1.8,
            visibility: 0.7,
            handling: 4.0,
        }),
        tree(plant(8, "Tamarindus indica", DRY, &Yield {
            density: [1.0, 2.0, 1.0],
            grams_per_plant: 4000.0,
            grams_per_unit: 80.0,
            calories_per_gram: 2.4,
            visibility: 0.8,
            handling: 6.0,
        })),
        only_boisei(plant(9, "Panicum maximum", [false, true, false, false], &Yield {
            density: [2.0, 8.0, 8.0],
            grams_per_plant: 150.0,
            grams_per_unit: 20.0,
            calories_per_gram: 3.4,
            visibility: 0.4,
            handling: 10.0,
        })),
        dug(plant(10, "Vigna frutescens", [true; 4], &Yield {
            density: [0.0, 2.0, 4.0],
            grams_per_plant: 600.0,
            grams_per_unit: 60.0,
            calories_per_gram: 1.5,
            visibility: 0.4,
            handling: 12.0,
        })),
        {
            let mut resin = plant(11, "Commiphora africana", [true; 4], &Yield {
                density: [0.0, 1.0, 3.0],
                grams_per_plant: 300.0,
                grams_per_unit: 20.0,
                calories_per_gram: 0.5,
                visibility: 0.5,
                handling: 10.0,
            });
            resin.disabled = true;
            resin
        },
        plant(12, "Balanites aegyptiaca", LATE, &Yield {
            density: [0.0, 1.0, 3.0],
            grams_per_plant: 2500.0,
            grams_per_unit: 70.0,
            calories_per_gram: 2.7,
            visibility: 0.7,
            handling: 5.0,
        }),
    ]
}

fn turkana_species() -> Vec<PlantSpecies> {
    const WET: [bool; 4] = [true, false, false, true];
    const DRY: [bool; 4] = [false, true, true, false];
    vec![
        tree(plant(1, "Hyphaene compressa", DRY, &Yield {
            density: [2.0, 4.0, 1.0],
            grams_per_plant: 3000.0,
            grams_per_unit: 80.0,
            calories_per_gram: 3.5,
            visibility: 0.8,
            handling: 6.0,
        })),
        plant(2, "Salvadora persica", WET, &Yield {
            density: [2.0, 4.0, 2.0],
            grams_per_plant: 800.0,
            grams_per_unit: 60.0,
            calories_per_gram: 1.8,
            visibility: 0.7,
            handling: 4.0,
        }),
        plant(3, "Dobera glabra", [false, false, true, true], &Yield {
            density: [0.0, 1.0, 2.0],
            grams_per_plant: 1500.0,
            grams_per_unit: 70.0,
            calories_per_gram: 2.2,
            visibility: 0.6,
            handling: 6.0,
        }),
        dug(plant(4, "Cyperus rotundus", [true; 4], &Yield {
            density: [8.0, 4.0, 0.0],
            grams_per_plant: 200.0,
            grams_per_unit: 40.0,
            calories_per_gram: 3.2,
            visibility: 0.5,
            handling: 8.0,
        })),
        rhizome(plant(5, "Typha domingensis", [true; 4], &Yield {
            density: [10.0, 1.0, 0.0],
            grams_per_plant: 400.0,
            grams_per_unit: 60.0,
            calories_per_gram: 2.9,
            visibility: 0.7,
            handling: 7.0,
        })),
        tree(plant(6, "Acacia tortilis", [false, false, true, true], &Yield {
            density: [0.0, 1.0, 3.0],
            grams_per_plant: 2000.0,
            grams_per_unit: 70.0,
            calories_per_gram: 2.8,
            visibility: 0.8,
            handling: 5.0,
        })),
        plant(7, "Ziziphus mauritiana", WET, &Yield {
            density: [1.0, 2.0, 1.0],
            grams_per_plant: 1200.0,
            grams_per_unit: 60.0,
            calories_per_gram: 2.3,
            visibility: 0.7,
            handling: 4.0,
        }),
        plant(8, "Cordia sinensis", [true, true, false, false], &Yield {
            density: [0.5, 2.0, 1.0],
            grams_per_plant: 900.0,
            grams_per_unit: 50.0,
            calories_per_gram: 1.9,
            visibility: 0.7,
            handling: 4.0,
        }),
        only_boisei(plant(9, "Sporobolus spicatus", [false, true, false, false], &Yield {
            density: [1.0, 6.0, 4.0],
            grams_per_plant: 120.0,
            grams_per_unit: 20.0,
            calories_per_gram: 3.3,
            visibility: 0.4,
            handling: 10.0,
        })),
        dug(plant(10, "Ipomoea kituiensis", [true; 4], &Yield {
            density: [0.0, 1.0, 3.0],
            grams_per_plant: 700.0,
            grams_per_unit: 60.0,
            calories_per_gram: 1.4,
            visibility: 0.3,
            handling: 12.0,
        })),
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn river_landscape_has_all_zones() {
        let landscape = river_landscape("voi", 81, 101).unwrap();
        assert_eq!(landscape.area(), 81 * 101);
        let [channel, flooded, unflooded] = landscape.zone_counts();
        assert_eq!(channel, 3 * 101);
        assert!(flooded > 0);
        assert!(unflooded > flooded);
    }

    #[test]
    fn river_landscape_rejects_bad_size() {
        assert!(river_landscape("voi", 0, 10).is_err());
    }

    #[test]
    fn both_named_catalogs_build() {
        for name in KNOWN_LANDSCAPES {
            let catalog = starting_catalog(name).unwrap();
            assert!(!catalog.is_empty());
            assert!(catalog.iter().any(|s| s.nesting_tree));
            assert!(catalog.iter().any(|s| s.tools_required));
            assert!(catalog.iter().all(|s| s.return_rate() > 0.0));
        }
    }

    #[test]
    fn catalog_name_is_case_insensitive() {
        assert!(starting_catalog("Turkana").is_ok());
    }

    #[test]
    fn unknown_landscape_rejected() {
        assert!(matches!(
            starting_catalog("olduvai"),
            Err(WorldError::UnknownLandscape(name)) if name == "olduvai"
        ));
    }
}
