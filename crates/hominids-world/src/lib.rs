//! Landscape, plant food, and carcasses for the Hominids simulation.
//!
//! This crate models the physical world the agents forage in: a toroidal
//! grid of topography-zoned cells, the per-cell standing crop of every plant
//! species with its logistic growth and seasonal decay, and the stochastic
//! appearance, consumption, and expiry of carcasses.
//!
//! # Modules
//!
//! - [`carcass`] -- [`Carcass`] records and the [`CarcassLifecycle`] registry
//!   that spawns, indexes, feeds from, and expires them.
//! - [`error`] -- Error types for world construction.
//! - [`food`] -- [`PlantResourceField`], the per-cell standing crop.
//! - [`grid`] -- [`Grid`] and [`Cell`]: wrapped geometry and cell storage.
//! - [`landscape`] -- [`Landscape`], the topography contract consumed from
//!   landscape loaders.
//! - [`plants`] -- [`PlantSpecies`] parameters and the immutable [`PlantCatalog`].
//! - [`starting_world`] -- Built-in river landscape and the `voi` / `turkana`
//!   plant catalogs.
//!
//! [`Carcass`]: carcass::Carcass
//! [`CarcassLifecycle`]: carcass::CarcassLifecycle
//! [`PlantResourceField`]: food::PlantResourceField
//! [`Grid`]: grid::Grid
//! [`Cell`]: grid::Cell
//! [`Landscape`]: landscape::Landscape
//! [`PlantSpecies`]: plants::PlantSpecies
//! [`PlantCatalog`]: plants::PlantCatalog

pub mod carcass;
pub mod error;
pub mod food;
pub mod grid;
pub mod landscape;
pub mod plants;
pub mod starting_world;

// Re-export primary types at crate root.
pub use carcass::{
    Carcass, CarcassConfig, CarcassDayReport, CarcassLifecycle, CarcassTotals, ExpiryPolicy,
    ZoneCarcassOdds,
};
pub use error::WorldError;
pub use food::{FoodEntry, PlantResourceField};
pub use grid::{Cell, Grid};
pub use landscape::Landscape;
pub use plants::{PlantCatalog, PlantSpecies};
pub use starting_world::{river_landscape, starting_catalog};
