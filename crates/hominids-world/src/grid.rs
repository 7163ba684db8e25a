//! Toroidal grid geometry and cell storage.
//!
//! The [`Grid`] exclusively owns its cells, stored row-major so that
//! iterating [`Grid::cells`] visits `(0,0), (1,0), ..., (width-1, height-1)`.
//! All coordinates wrap: every position handed out by the grid lies in
//! `[0, width) x [0, height)`, and distances use the shortest way around.

use std::collections::BTreeSet;

use hominids_types::{CarcassId, PlantSpeciesId, Position, Season, Zone};

use crate::error::WorldError;
use crate::food::PlantResourceField;
use crate::landscape::Landscape;
use crate::plants::PlantCatalog;

/// One grid cell: fixed topography, its standing plant crop, and the id of
/// the carcass lying on it, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    position: Position,
    zone: Zone,
    food: PlantResourceField,
    carcass: Option<CarcassId>,
}

impl Cell {
    /// Wrapped position of the cell.
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Topography zone, fixed at landscape load.
    pub const fn zone(&self) -> Zone {
        self.zone
    }

    /// Standing plant food.
    pub const fn food(&self) -> &PlantResourceField {
        &self.food
    }

    /// Mutable standing plant food, for consumption.
    pub const fn food_mut(&mut self) -> &mut PlantResourceField {
        &mut self.food
    }

    /// The carcass indexed at this cell.
    pub const fn carcass(&self) -> Option<CarcassId> {
        self.carcass
    }

    pub(crate) const fn set_carcass(&mut self, carcass: Option<CarcassId>) {
        self.carcass = carcass;
    }
}

/// A toroidal 2D grid of [`Cell`]s.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    width: i32,
    height: i32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Build the grid for `landscape`, seeding every cell's plant field at
    /// `initial_fraction` of capacity.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::ZoneCountMismatch`] if the landscape does not
    /// provide exactly one zone per cell.
    pub fn new(
        landscape: &Landscape,
        catalog: &PlantCatalog,
        initial_fraction: f64,
    ) -> Result<Self, WorldError> {
        let width = landscape.width();
        let height = landscape.height();
        let mut cells = Vec::with_capacity(landscape.zones().len());
        for y in 0..height {
            for x in 0..width {
                let zone = landscape
                    .zone_at(x, y)
                    .ok_or(WorldError::ZoneCountMismatch {
                        expected: landscape.area(),
                        actual: landscape.zones().len(),
                    })?;
                cells.push(Cell {
                    position: Position::new(x, y),
                    zone,
                    food: PlantResourceField::new(zone, catalog, initial_fraction),
                    carcass: None,
                });
            }
        }
        tracing::debug!(
            landscape = landscape.name(),
            width,
            height,
            species = catalog.len(),
            "grid built"
        );
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Number of columns.
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Number of rows.
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Wrap arbitrary coordinates onto the torus.
    pub const fn normalize(&self, x: i32, y: i32) -> Position {
        Position::new(x.rem_euclid(self.width), y.rem_euclid(self.height))
    }

    /// Per-axis signed minimal displacement from `from` to `to`.
    ///
    /// Each component lies within `[-extent/2, extent/2]`.
    pub const fn wrapped_delta(&self, from: Position, to: Position) -> (i32, i32) {
        (
            wrap_axis(to.x.saturating_sub(from.x), self.width),
            wrap_axis(to.y.saturating_sub(from.y), self.height),
        )
    }

    /// Wrapped Manhattan distance; used for detection, earshot, nesting, and
    /// cooperation checks.
    pub const fn manhattan_distance(&self, a: Position, b: Position) -> u32 {
        let (dx, dy) = self.wrapped_delta(a, b);
        dx.unsigned_abs().saturating_add(dy.unsigned_abs())
    }

    /// Wrapped Euclidean distance; used to rank food candidates by travel
    /// cost.
    pub fn euclidean_distance(&self, a: Position, b: Position) -> f64 {
        let (dx, dy) = self.wrapped_delta(a, b);
        f64::from(dx).hypot(f64::from(dy))
    }

    /// The Moore neighbourhood of `center`, row by row from the top-left.
    ///
    /// On grids narrower than three cells the wrapped neighbours coincide;
    /// each distinct cell is returned once.
    pub fn moore_neighborhood(&self, center: Position, include_center: bool) -> Vec<Position> {
        let mut seen = BTreeSet::new();
        let mut out = Vec::with_capacity(9);
        for dy in -1..=1 {
            for dx in -1..=1 {
                if !include_center && dx == 0 && dy == 0 {
                    continue;
                }
                let p = self.normalize(center.x.saturating_add(dx), center.y.saturating_add(dy));
                if (include_center || p != center) && seen.insert(p) {
                    out.push(p);
                }
            }
        }
        out
    }

    /// Every distinct cell within Manhattan `radius` of `center`, nearest
    /// first, ties in row-major order.
    pub fn positions_within(&self, center: Position, radius: u32) -> Vec<Position> {
        let reach = i32::try_from(radius).unwrap_or(i32::MAX);
        let reach_x = reach.min(self.width.saturating_div(2));
        let reach_y = reach.min(self.height.saturating_div(2));
        let mut seen = BTreeSet::new();
        for dy in -reach_y..=reach_y {
            for dx in -reach_x..=reach_x {
                let p = self.normalize(center.x.saturating_add(dx), center.y.saturating_add(dy));
                if self.manhattan_distance(center, p) <= radius {
                    seen.insert(p);
                }
            }
        }
        let mut out: Vec<Position> = seen.into_iter().collect();
        out.sort_by_key(|p| (self.manhattan_distance(center, *p), p.y, p.x));
        out
    }

    /// One step from `from` toward `to`: each axis moves by the sign of its
    /// wrapped delta, so the step is diagonal while both axes differ.
    pub const fn step_toward(&self, from: Position, to: Position) -> Position {
        let (dx, dy) = self.wrapped_delta(from, to);
        self.normalize(
            from.x.saturating_add(dx.signum()),
            from.y.saturating_add(dy.signum()),
        )
    }

    /// Row-major index of an in-bounds position.
    pub fn index_of(&self, position: Position) -> Option<usize> {
        if position.x < 0 || position.x >= self.width || position.y < 0 || position.y >= self.height
        {
            return None;
        }
        let flat = position.y.checked_mul(self.width)?.checked_add(position.x)?;
        usize::try_from(flat).ok()
    }

    /// The cell at `position`, if in bounds.
    pub fn cell(&self, position: Position) -> Option<&Cell> {
        self.index_of(position).and_then(|i| self.cells.get(i))
    }

    /// Mutable cell at `position`, if in bounds.
    pub fn cell_mut(&mut self, position: Position) -> Option<&mut Cell> {
        self.index_of(position).and_then(|i| self.cells.get_mut(i))
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// All cells in row-major order, mutably.
    pub fn cells_mut(&mut self) -> impl Iterator<Item = &mut Cell> {
        self.cells.iter_mut()
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the grid has no cells. Never true for a constructed grid.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Remove up to `grams` of `species` from the cell at `position`.
    pub fn consume_plant(&mut self, position: Position, species: PlantSpeciesId, grams: f64) -> f64 {
        self.cell_mut(position)
            .map_or(0.0, |cell| cell.food.consume(species, grams))
    }

    /// Run the daily plant update over every cell.
    pub fn daily_plant_update(&mut self, season: Season, catalog: &PlantCatalog, reseed_fraction: f64) {
        for cell in &mut self.cells {
            cell.food.daily_update(season, catalog, reseed_fraction);
        }
    }

    /// Grams of plant food standing across the whole grid.
    pub fn standing_plant_grams(&self) -> f64 {
        self.cells.iter().map(|c| c.food.standing_grams()).sum()
    }

    /// Grams of plant food eaten across the whole grid.
    pub fn consumed_plant_grams(&self) -> f64 {
        self.cells.iter().map(|c| c.food.consumed_grams()).sum()
    }
}

const fn wrap_axis(raw: i32, extent: i32) -> i32 {
    let d = raw.rem_euclid(extent);
    if d.saturating_mul(2) > extent {
        d.saturating_sub(extent)
    } else {
        d
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::plants::PlantSpecies;

    fn grid(width: i32, height: i32) -> Grid {
        let landscape = Landscape::uniform("test", width, height, Zone::Flooded).unwrap();
        let fig = PlantSpecies::new(PlantSpeciesId(1), "fig").with_uniform_density(1.0);
        let catalog = PlantCatalog::new("test", vec![fig], 0.0).unwrap();
        Grid::new(&landscape, &catalog, 0.5).unwrap()
    }

    #[test]
    fn cells_are_row_major() {
        let g = grid(4, 3);
        let positions: Vec<Position> = g.cells().map(Cell::position).take(5).collect();
        assert_eq!(
            positions,
            vec![
                Position::new(0, 0),
                Position::new(1, 0),
                Position::new(2, 0),
                Position::new(3, 0),
                Position::new(0, 1),
            ]
        );
        assert_eq!(g.len(), 12);
    }

    #[test]
    fn normalize_wraps_negative_and_overflowing() {
        let g = grid(81, 101);
        assert_eq!(g.normalize(-1, -1), Position::new(80, 100));
        assert_eq!(g.normalize(81, 202), Position::new(0, 0));
    }

    #[test]
    fn wrapped_delta_takes_short_way() {
        let g = grid(81, 101);
        assert_eq!(
            g.wrapped_delta(Position::new(0, 0), Position::new(80, 100)),
            (-1, -1)
        );
        assert_eq!(
            g.wrapped_delta(Position::new(0, 0), Position::new(40, 50)),
            (40, 50)
        );
        assert_eq!(
            g.wrapped_delta(Position::new(0, 0), Position::new(41, 51)),
            (-40, -50)
        );
    }

    #[test]
    fn distances_wrap() {
        let g = grid(81, 101);
        let a = Position::new(1, 1);
        let b = Position::new(79, 99);
        assert_eq!(g.manhattan_distance(a, b), 6);
        assert!((g.euclidean_distance(a, b) - 18.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn moore_neighborhood_wraps_at_corner() {
        let g = grid(81, 101);
        let around = g.moore_neighborhood(Position::new(0, 0), true);
        assert_eq!(around.len(), 9);
        assert_eq!(around.first(), Some(&Position::new(80, 100)));
        assert!(around.contains(&Position::new(0, 0)));
        assert!(around.contains(&Position::new(1, 1)));

        let ring = g.moore_neighborhood(Position::new(0, 0), false);
        assert_eq!(ring.len(), 8);
        assert!(!ring.contains(&Position::new(0, 0)));
    }

    #[test]
    fn moore_neighborhood_deduplicates_on_tiny_grid() {
        let g = grid(2, 1);
        let around = g.moore_neighborhood(Position::new(0, 0), true);
        assert_eq!(around, vec![Position::new(1, 0), Position::new(0, 0)]);
    }

    #[test]
    fn positions_within_is_a_diamond() {
        let g = grid(81, 101);
        let cells = g.positions_within(Position::new(0, 0), 2);
        assert_eq!(cells.len(), 13);
        assert_eq!(cells.first(), Some(&Position::new(0, 0)));
        assert!(cells.contains(&Position::new(79, 0)));
        assert!(!cells.contains(&Position::new(1, 2)));
    }

    #[test]
    fn step_toward_moves_diagonally_then_straight() {
        let g = grid(81, 101);
        let target = Position::new(3, 1);
        let first = g.step_toward(Position::new(0, 0), target);
        assert_eq!(first, Position::new(1, 1));
        let second = g.step_toward(first, target);
        assert_eq!(second, Position::new(2, 1));
        assert_eq!(g.step_toward(target, target), target);
    }

    #[test]
    fn step_toward_crosses_the_seam() {
        let g = grid(81, 101);
        assert_eq!(
            g.step_toward(Position::new(0, 0), Position::new(78, 0)),
            Position::new(80, 0)
        );
    }

    #[test]
    fn out_of_bounds_lookup_is_none() {
        let g = grid(5, 5);
        assert!(g.cell(Position::new(5, 0)).is_none());
        assert!(g.cell(Position::new(-1, 0)).is_none());
        assert!(g.cell(Position::new(4, 4)).is_some());
    }

    #[test]
    fn consume_plant_reduces_standing_crop() {
        let mut g = grid(3, 3);
        let before = g.standing_plant_grams();
        let taken = g.consume_plant(Position::new(1, 1), PlantSpeciesId(1), 100.0);
        assert!((taken - 100.0).abs() < 1e-9);
        assert!((before - g.standing_plant_grams() - 100.0).abs() < 1e-9);
        assert!((g.consumed_plant_grams() - 100.0).abs() < 1e-9);
    }
}
