//! Topography supplied by landscape loaders.
//!
//! A [`Landscape`] is the contract between whatever reads a topography file
//! and the [`Grid`](crate::grid::Grid): a name, dimensions, and exactly one
//! [`Zone`] per cell in row-major order.

use hominids_types::Zone;

use crate::error::WorldError;

/// Named, validated zone labels for a rectangular grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Landscape {
    name: String,
    width: i32,
    height: i32,
    zones: Vec<Zone>,
}

impl Landscape {
    /// Wrap a row-major zone list.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidDimensions`] for non-positive dimensions
    /// and [`WorldError::ZoneCountMismatch`] if `zones` does not cover the
    /// grid exactly.
    pub fn new(
        name: impl Into<String>,
        width: i32,
        height: i32,
        zones: Vec<Zone>,
    ) -> Result<Self, WorldError> {
        let expected = area(width, height)?;
        if zones.len() != expected {
            return Err(WorldError::ZoneCountMismatch {
                expected,
                actual: zones.len(),
            });
        }
        Ok(Self {
            name: name.into(),
            width,
            height,
            zones,
        })
    }

    /// A landscape with every cell in the same zone.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidDimensions`] for non-positive dimensions.
    pub fn uniform(
        name: impl Into<String>,
        width: i32,
        height: i32,
        zone: Zone,
    ) -> Result<Self, WorldError> {
        let count = area(width, height)?;
        Self::new(name, width, height, vec![zone; count])
    }

    /// Parse rows of `C`/`F`/`U` labels, top row first.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnknownZoneLabel`] for any other character,
    /// [`WorldError::RaggedLandscape`] if rows differ in length, and
    /// [`WorldError::InvalidDimensions`] if there are no rows or columns.
    pub fn from_rows<S: AsRef<str>>(name: impl Into<String>, rows: &[S]) -> Result<Self, WorldError> {
        let mut zones = Vec::new();
        let mut expected = None;
        for (row, line) in rows.iter().enumerate() {
            let line = line.as_ref().trim();
            let mut count = 0_usize;
            for (column, label) in line.chars().enumerate() {
                let zone = Zone::from_label(label).ok_or(WorldError::UnknownZoneLabel {
                    label,
                    row,
                    column,
                })?;
                zones.push(zone);
                count = count.saturating_add(1);
            }
            match expected {
                None => expected = Some(count),
                Some(first) if first != count => {
                    return Err(WorldError::RaggedLandscape {
                        row,
                        expected: first,
                        actual: count,
                    });
                }
                Some(_) => {}
            }
        }
        let width = i32::try_from(expected.unwrap_or(0)).unwrap_or(i32::MAX);
        let height = i32::try_from(rows.len()).unwrap_or(i32::MAX);
        Self::new(name, width, height, zones)
    }

    /// Landscape name, used to select the plant catalog.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of columns.
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Number of rows.
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Number of cells.
    pub const fn area(&self) -> usize {
        self.zones.len()
    }

    /// Row-major zone labels.
    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    /// Zone of the in-bounds cell `(x, y)`.
    pub fn zone_at(&self, x: i32, y: i32) -> Option<Zone> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        let index = usize::try_from(y.checked_mul(self.width)?.checked_add(x)?).ok()?;
        self.zones.get(index).copied()
    }

    /// Number of cells in each zone, ordered as [`Zone::ALL`].
    pub fn zone_counts(&self) -> [usize; 3] {
        let mut counts = [0_usize; 3];
        for zone in &self.zones {
            let slot = match zone {
                Zone::Channel => counts.get_mut(0),
                Zone::Flooded => counts.get_mut(1),
                Zone::Unflooded => counts.get_mut(2),
            };
            if let Some(count) = slot {
                *count = count.saturating_add(1);
            }
        }
        counts
    }
}

fn area(width: i32, height: i32) -> Result<usize, WorldError> {
    let invalid = WorldError::InvalidDimensions { width, height };
    if width <= 0 || height <= 0 {
        return Err(invalid);
    }
    usize::try_from(width)
        .ok()
        .zip(usize::try_from(height).ok())
        .and_then(|(w, h)| w.checked_mul(h))
        .ok_or(invalid)
}
