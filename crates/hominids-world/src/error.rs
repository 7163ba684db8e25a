//! Error types for the `hominids-world` crate.
//!
//! World construction validates its inputs up front; once a [`Grid`],
//! [`PlantCatalog`], or [`CarcassLifecycle`] exists, the per-tick operations
//! clamp instead of failing.
//!
//! [`Grid`]: crate::grid::Grid
//! [`PlantCatalog`]: crate::plants::PlantCatalog
//! [`CarcassLifecycle`]: crate::carcass::CarcassLifecycle

use hominids_types::{CarcassId, PlantSpeciesId, Position};

/// Errors that can occur while building or editing the world.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// Grid dimensions must both be positive.
    #[error("invalid grid dimensions {width}x{height}")]
    InvalidDimensions {
        /// Requested width.
        width: i32,
        /// Requested height.
        height: i32,
    },

    /// The number of zone labels does not match the grid area.
    #[error("landscape has {actual} zone labels, expected {expected}")]
    ZoneCountMismatch {
        /// Width times height.
        expected: usize,
        /// Labels supplied.
        actual: usize,
    },

    /// A landscape row has a different length from the first row.
    #[error("landscape row {row} has {actual} cells, expected {expected}")]
    RaggedLandscape {
        /// Zero-based row.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of this row.
        actual: usize,
    },

    /// A topography label is not one of `C`, `F`, `U`.
    #[error("unknown zone label {label:?} at row {row}, column {column}")]
    UnknownZoneLabel {
        /// The offending character.
        label: char,
        /// Zero-based row.
        row: usize,
        /// Zero-based column.
        column: usize,
    },

    /// No built-in catalog exists for the named landscape.
    #[error("unknown landscape: {0}")]
    UnknownLandscape(String),

    /// Two catalog entries share the same species id.
    #[error("duplicate plant species id: {0}")]
    DuplicateSpecies(PlantSpeciesId),

    /// A plant species has an out-of-range parameter.
    #[error("invalid plant species {id}: {reason}")]
    InvalidSpecies {
        /// The species.
        id: PlantSpeciesId,
        /// What is wrong with it.
        reason: String,
    },

    /// Carcass appearance or size parameters are out of range.
    #[error("invalid carcass configuration: {reason}")]
    InvalidCarcassConfig {
        /// What is wrong with it.
        reason: String,
    },

    /// A position does not address a cell of the grid.
    #[error("position {0} is outside the grid")]
    OutOfBounds(Position),

    /// A cell already holds a carcass.
    #[error("cell {position} already holds carcass {carcass}")]
    CellOccupied {
        /// The cell.
        position: Position,
        /// The carcass already there.
        carcass: CarcassId,
    },
}
