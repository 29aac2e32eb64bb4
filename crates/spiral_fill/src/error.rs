//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias.
//! Variants cover invalid configuration, malformed usability masks, visit orders that
//! leave the grid, and generic errors. Running out of cells or items is never an error.
use thiserror::Error;

use crate::grid::{CellCoord, GridDims};

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("ragged usability mask: row {row} has {found} cells, expected {expected}")]
    RaggedMask {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("cell {cell} is outside a {dims} grid")]
    CellOutOfBounds { cell: CellCoord, dims: GridDims },

    #[error("{0}")]
    Other(String),
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Error::Other(value)
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Error::Other(value.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_string_uses_other_variant() {
        let err: Error = String::from("boom").into();
        matches!(err, Error::Other(_))
            .then_some(())
            .expect("expected Other variant");
    }

    #[test]
    fn out_of_bounds_message_names_cell_and_grid() {
        let err = Error::CellOutOfBounds {
            cell: CellCoord::new(4, 1),
            dims: GridDims::new(3, 3),
        };
        assert_eq!(err.to_string(), "cell (4, 1) is outside a 3x3 grid");
    }

    #[test]
    fn ragged_mask_message_reports_lengths() {
        let err = Error::RaggedMask {
            row: 2,
            expected: 4,
            found: 3,
        };
        assert_eq!(
            err.to_string(),
            "ragged usability mask: row 2 has 3 cells, expected 4"
        );
    }
}
