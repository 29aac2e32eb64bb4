//! Planning grid: fixed-size rows × columns of cells with usability and occupancy flags.
//!
//! This module defines [`GridDims`], [`CellCoord`] and [`Grid`]. Usability is decided once
//! before planning (for example by [`layout::survey_ground`]); occupancy is the only state
//! that changes while items are assigned.
use std::fmt;

use crate::error::{Error, Result};

pub mod layout;
pub mod spiral;

pub use layout::{survey_ground, FlatGround, GroundProbe, GroundSurvey, PedestalLayout};
pub use spiral::{center_first_order, fill_order, spiral_order, FillOrder, SpiralOrderCache};

/// Grid dimensions in cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridDims {
    /// Number of rows.
    pub rows: usize,
    /// Number of columns.
    pub cols: usize,
}

impl GridDims {
    pub const fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Total number of cells.
    pub const fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    pub const fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.row < self.rows && cell.col < self.cols
    }

    /// Row-major index of a cell. The caller guarantees the cell is in bounds.
    #[inline]
    pub(crate) const fn index_of(&self, cell: CellCoord) -> usize {
        cell.row * self.cols + cell.col
    }
}

impl fmt::Display for GridDims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// Identity of a single cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellCoord {
    pub row: usize,
    pub col: usize,
}

impl CellCoord {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl From<(usize, usize)> for CellCoord {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// A fixed-shape grid of cells. All cells start usable and unoccupied.
#[derive(Clone, Debug)]
pub struct Grid {
    dims: GridDims,
    usable: Vec<bool>,
    occupied: Vec<bool>,
}

impl Grid {
    /// Creates a grid where every cell is usable.
    pub fn new(dims: GridDims) -> Self {
        let n = dims.cell_count();
        Self {
            dims,
            usable: vec![true; n],
            occupied: vec![false; n],
        }
    }

    /// Creates a grid from row-major usability rows.
    ///
    /// Every row must have the same length. An empty slice yields a 0x0 grid.
    pub fn from_mask<R: AsRef<[bool]>>(rows: &[R]) -> Result<Self> {
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        let mut usable = Vec::with_capacity(rows.len() * cols);
        for (row, r) in rows.iter().enumerate() {
            let r = r.as_ref();
            if r.len() != cols {
                return Err(Error::RaggedMask {
                    row,
                    expected: cols,
                    found: r.len(),
                });
            }
            usable.extend_from_slice(r);
        }

        let dims = GridDims::new(rows.len(), cols);
        Ok(Self {
            dims,
            occupied: vec![false; usable.len()],
            usable,
        })
    }

    pub fn dims(&self) -> GridDims {
        self.dims
    }

    /// Evaluates `predicate` once per cell and stores the result as the cell's usability.
    pub fn apply_usability<F>(&mut self, mut predicate: F)
    where
        F: FnMut(CellCoord) -> bool,
    {
        let dims = self.dims;
        for row in 0..dims.rows {
            for col in 0..dims.cols {
                let cell = CellCoord::new(row, col);
                self.usable[dims.index_of(cell)] = predicate(cell);
            }
        }
    }

    pub fn set_usable(&mut self, cell: CellCoord, usable: bool) -> Result<()> {
        let idx = self.checked_index(cell)?;
        self.usable[idx] = usable;
        Ok(())
    }

    /// Out-of-bounds cells are reported as unusable.
    pub fn is_usable(&self, cell: CellCoord) -> bool {
        self.dims.contains(cell) && self.usable[self.dims.index_of(cell)]
    }

    /// Out-of-bounds cells are reported as unoccupied.
    pub fn is_occupied(&self, cell: CellCoord) -> bool {
        self.dims.contains(cell) && self.occupied[self.dims.index_of(cell)]
    }

    /// A cell is available when it is usable and not yet occupied.
    pub fn is_available(&self, cell: CellCoord) -> bool {
        self.dims.contains(cell) && {
            let idx = self.dims.index_of(cell);
            self.usable[idx] && !self.occupied[idx]
        }
    }

    /// Marks a cell occupied. Returns `false` if it already was.
    pub fn mark_occupied(&mut self, cell: CellCoord) -> Result<bool> {
        let idx = self.checked_index(cell)?;
        let was = std::mem::replace(&mut self.occupied[idx], true);
        Ok(!was)
    }

    /// Marks an in-bounds cell occupied without bounds reporting.
    #[inline]
    pub(crate) fn occupy(&mut self, cell: CellCoord) {
        let idx = self.dims.index_of(cell);
        self.occupied[idx] = true;
    }

    /// Resets every occupancy flag. Usability is kept.
    pub fn clear_occupancy(&mut self) {
        self.occupied.fill(false);
    }

    pub fn usable_count(&self) -> usize {
        self.usable.iter().filter(|u| **u).count()
    }

    pub fn available_count(&self) -> usize {
        self.usable
            .iter()
            .zip(&self.occupied)
            .filter(|(u, o)| **u && !**o)
            .count()
    }

    /// Iterates all cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> {
        let cols = self.dims.cols;
        (0..self.dims.rows)
            .flat_map(move |row| (0..cols).map(move |col| CellCoord::new(row, col)))
    }

    fn checked_index(&self, cell: CellCoord) -> Result<usize> {
        if self.dims.contains(cell) {
            Ok(self.dims.index_of(cell))
        } else {
            Err(Error::CellOutOfBounds {
                cell,
                dims: self.dims,
            })
        }
    }
}
