//! Spiral traversal of a grid.
//!
//! [`spiral_order`] walks clockwise from the top-left corner, turning whenever the next
//! step would leave the grid or revisit a cell. [`center_first_order`] is the same walk
//! reversed, so it starts in the innermost cell and winds outward.
//!
//! Orders depend only on [`GridDims`], which makes them cacheable: see [`SpiralOrderCache`].
use std::collections::HashMap;

use crate::grid::{CellCoord, GridDims};

/// Row/column deltas for right, down, left, up.
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

/// Which end of the spiral a fill starts from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FillOrder {
    /// Reversed spiral: innermost cell first.
    #[default]
    CenterFirst,
    /// Plain spiral: top-left corner first, winding inward.
    OutsideIn,
}

/// Returns every cell of a `dims` grid exactly once in clockwise spiral order from (0, 0).
pub fn spiral_order(dims: GridDims) -> Vec<CellCoord> {
    let total = dims.cell_count();
    let mut order = Vec::with_capacity(total);
    if total == 0 {
        return order;
    }

    let mut seen = vec![false; total];
    let (mut row, mut col) = (0usize, 0usize);
    let mut dir = 0usize;

    for _ in 0..total {
        let cell = CellCoord::new(row, col);
        order.push(cell);
        seen[dims.index_of(cell)] = true;

        if let Some(next) = step(dims, row, col, dir).filter(|n| !seen[dims.index_of(*n)]) {
            row = next.row;
            col = next.col;
            continue;
        }

        dir = (dir + 1) % DIRECTIONS.len();
        match step(dims, row, col, dir) {
            Some(next) => {
                row = next.row;
                col = next.col;
            }
            // Only reachable after the last cell has been pushed.
            None => break,
        }
    }

    order
}

/// The spiral reversed: innermost cell first, outer boundary last.
pub fn center_first_order(dims: GridDims) -> Vec<CellCoord> {
    let mut order = spiral_order(dims);
    order.reverse();
    order
}

/// Computes the visit order for `dims` in the given direction.
pub fn fill_order(dims: GridDims, order: FillOrder) -> Vec<CellCoord> {
    match order {
        FillOrder::CenterFirst => center_first_order(dims),
        FillOrder::OutsideIn => spiral_order(dims),
    }
}

#[inline]
fn step(dims: GridDims, row: usize, col: usize, dir: usize) -> Option<CellCoord> {
    let (dr, dc) = DIRECTIONS[dir];
    let r = row.checked_add_signed(dr)?;
    let c = col.checked_add_signed(dc)?;
    let next = CellCoord::new(r, c);
    dims.contains(next).then_some(next)
}

/// Cache of visit orders keyed by grid dimensions and fill direction.
#[derive(Debug, Default)]
pub struct SpiralOrderCache {
    entries: HashMap<(GridDims, FillOrder), Vec<CellCoord>>,
}

impl SpiralOrderCache {
    /// Creates a new, empty cache.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Gets the cached order for `dims`, computing and storing it on first use.
    pub fn get_or_compute(&mut self, dims: GridDims, order: FillOrder) -> &[CellCoord] {
        self.entries
            .entry((dims, order))
            .or_insert_with(|| fill_order(dims, order))
    }

    /// Gets a cached order without computing it.
    pub fn get(&self, dims: GridDims, order: FillOrder) -> Option<&[CellCoord]> {
        self.entries.get(&(dims, order)).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Clears all entries from the cache.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
