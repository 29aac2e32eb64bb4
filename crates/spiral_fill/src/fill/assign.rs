//! Ranked assignment of items to grid cells along a visit order.
//!
//! Items arrive sorted by descending priority. Excluded items are dropped without
//! consuming a cell; every other item takes the next cell of the order that is usable
//! and not yet occupied. The walk over the order is bounded by its length, so running
//! out of cells simply leaves the remaining items unplaced.
use tracing::debug;

use crate::error::{Error, Result};
use crate::fill::events::{EventSink, FillEvent, FillEventKind, SkipReason};
use crate::fill::rules::ExclusionRules;
use crate::grid::{CellCoord, Grid};

/// An item assigned to a cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement<T> {
    /// Position of the item in the ranked input, before exclusion.
    pub rank: usize,
    pub item: T,
    pub cell: CellCoord,
}

/// Result of one fill run.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct Assignment<T> {
    /// Placements in rank order.
    pub placements: Vec<Placement<T>>,
    /// Items read from the input.
    pub items_considered: usize,
    /// Items dropped by an exclusion rule.
    pub items_excluded: usize,
    /// Items that were eligible but found no free cell.
    pub items_unplaced: usize,
    /// Cells of the order passed over because they were unusable or occupied.
    pub cells_skipped: usize,
}

impl<T> Assignment<T> {
    pub fn new() -> Self {
        Self {
            placements: Vec::new(),
            items_considered: 0,
            items_excluded: 0,
            items_unplaced: 0,
            cells_skipped: 0,
        }
    }

    /// Number of placed items.
    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Whether every non-excluded item found a cell.
    pub fn is_complete(&self) -> bool {
        self.items_unplaced == 0
    }

    /// Cell given to the item of the given input rank.
    pub fn cell_of(&self, rank: usize) -> Option<CellCoord> {
        self.placements
            .iter()
            .find(|p| p.rank == rank)
            .map(|p| p.cell)
    }

    /// Item placed in `cell`, if any.
    pub fn item_at(&self, cell: CellCoord) -> Option<&T> {
        self.placements
            .iter()
            .find(|p| p.cell == cell)
            .map(|p| &p.item)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Placement<T>> {
        self.placements.iter()
    }
}

impl<T> Default for Assignment<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> IntoIterator for Assignment<T> {
    type Item = Placement<T>;
    type IntoIter = std::vec::IntoIter<Placement<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.placements.into_iter()
    }
}

/// Assigns ranked `items` to the cells of `order`, skipping unusable and occupied cells.
///
/// Every cell of `order` must lie inside `grid`; otherwise nothing is mutated and
/// [`Error::CellOutOfBounds`] is returned.
pub fn assign_ranked_items<T, I>(
    order: &[CellCoord],
    items: I,
    grid: &mut Grid,
    exclusions: &ExclusionRules<T>,
) -> Result<Assignment<T>>
where
    I: IntoIterator<Item = T>,
{
    assign_ranked_items_with_events(order, items, grid, exclusions, &mut ())
}

/// Like [`assign_ranked_items`], reporting progress to `sink`.
pub fn assign_ranked_items_with_events<T, I>(
    order: &[CellCoord],
    items: I,
    grid: &mut Grid,
    exclusions: &ExclusionRules<T>,
    sink: &mut dyn EventSink,
) -> Result<Assignment<T>>
where
    I: IntoIterator<Item = T>,
{
    let dims = grid.dims();
    if let Some(cell) = order.iter().copied().find(|c| !dims.contains(*c)) {
        return Err(Error::CellOutOfBounds { cell, dims });
    }
    Ok(fill_cells(order, items, grid, exclusions, None, sink))
}

/// Walks an order already known to lie inside `grid`.
///
/// At most `limit` items are placed when set; the rest count as unplaced.
pub(crate) fn fill_cells<T, I>(
    order: &[CellCoord],
    items: I,
    grid: &mut Grid,
    exclusions: &ExclusionRules<T>,
    limit: Option<usize>,
    sink: &mut dyn EventSink,
) -> Assignment<T>
where
    I: IntoIterator<Item = T>,
{
    if sink.wants(FillEventKind::RunStarted) {
        sink.send(FillEvent::RunStarted {
            dims: grid.dims(),
            order_len: order.len(),
            available: grid.available_count(),
        });
    }

    let limit = limit.unwrap_or(usize::MAX);
    let mut cells = order.iter().copied();
    let mut cells_exhausted = false;
    let mut out = Assignment::new();

    for (rank, item) in items.into_iter().enumerate() {
        out.items_considered += 1;

        if let Some(rule) = exclusions.first_match(&item) {
            debug!("Item {} excluded by '{}'.", rank, rule);
            out.items_excluded += 1;
            if sink.wants(FillEventKind::ItemExcluded) {
                sink.send(FillEvent::ItemExcluded {
                    rank,
                    rule: rule.to_owned(),
                });
            }
            continue;
        }

        let cell = if cells_exhausted || out.placements.len() >= limit {
            None
        } else {
            next_available(&mut cells, grid, &mut out.cells_skipped, sink)
        };

        match cell {
            Some(cell) => {
                grid.occupy(cell);
                if sink.wants(FillEventKind::ItemPlaced) {
                    sink.send(FillEvent::ItemPlaced { rank, cell });
                }
                out.placements.push(Placement { rank, item, cell });
            }
            None => {
                cells_exhausted = true;
                out.items_unplaced += 1;
                if sink.wants(FillEventKind::ItemUnplaced) {
                    sink.send(FillEvent::ItemUnplaced { rank });
                }
            }
        }
    }

    if sink.wants(FillEventKind::RunFinished) {
        sink.send(FillEvent::RunFinished {
            placed: out.placements.len(),
            excluded: out.items_excluded,
            unplaced: out.items_unplaced,
        });
    }

    out
}

fn next_available(
    cells: &mut impl Iterator<Item = CellCoord>,
    grid: &Grid,
    skipped: &mut usize,
    sink: &mut dyn EventSink,
) -> Option<CellCoord> {
    for cell in cells.by_ref() {
        if grid.is_available(cell) {
            return Some(cell);
        }
        *skipped += 1;
        if sink.wants(FillEventKind::CellSkipped) {
            let reason = if grid.is_usable(cell) {
                SkipReason::Occupied
            } else {
                SkipReason::Unusable
            };
            sink.send(FillEvent::CellSkipped { cell, reason });
        }
    }
    None
}
