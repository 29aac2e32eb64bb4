//! High-level planner that fills grids with ranked items along cached spiral orders.
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::fill::assign::{fill_cells, Assignment};
use crate::fill::events::{EventSink, FillEvent, FillEventKind};
use crate::fill::rules::ExclusionRules;
use crate::grid::{FillOrder, Grid, SpiralOrderCache};

/// Configuration for fill runs.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FillConfig {
    /// Which end of the spiral receives the highest-ranked item.
    pub order: FillOrder,
    /// Clear occupancy before each run instead of keeping earlier placements.
    pub reset_occupancy: bool,
    /// Upper bound on placements per run.
    pub max_placements: Option<usize>,
}

impl Default for FillConfig {
    fn default() -> Self {
        Self {
            order: FillOrder::CenterFirst,
            reset_occupancy: false,
            max_placements: None,
        }
    }
}

impl FillConfig {
    pub fn new(order: FillOrder) -> Self {
        Self {
            order,
            ..Default::default()
        }
    }

    /// Sets the fill order.
    pub fn with_order(mut self, order: FillOrder) -> Self {
        self.order = order;
        self
    }

    /// Sets whether occupancy is cleared at the start of each run.
    pub fn with_reset_occupancy(mut self, reset: bool) -> Self {
        self.reset_occupancy = reset;
        self
    }

    /// Caps the number of placements per run.
    pub fn with_max_placements(mut self, max: usize) -> Self {
        self.max_placements = Some(max);
        self
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.max_placements == Some(0) {
            return Err(Error::InvalidConfig(
                "max_placements must be > 0 when set".into(),
            ));
        }
        Ok(())
    }
}

/// Fills grids with ranked items. Visit orders are computed once per grid size.
#[derive(Debug, Default)]
pub struct FillPlanner {
    /// Configuration applied to every run.
    pub config: FillConfig,
    cache: SpiralOrderCache,
}

impl FillPlanner {
    pub fn try_new(config: FillConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            cache: SpiralOrderCache::new(),
        })
    }

    pub fn new(config: FillConfig) -> Self {
        debug_assert!(
            config.max_placements != Some(0),
            "max_placements must be > 0 when set"
        );
        Self {
            config,
            cache: SpiralOrderCache::new(),
        }
    }

    /// Cached visit orders.
    pub fn cache(&self) -> &SpiralOrderCache {
        &self.cache
    }

    /// Assigns `items` (highest rank first) to `grid`.
    pub fn plan<T, I>(
        &mut self,
        grid: &mut Grid,
        items: I,
        exclusions: &ExclusionRules<T>,
    ) -> Assignment<T>
    where
        I: IntoIterator<Item = T>,
    {
        self.plan_with_events(grid, items, exclusions, &mut ())
    }

    pub fn plan_with_events<T, I>(
        &mut self,
        grid: &mut Grid,
        items: I,
        exclusions: &ExclusionRules<T>,
        sink: &mut dyn EventSink,
    ) -> Assignment<T>
    where
        I: IntoIterator<Item = T>,
    {
        let dims = grid.dims();
        if self.config.reset_occupancy {
            grid.clear_occupancy();
        }

        let available = grid.available_count();
        if available == 0 {
            warn!("Grid {} has no available cells; nothing will be placed.", dims);
            if sink.wants(FillEventKind::Warning) {
                sink.send(FillEvent::Warning {
                    context: format!("grid:{dims}"),
                    message: "Grid has no available cells".into(),
                });
            }
        }

        let order = self.cache.get_or_compute(dims, self.config.order);
        let result = fill_cells(
            order,
            items,
            grid,
            exclusions,
            self.config.max_placements,
            sink,
        );

        info!(
            "Filled grid {} ({:?}) | placed: {} excluded: {} unplaced: {}.",
            dims,
            self.config.order,
            result.len(),
            result.items_excluded,
            result.items_unplaced,
        );

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fill::events::VecSink;
    use crate::fill::rules::ExcludeIds;
    use crate::grid::{CellCoord, GridDims};

    fn items(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("item{i}")).collect()
    }

    #[test]
    fn config_validation_rejects_zero_cap() {
        assert!(FillConfig::default().validate().is_ok());
        let cfg = FillConfig::default().with_max_placements(0);
        assert!(matches!(
            FillPlanner::try_new(cfg),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn center_first_puts_top_item_in_the_middle() {
        let mut planner = FillPlanner::try_new(FillConfig::default()).unwrap();
        let mut grid = Grid::new(GridDims::new(3, 3));

        let result = planner.plan(&mut grid, items(9), &ExclusionRules::new());

        assert_eq!(result.cell_of(0), Some(CellCoord::new(1, 1)));
        assert_eq!(result.cell_of(8), Some(CellCoord::new(0, 0)));
        assert_eq!(grid.available_count(), 0);
    }

    #[test]
    fn outside_in_starts_at_the_corner() {
        let mut planner = FillPlanner::new(FillConfig::new(FillOrder::OutsideIn));
        let mut grid = Grid::new(GridDims::new(3, 3));

        let result = planner.plan(&mut grid, items(2), &ExclusionRules::new());

        assert_eq!(result.cell_of(0), Some(CellCoord::new(0, 0)));
        assert_eq!(result.cell_of(1), Some(CellCoord::new(0, 1)));
    }

    #[test]
    fn later_runs_keep_earlier_placements_unless_reset() {
        let mut planner = FillPlanner::new(FillConfig::default());
        let mut grid = Grid::new(GridDims::new(2, 2));

        let first = planner.plan(&mut grid, items(3), &ExclusionRules::new());
        let second = planner.plan(&mut grid, items(3), &ExclusionRules::new());
        assert_eq!(first.len(), 3);
        assert_eq!(second.len(), 1);
        assert_eq!(second.cell_of(0), Some(CellCoord::new(0, 0)));
        assert_eq!(planner.cache().len(), 1);

        planner.config = planner.config.clone().with_reset_occupancy(true);
        let third = planner.plan(&mut grid, items(3), &ExclusionRules::new());
        assert_eq!(third.len(), 3);
    }

    #[test]
    fn max_placements_caps_the_run() {
        let mut planner =
            FillPlanner::try_new(FillConfig::default().with_max_placements(2)).unwrap();
        let mut grid = Grid::new(GridDims::new(3, 3));
        let rules = ExclusionRules::new().with_rule(ExcludeIds::new(["item0"]));

        let result = planner.plan(&mut grid, items(5), &rules);

        assert_eq!(result.len(), 2);
        assert_eq!(result.items_excluded, 1);
        assert_eq!(result.items_unplaced, 2);
        assert_eq!(result.cell_of(1), Some(CellCoord::new(1, 1)));
    }

    #[test]
    fn full_grid_emits_warning() {
        let mut planner = FillPlanner::new(FillConfig::default());
        let mut grid = Grid::new(GridDims::new(0, 4));
        let mut sink = VecSink::only([FillEventKind::Warning]);

        let result =
            planner.plan_with_events(&mut grid, items(2), &ExclusionRules::new(), &mut sink);

        assert!(result.is_empty());
        assert_eq!(result.items_unplaced, 2);
        assert_eq!(sink.len(), 1);
    }
}
