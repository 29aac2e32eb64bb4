#![forbid(unsafe_code)]
//! spiral_fill: Spiral-order grid planning that fills ranked items onto usable cells.
//!
//! Modules:
//! - grid: planning grid, spiral visit orders, pedestal layout and ground survey
//! - fill: exclusion rules, ranked assignment walk, planner, events
//! - gallery: catalog models placed centre-first on surveyed pedestals
//! - fit: scale-to-fit, orbit heading and pivot helpers
//!
//! For examples, see the `spiral_fill_examples` crate.
pub mod error;
pub mod fill;
pub mod fit;
pub mod gallery;
pub mod grid;

/// Convenient re-exports for common types. Import with `use spiral_fill::prelude::*;`.
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::fill::events::{
        EventSink, FillEvent, FillEventKind, FnSink, MultiSink, SkipReason, VecSink,
    };
    pub use crate::fill::{
        assign_ranked_items, assign_ranked_items_with_events, Assignment, ExcludeAbove,
        ExcludeIds, ExclusionRule, ExclusionRules, FillConfig, FillPlanner, FnRule, Identified,
        Placement,
    };
    pub use crate::fit::{bottom_center_pivot, orbit_to_rotation, scale_to_fit, MIN_FIT_EXTENT};
    pub use crate::gallery::{
        plan_gallery, GalleryConfig, GalleryPlan, GalleryPlanner, GallerySlot, ModelInfo, Orbit,
    };
    pub use crate::grid::{
        center_first_order, spiral_order, survey_ground, CellCoord, FillOrder, FlatGround, Grid,
        GridDims, GroundProbe, GroundSurvey, PedestalLayout, SpiralOrderCache,
    };
}
