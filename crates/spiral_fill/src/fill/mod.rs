//! Filling a grid with ranked items: exclusion rules, the assignment walk, events and the planner.
pub mod assign;
pub mod events;
pub mod planner;
pub mod rules;

pub use assign::{assign_ranked_items, assign_ranked_items_with_events, Assignment, Placement};
pub use planner::{FillConfig, FillPlanner};
pub use rules::{ExcludeAbove, ExcludeIds, ExclusionRule, ExclusionRules, FnRule, Identified};
