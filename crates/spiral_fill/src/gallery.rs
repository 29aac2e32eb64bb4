//! Pedestal gallery: popular catalog models laid out centre-first on surveyed pedestals.
//!
//! The host fetches model metadata (already sorted by popularity), probes the ground and
//! instantiates assets; this module decides which model goes on which pedestal, where that
//! pedestal is in the world, how large the model should be and which way it faces.
use glam::{Quat, Vec3};
use tracing::info;

use crate::error::{Error, Result};
use crate::fill::events::EventSink;
use crate::fill::planner::{FillConfig, FillPlanner};
use crate::fill::rules::{ExcludeAbove, ExcludeIds, ExclusionRules, Identified};
use crate::fit;
use crate::grid::{survey_ground, CellCoord, GroundProbe, GroundSurvey, PedestalLayout};

/// Models above this triangle count are left out by default.
pub const DEFAULT_MAX_TRIANGLES: u32 = 8000;

/// Fraction of the pedestal width a model may occupy.
pub const DEFAULT_FIT_RATIO: f32 = 0.9;

/// Catalog camera orbit for a model's thumbnail, in radians.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Orbit {
    pub theta: f32,
    pub phi: f32,
}

impl Orbit {
    pub fn new(theta: f32, phi: f32) -> Self {
        Self { theta, phi }
    }

    /// Heading a model should face on its pedestal.
    pub fn rotation(&self) -> Quat {
        fit::orbit_to_rotation(self.theta)
    }
}

/// Catalog metadata for one model.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModelInfo {
    pub id: String,
    pub title: String,
    pub tri_count: u32,
    pub orbit: Orbit,
}

impl ModelInfo {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_tri_count(mut self, tri_count: u32) -> Self {
        self.tri_count = tri_count;
        self
    }

    pub fn with_orbit(mut self, orbit: Orbit) -> Self {
        self.orbit = orbit;
        self
    }
}

impl Identified for ModelInfo {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Configuration for a pedestal gallery.
#[non_exhaustive]
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GalleryConfig {
    /// Where the pedestals stand.
    pub layout: PedestalLayout,
    /// Model ids never shown.
    pub exclude_ids: Vec<String>,
    /// Models with more triangles are left out. `None` disables the limit.
    pub max_triangles: Option<u32>,
    /// Fraction of the pedestal width a model's largest side is scaled to.
    pub fit_ratio: f32,
    /// Fill order and limits.
    pub fill: FillConfig,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            layout: PedestalLayout::default(),
            exclude_ids: Vec::new(),
            max_triangles: Some(DEFAULT_MAX_TRIANGLES),
            fit_ratio: DEFAULT_FIT_RATIO,
            fill: FillConfig::default(),
        }
    }
}

impl GalleryConfig {
    pub fn new(layout: PedestalLayout) -> Self {
        Self {
            layout,
            ..Default::default()
        }
    }

    pub fn with_exclude_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_max_triangles(mut self, max: Option<u32>) -> Self {
        self.max_triangles = max;
        self
    }

    pub fn with_fit_ratio(mut self, ratio: f32) -> Self {
        self.fit_ratio = ratio;
        self
    }

    pub fn with_fill(mut self, fill: FillConfig) -> Self {
        self.fill = fill;
        self
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        self.layout.validate()?;
        self.fill.validate()?;
        if !self.fit_ratio.is_finite() || self.fit_ratio <= 0.0 {
            return Err(Error::InvalidConfig("fit_ratio must be > 0".into()));
        }
        Ok(())
    }

    /// Size a model's largest side is scaled to.
    pub fn target_size(&self) -> f32 {
        self.layout.pedestal_width * self.fit_ratio
    }

    /// How many popular models to request for `usable` pedestals.
    ///
    /// Over-asks by the number of excluded ids so exclusions do not leave pedestals empty.
    pub fn request_limit(&self, usable: usize) -> usize {
        usable + self.exclude_ids.len()
    }

    /// Exclusion rules derived from this configuration.
    pub fn exclusion_rules(&self) -> ExclusionRules<ModelInfo> {
        let mut rules = ExclusionRules::new();
        if !self.exclude_ids.is_empty() {
            rules = rules.with_rule(ExcludeIds::new(self.exclude_ids.iter().cloned()));
        }
        if let Some(max) = self.max_triangles {
            rules = rules.with_rule(ExcludeAbove::new(
                "max_triangles",
                f64::from(max),
                |m: &ModelInfo| f64::from(m.tri_count),
            ));
        }
        rules
    }
}

/// One model placed on one pedestal.
#[derive(Clone, Debug, PartialEq)]
pub struct GallerySlot {
    /// Popularity rank of the model in the input.
    pub rank: usize,
    pub model: ModelInfo,
    pub cell: CellCoord,
    /// Ground-snapped pedestal position.
    pub position: Vec3,
    /// Largest side the model should be scaled to.
    pub target_size: f32,
    /// Heading derived from the model's orbit.
    pub rotation: Quat,
}

impl GallerySlot {
    /// Uniform scale for a model whose bounds have the given extent.
    pub fn scale_for(&self, extent: Vec3) -> f32 {
        fit::scale_to_fit(extent, self.target_size).unwrap_or(1.0)
    }
}

/// Outcome of planning a gallery.
#[non_exhaustive]
#[derive(Clone, Debug, Default)]
pub struct GalleryPlan {
    /// Slots in rank order.
    pub slots: Vec<GallerySlot>,
    pub usable_pedestals: usize,
    pub models_excluded: usize,
    pub models_unplaced: usize,
}

impl GalleryPlan {
    /// Usable pedestals that received no model.
    pub fn empty_pedestals(&self) -> usize {
        self.usable_pedestals.saturating_sub(self.slots.len())
    }
}

/// Plans galleries for one configuration.
#[derive(Debug)]
pub struct GalleryPlanner {
    config: GalleryConfig,
    rules: ExclusionRules<ModelInfo>,
    planner: FillPlanner,
}

impl GalleryPlanner {
    pub fn try_new(config: GalleryConfig) -> Result<Self> {
        config.validate()?;
        let planner = FillPlanner::try_new(config.fill.clone())?;
        Ok(Self {
            rules: config.exclusion_rules(),
            config,
            planner,
        })
    }

    pub fn config(&self) -> &GalleryConfig {
        &self.config
    }

    /// Probes the configured layout.
    pub fn survey<P: GroundProbe + ?Sized>(&self, probe: &P) -> Result<GroundSurvey> {
        survey_ground(&self.config.layout, probe)
    }

    /// Places `models` (most popular first) on the surveyed pedestals.
    pub fn plan<I>(&mut self, survey: &mut GroundSurvey, models: I) -> Result<GalleryPlan>
    where
        I: IntoIterator<Item = ModelInfo>,
    {
        self.plan_with_events(survey, models, &mut ())
    }

    pub fn plan_with_events<I>(
        &mut self,
        survey: &mut GroundSurvey,
        models: I,
        sink: &mut dyn EventSink,
    ) -> Result<GalleryPlan>
    where
        I: IntoIterator<Item = ModelInfo>,
    {
        let layout = &self.config.layout;
        let dims = survey.grid().dims();
        if dims != layout.dims {
            return Err(Error::InvalidConfig(format!(
                "survey grid {dims} does not match layout {}",
                layout.dims
            )));
        }

        let usable_pedestals = survey.grid().usable_count();
        let assignment =
            self.planner
                .plan_with_events(survey.grid_mut(), models, &self.rules, sink);

        let target_size = self.config.target_size();
        let slots: Vec<GallerySlot> = assignment
            .placements
            .into_iter()
            .map(|p| GallerySlot {
                rank: p.rank,
                rotation: p.item.orbit.rotation(),
                position: survey
                    .position(p.cell)
                    .unwrap_or_else(|| layout.cell_position(p.cell)),
                model: p.item,
                cell: p.cell,
                target_size,
            })
            .collect();

        info!(
            "Gallery {}: {} models on {} usable pedestals ({} excluded, {} unplaced).",
            dims,
            slots.len(),
            usable_pedestals,
            assignment.items_excluded,
            assignment.items_unplaced,
        );

        Ok(GalleryPlan {
            slots,
            usable_pedestals,
            models_excluded: assignment.items_excluded,
            models_unplaced: assignment.items_unplaced,
        })
    }
}

/// Surveys `config.layout` with `probe` and places `models` on the result.
pub fn plan_gallery<P, I>(config: GalleryConfig, probe: &P, models: I) -> Result<GalleryPlan>
where
    P: GroundProbe + ?Sized,
    I: IntoIterator<Item = ModelInfo>,
{
    let mut planner = GalleryPlanner::try_new(config)?;
    let mut survey = planner.survey(probe)?;
    planner.plan(&mut survey, models)
}

#[cfg(test)]
mod tests {
    use std::f32::consts::PI;

    use super::*;
    use crate::grid::{FlatGround, GridDims};

    fn models(n: usize) -> Vec<ModelInfo> {
        (0..n)
            .map(|i| ModelInfo::new(format!("m{i}"), format!("Model {i}")).with_tri_count(100))
            .collect()
    }

    fn config_3x3() -> GalleryConfig {
        GalleryConfig::new(PedestalLayout::new(GridDims::new(3, 3), 2.0).with_spacing(1.0))
    }

    #[test]
    fn default_rules_drop_ids_and_heavy_models() {
        let config = config_3x3().with_exclude_ids(["m1"]);
        let rules = config.exclusion_rules();
        assert_eq!(rules.len(), 2);

        let heavy = ModelInfo::new("big", "Big").with_tri_count(DEFAULT_MAX_TRIANGLES + 1);
        let limit = ModelInfo::new("edge", "Edge").with_tri_count(DEFAULT_MAX_TRIANGLES);
        assert!(rules.excludes(&heavy));
        assert!(!rules.excludes(&limit));
        assert_eq!(rules.first_match(&models(2)[1]), Some("exclude_ids"));

        let no_limit = config_3x3().with_max_triangles(None);
        assert!(no_limit.exclusion_rules().is_empty());
    }

    #[test]
    fn request_limit_covers_exclusions() {
        let config = config_3x3().with_exclude_ids(["a", "b", "c"]);
        assert_eq!(config.request_limit(7), 10);
    }

    #[test]
    fn validate_rejects_bad_fit_ratio() {
        assert!(config_3x3().with_fit_ratio(0.0).validate().is_err());
        assert!(GalleryPlanner::try_new(config_3x3().with_fit_ratio(-1.0)).is_err());
        assert!(config_3x3().validate().is_ok());
    }

    #[test]
    fn most_popular_model_lands_on_center_pedestal() {
        let plan = plan_gallery(config_3x3(), &FlatGround::new(0.0), models(4)).unwrap();

        assert_eq!(plan.slots.len(), 4);
        let top = &plan.slots[0];
        assert_eq!(top.model.id, "m0");
        assert_eq!(top.cell, CellCoord::new(1, 1));
        assert_eq!(top.position, Vec3::new(3.0, 0.0, 3.0));
        assert!((top.target_size - 1.8).abs() < 1e-6);
        assert_eq!(plan.empty_pedestals(), 5);
    }

    #[test]
    fn holes_in_the_ground_are_skipped() {
        // Centre pedestal (x = 3, z = 3) has no ground under it.
        let probe = |origin: mint::Vector3<f32>, _radius: f32| {
            let hole = (origin.x - 3.0).abs() < 0.1 && (origin.z - 3.0).abs() < 0.1;
            (!hole).then_some(mint::Vector3 {
                x: origin.x,
                y: -1.0,
                z: origin.z,
            })
        };
        let plan = plan_gallery(config_3x3(), &probe, models(12)).unwrap();

        assert_eq!(plan.usable_pedestals, 8);
        assert_eq!(plan.slots.len(), 8);
        assert_eq!(plan.models_unplaced, 4);
        assert!(plan.slots.iter().all(|s| s.cell != CellCoord::new(1, 1)));
        // Next cell inward-out after the centre is (1, 0).
        assert_eq!(plan.slots[0].cell, CellCoord::new(1, 0));
        assert_eq!(plan.slots[0].position.y, -1.0);
    }

    #[test]
    fn excluded_models_keep_rank_numbers() {
        let config = config_3x3().with_exclude_ids(["m0"]);
        let mut list = models(3);
        list[1].tri_count = 20_000;

        let plan = plan_gallery(config, &FlatGround::new(0.0), list).unwrap();

        assert_eq!(plan.models_excluded, 2);
        assert_eq!(plan.slots.len(), 1);
        assert_eq!(plan.slots[0].rank, 2);
        assert_eq!(plan.slots[0].cell, CellCoord::new(1, 1));
    }

    #[test]
    fn slot_rotation_and_scale_follow_model() {
        let model = ModelInfo::new("fox", "Fox")
            .with_tri_count(10)
            .with_orbit(Orbit::new(PI, 0.3));
        let plan = plan_gallery(config_3x3(), &FlatGround::new(0.0), [model]).unwrap();
        let slot = &plan.slots[0];

        let facing = slot.rotation * Vec3::Z;
        assert!((facing - Vec3::NEG_Z).length() < 1e-5);
        assert!((slot.scale_for(Vec3::new(0.5, 3.6, 0.2)) - 0.5).abs() < 1e-6);
        assert_eq!(slot.scale_for(Vec3::ZERO), 1.0);
    }

    #[test]
    fn mismatched_survey_is_rejected() {
        let mut planner = GalleryPlanner::try_new(config_3x3()).unwrap();
        let other = PedestalLayout::new(GridDims::new(2, 2), 1.0);
        let mut survey = survey_ground(&other, &FlatGround::new(0.0)).unwrap();
        assert!(matches!(
            planner.plan(&mut survey, models(1)),
            Err(Error::InvalidConfig(_))
        ));
    }
}
