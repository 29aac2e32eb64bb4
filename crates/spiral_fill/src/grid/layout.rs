//! World-space pedestal layout and the ground survey that derives cell usability.
//!
//! A [`PedestalLayout`] spaces square pedestals evenly on the XZ plane: row `i` steps
//! along +X and column `j` along +Z, each by `pedestal_width + spacing`.
//! [`survey_ground`] probes straight down from every pedestal with a [`GroundProbe`]
//! supplied by the host; pedestals that find ground are snapped onto it, the rest are
//! marked unusable.
use glam::Vec3;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::grid::{CellCoord, Grid, GridDims};

/// Fraction of the pedestal width used as the probe sphere radius.
pub const PROBE_RADIUS_FRACTION: f32 = 0.25;

/// Downward ground probe implemented by the host (physics engine, heightfield, ...).
pub trait GroundProbe {
    /// Sweeps a sphere of `radius` downward from `origin`.
    ///
    /// Returns the hit point when ground was hit, `None` on a miss or a hit on anything
    /// that is not ground.
    fn probe_down(&self, origin: mint::Vector3<f32>, radius: f32) -> Option<mint::Vector3<f32>>;
}

impl<F> GroundProbe for F
where
    F: Fn(mint::Vector3<f32>, f32) -> Option<mint::Vector3<f32>>,
{
    fn probe_down(&self, origin: mint::Vector3<f32>, radius: f32) -> Option<mint::Vector3<f32>> {
        self(origin, radius)
    }
}

/// Infinite flat ground at a fixed height.
#[derive(Clone, Copy, Debug, Default)]
pub struct FlatGround {
    pub height: f32,
}

impl FlatGround {
    pub fn new(height: f32) -> Self {
        Self { height }
    }
}

impl GroundProbe for FlatGround {
    fn probe_down(&self, origin: mint::Vector3<f32>, _radius: f32) -> Option<mint::Vector3<f32>> {
        (origin.y >= self.height).then_some(mint::Vector3 {
            x: origin.x,
            y: self.height,
            z: origin.z,
        })
    }
}

/// Evenly spaced pedestals on the XZ plane.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PedestalLayout {
    /// Grid dimensions (rows along X, columns along Z).
    pub dims: GridDims,
    /// World position of pedestal (0, 0).
    pub origin: Vec3,
    /// Footprint width of one pedestal.
    pub pedestal_width: f32,
    /// Gap between neighbouring pedestals.
    pub spacing: f32,
}

impl Default for PedestalLayout {
    fn default() -> Self {
        Self {
            dims: GridDims::new(5, 5),
            origin: Vec3::ZERO,
            pedestal_width: 1.0,
            spacing: 0.5,
        }
    }
}

impl PedestalLayout {
    pub fn new(dims: GridDims, pedestal_width: f32) -> Self {
        Self {
            dims,
            pedestal_width,
            ..Default::default()
        }
    }

    pub fn with_origin(mut self, origin: Vec3) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_spacing(mut self, spacing: f32) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.pedestal_width.is_finite() || self.pedestal_width <= 0.0 {
            return Err(Error::InvalidConfig("pedestal_width must be > 0".into()));
        }
        if !self.spacing.is_finite() || self.spacing < 0.0 {
            return Err(Error::InvalidConfig("spacing must be >= 0".into()));
        }
        if !self.origin.is_finite() {
            return Err(Error::InvalidConfig("origin must be finite".into()));
        }
        Ok(())
    }

    /// Distance between the origins of neighbouring pedestals.
    pub fn pitch(&self) -> f32 {
        self.pedestal_width + self.spacing
    }

    pub fn probe_radius(&self) -> f32 {
        self.pedestal_width * PROBE_RADIUS_FRACTION
    }

    /// Unsnapped world position of a pedestal.
    pub fn cell_position(&self, cell: CellCoord) -> Vec3 {
        let pitch = self.pitch();
        self.origin + Vec3::new(pitch * cell.row as f32, 0.0, pitch * cell.col as f32)
    }
}

/// Outcome of probing every pedestal of a layout.
#[derive(Clone, Debug)]
pub struct GroundSurvey {
    grid: Grid,
    positions: Vec<Vec3>,
}

impl GroundSurvey {
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    /// Snapped pedestal position, or `None` for cells that found no ground.
    pub fn position(&self, cell: CellCoord) -> Option<Vec3> {
        self.grid
            .is_usable(cell)
            .then(|| self.positions[self.grid.dims().index_of(cell)])
    }

    pub fn into_grid(self) -> Grid {
        self.grid
    }
}

/// Probes every pedestal of `layout` and builds the usability grid.
pub fn survey_ground<P: GroundProbe + ?Sized>(
    layout: &PedestalLayout,
    probe: &P,
) -> Result<GroundSurvey> {
    layout.validate()?;

    let dims = layout.dims;
    let radius = layout.probe_radius();
    let mut grid = Grid::new(dims);
    let mut positions = Vec::with_capacity(dims.cell_count());

    for row in 0..dims.rows {
        for col in 0..dims.cols {
            let cell = CellCoord::new(row, col);
            let start = layout.cell_position(cell);
            match probe.probe_down(start.into(), radius) {
                Some(hit) => positions.push(Vec3::from(hit)),
                None => {
                    debug!("Pedestal {} found no ground; marking unusable.", cell);
                    grid.set_usable(cell, false)?;
                    positions.push(start);
                }
            }
        }
    }

    info!(
        "Ground survey {}: {} of {} pedestals usable.",
        dims,
        grid.usable_count(),
        dims.cell_count()
    );

    Ok(GroundSurvey { grid, positions })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout_3x3() -> PedestalLayout {
        PedestalLayout::new(GridDims::new(3, 3), 2.0)
            .with_spacing(1.0)
            .with_origin(Vec3::new(10.0, 5.0, -4.0))
    }

    #[test]
    fn cell_positions_step_by_pitch() {
        let layout = layout_3x3();
        assert_eq!(layout.pitch(), 3.0);
        assert_eq!(
            layout.cell_position(CellCoord::new(0, 0)),
            Vec3::new(10.0, 5.0, -4.0)
        );
        assert_eq!(
            layout.cell_position(CellCoord::new(2, 1)),
            Vec3::new(16.0, 5.0, -1.0)
        );
    }

    #[test]
    fn validate_rejects_bad_geometry() {
        assert!(PedestalLayout::new(GridDims::new(1, 1), 0.0)
            .validate()
            .is_err());
        assert!(PedestalLayout::new(GridDims::new(1, 1), 1.0)
            .with_spacing(-0.1)
            .validate()
            .is_err());
        assert!(PedestalLayout::new(GridDims::new(1, 1), f32::NAN)
            .validate()
            .is_err());
        assert!(layout_3x3().validate().is_ok());
    }

    #[test]
    fn flat_ground_snaps_every_pedestal() {
        let survey = survey_ground(&layout_3x3(), &FlatGround::new(1.0)).unwrap();
        assert_eq!(survey.grid().usable_count(), 9);
        assert_eq!(
            survey.position(CellCoord::new(1, 1)),
            Some(Vec3::new(13.0, 1.0, -1.0))
        );
    }

    #[test]
    fn misses_mark_cells_unusable() {
        // Ground only exists for x < 14, so row 2 (x = 16) misses.
        let probe = |origin: mint::Vector3<f32>, _radius: f32| {
            (origin.x < 14.0).then_some(mint::Vector3 {
                x: origin.x,
                y: 0.0,
                z: origin.z,
            })
        };
        let survey = survey_ground(&layout_3x3(), &probe).unwrap();
        assert_eq!(survey.grid().usable_count(), 6);
        assert!(!survey.grid().is_usable(CellCoord::new(2, 0)));
        assert_eq!(survey.position(CellCoord::new(2, 0)), None);
        assert_eq!(
            survey.position(CellCoord::new(0, 2)),
            Some(Vec3::new(10.0, 0.0, 2.0))
        );
    }

    #[test]
    fn probe_uses_quarter_pedestal_radius() {
        let probe = |_origin: mint::Vector3<f32>, radius: f32| -> Option<mint::Vector3<f32>> {
            assert_eq!(radius, 0.5);
            None
        };
        let survey = survey_ground(&layout_3x3(), &probe).unwrap();
        assert_eq!(survey.grid().usable_count(), 0);
    }

    #[test]
    fn invalid_layout_is_rejected_before_probing() {
        let probe = |_origin: mint::Vector3<f32>, _radius: f32| -> Option<mint::Vector3<f32>> {
            panic!("probe must not run");
        };
        let layout = PedestalLayout::new(GridDims::new(2, 2), -1.0);
        assert!(matches!(
            survey_ground(&layout, &probe),
            Err(Error::InvalidConfig(_))
        ));
    }
}
