use glam::Vec3;
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use spiral_fill::prelude::*;
use spiral_fill_examples::{init_tracing, render_gallery_to_png, RenderConfig};

fn main() -> anyhow::Result<()> {
    init_tracing();
    let mut rng = StdRng::seed_from_u64(7);

    let layout = PedestalLayout::new(GridDims::new(9, 12), 1.0).with_spacing(0.5);

    // Rolling terrain with a few round pits the probe falls through.
    let pits: Vec<Vec3> = (0..5)
        .map(|_| {
            Vec3::new(
                rng.random::<f32>() * 12.0,
                0.0,
                rng.random::<f32>() * 17.0,
            )
        })
        .collect();
    let terrain = Terrain { pits, pit_radius: 1.6 };

    let config = GalleryConfig::new(layout)
        .with_fill(FillConfig::new(FillOrder::CenterFirst).with_max_placements(60));
    let mut planner = GalleryPlanner::try_new(config)?;
    let mut survey = planner.survey(&terrain)?;

    let models: Vec<ModelInfo> = (0..150)
        .map(|i| {
            ModelInfo::new(format!("m{i}"), format!("Model {i}"))
                .with_tri_count((rng.random::<f32>() * 10_000.0) as u32)
        })
        .collect();

    let mut skipped = 0usize;
    let mut sink = FnSink::new(|event| {
        if let FillEvent::CellSkipped { .. } = event {
            skipped += 1;
        }
    });
    let plan = planner.plan_with_events(&mut survey, models, &mut sink)?;

    println!(
        "usable pedestals {} | placed {} | excluded {} | unplaced {} | cells skipped {}",
        plan.usable_pedestals,
        plan.slots.len(),
        plan.models_excluded,
        plan.models_unplaced,
        skipped
    );

    render_gallery_to_png(
        survey.grid(),
        &plan,
        &RenderConfig::default().with_cell_px(32),
        "gallery-ground-holes.png",
    )?;

    Ok(())
}

struct Terrain {
    pits: Vec<Vec3>,
    pit_radius: f32,
}

impl GroundProbe for Terrain {
    fn probe_down(&self, origin: mint::Vector3<f32>, radius: f32) -> Option<mint::Vector3<f32>> {
        let p = Vec3::from(origin);
        let flat = Vec3::new(p.x, 0.0, p.z);
        let in_pit = self
            .pits
            .iter()
            .any(|c| c.distance(flat) + radius < self.pit_radius);
        if in_pit {
            return None;
        }
        let height = 0.3 * (p.x * 0.4).sin() + 0.2 * (p.z * 0.3).cos();
        Some(Vec3::new(p.x, height, p.z).into())
    }
}
