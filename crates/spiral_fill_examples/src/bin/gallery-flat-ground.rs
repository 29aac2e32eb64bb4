use std::f32::consts::TAU;

use glam::Vec3;
use spiral_fill::prelude::*;
use spiral_fill_examples::{init_tracing, render_gallery_to_png, RenderConfig};

fn main() -> anyhow::Result<()> {
    init_tracing();

    // 6x6 pedestals, 1.2 wide, 0.4 apart, standing on flat ground at y = 0.
    let layout = PedestalLayout::new(GridDims::new(6, 6), 1.2)
        .with_spacing(0.4)
        .with_origin(Vec3::new(0.0, 2.0, 0.0));
    let config = GalleryConfig::new(layout).with_exclude_ids(["m3", "m11"]);

    let mut planner = GalleryPlanner::try_new(config)?;
    let mut survey = planner.survey(&FlatGround::new(0.0))?;

    // Ask the catalog for enough models that exclusions still fill every pedestal.
    let limit = planner.config().request_limit(survey.grid().usable_count());
    let models = popular_models(limit + 8);

    let plan = planner.plan(&mut survey, models)?;
    for slot in plan.slots.iter().take(5) {
        println!(
            "#{:<2} {:<6} cell {} at {:?} yaw {:.2}",
            slot.rank,
            slot.model.id,
            slot.cell,
            slot.position,
            slot.rotation.to_euler(glam::EulerRot::YXZ).0
        );
    }
    println!(
        "placed {} | excluded {} | unplaced {} | empty pedestals {}",
        plan.slots.len(),
        plan.models_excluded,
        plan.models_unplaced,
        plan.empty_pedestals()
    );

    render_gallery_to_png(
        survey.grid(),
        &plan,
        &RenderConfig::default(),
        "gallery-flat-ground.png",
    )?;

    Ok(())
}

/// Synthetic "most popular first" list; every fifth model is too detailed to show.
fn popular_models(n: usize) -> Vec<ModelInfo> {
    (0..n)
        .map(|i| {
            let tris = if i % 5 == 4 { 25_000 } else { 500 + 150 * i as u32 };
            ModelInfo::new(format!("m{i}"), format!("Animal {i}"))
                .with_tri_count(tris)
                .with_orbit(Orbit::new(TAU * i as f32 / n as f32, 0.4))
        })
        .collect()
}
