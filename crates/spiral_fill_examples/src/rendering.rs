//! PNG rendering of planned grids and a tracing setup shared by the example binaries.
use anyhow::Context;
use image::{Rgb, RgbImage};
use spiral_fill::prelude::{CellCoord, GalleryPlan, Grid};
use tracing_subscriber::EnvFilter;

/// Installs a compact `fmt` subscriber. `RUST_LOG` overrides the default `info` level.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

/// Colours and sizes for grid images.
#[derive(Clone, Debug)]
pub struct RenderConfig {
    /// Edge length of one cell in pixels.
    pub cell_px: u32,
    /// Gap between cells in pixels.
    pub gap_px: u32,
    pub background: [u8; 3],
    /// Cells that found no ground.
    pub unusable: [u8; 3],
    /// Usable cells left empty.
    pub empty: [u8; 3],
    /// Colour of rank 0.
    pub first: [u8; 3],
    /// Colour of the last rank.
    pub last: [u8; 3],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            cell_px: 48,
            gap_px: 6,
            background: [245, 245, 248],
            unusable: [60, 60, 66],
            empty: [210, 210, 218],
            first: [230, 70, 40],
            last: [40, 110, 230],
        }
    }
}

impl RenderConfig {
    pub fn with_cell_px(mut self, cell_px: u32) -> Self {
        self.cell_px = cell_px;
        self
    }

    pub fn with_background(mut self, background: [u8; 3]) -> Self {
        self.background = background;
        self
    }

    fn rank_color(&self, rank: usize, count: usize) -> [u8; 3] {
        let t = if count <= 1 {
            0.0
        } else {
            rank as f32 / (count - 1) as f32
        };
        let mut out = [0u8; 3];
        for (i, c) in out.iter_mut().enumerate() {
            let a = self.first[i] as f32;
            let b = self.last[i] as f32;
            *c = (a + (b - a) * t).round() as u8;
        }
        out
    }
}

/// Draws a gallery plan: slots coloured by popularity, holes dark, empty pedestals light.
pub fn render_gallery_to_png(
    grid: &Grid,
    plan: &GalleryPlan,
    rc: &RenderConfig,
    out_path: &str,
) -> anyhow::Result<()> {
    let ranked: Vec<(CellCoord, usize)> = plan
        .slots
        .iter()
        .enumerate()
        .map(|(i, s)| (s.cell, i))
        .collect();
    render_cells(grid, &ranked, rc, out_path)
}

/// Draws a visit order: cell `i` of `order` gets the `i`-th gradient colour.
pub fn render_order_to_png(
    grid: &Grid,
    order: &[CellCoord],
    rc: &RenderConfig,
    out_path: &str,
) -> anyhow::Result<()> {
    let ranked: Vec<(CellCoord, usize)> = order.iter().copied().zip(0..).collect();
    render_cells(grid, &ranked, rc, out_path)
}

fn render_cells(
    grid: &Grid,
    ranked: &[(CellCoord, usize)],
    rc: &RenderConfig,
    out_path: &str,
) -> anyhow::Result<()> {
    let dims = grid.dims();
    anyhow::ensure!(rc.cell_px > 0, "cell_px must be > 0");
    anyhow::ensure!(!dims.is_empty(), "cannot render an empty {dims} grid");

    let pitch = rc.cell_px + rc.gap_px;
    let width = dims.cols as u32 * pitch + rc.gap_px;
    let height = dims.rows as u32 * pitch + rc.gap_px;
    let mut img = RgbImage::from_pixel(width, height, Rgb(rc.background));

    for cell in grid.cells() {
        let color = if grid.is_usable(cell) {
            rc.empty
        } else {
            rc.unusable
        };
        fill_cell(&mut img, cell, pitch, rc, color);
    }

    for &(cell, rank) in ranked {
        fill_cell(&mut img, cell, pitch, rc, rc.rank_color(rank, ranked.len()));
    }

    img.save(out_path)
        .with_context(|| format!("failed to write {out_path}"))?;
    tracing::info!("Wrote {} ({}x{} px).", out_path, width, height);
    Ok(())
}

fn fill_cell(img: &mut RgbImage, cell: CellCoord, pitch: u32, rc: &RenderConfig, color: [u8; 3]) {
    // Row 0 is drawn at the top, column 0 at the left.
    let x0 = rc.gap_px + cell.col as u32 * pitch;
    let y0 = rc.gap_px + cell.row as u32 * pitch;
    for y in y0..y0 + rc.cell_px {
        for x in x0..x0 + rc.cell_px {
            img.put_pixel(x, y, Rgb(color));
        }
    }
}
