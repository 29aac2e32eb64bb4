use spiral_fill::prelude::*;
use spiral_fill_examples::{init_tracing, render_order_to_png, RenderConfig};

fn main() -> anyhow::Result<()> {
    init_tracing();
    let dims = GridDims::new(7, 9);
    let grid = Grid::new(dims);

    // Visit index of every cell, inward spiral and centre-first side by side.
    for (label, order) in [
        ("outside-in", spiral_order(dims)),
        ("center-first", center_first_order(dims)),
    ] {
        println!("{label}:");
        print_order(dims, &order);
        println!();

        let out = format!("spiral-order-basic-{label}.png");
        render_order_to_png(&grid, &order, &RenderConfig::default(), &out)?;
    }

    Ok(())
}

fn print_order(dims: GridDims, order: &[CellCoord]) {
    let mut index = vec![0usize; dims.cell_count()];
    for (i, cell) in order.iter().enumerate() {
        index[cell.row * dims.cols + cell.col] = i;
    }
    for row in index.chunks(dims.cols) {
        let line: Vec<String> = row.iter().map(|i| format!("{i:>3}")).collect();
        println!("{}", line.join(" "));
    }
}
