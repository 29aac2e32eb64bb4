#![forbid(unsafe_code)]

mod rendering;

pub use rendering::{init_tracing, render_gallery_to_png, render_order_to_png, RenderConfig};
