#![forbid(unsafe_code)]

mod rendering;

pub use rendering::{
    init_tracing, pillar_hall, render_heatmap_to_png, render_isovist_to_png, square_room,
    RenderConfig,
};
