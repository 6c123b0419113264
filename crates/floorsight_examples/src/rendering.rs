//! Demo floor plans, tracing setup and PNG rendering of isovists and heatmaps.
use std::path::Path;

use floorsight::prelude::*;
use glam::DVec2;
use image::{Rgb, RgbImage};
use tracing_subscriber::EnvFilter;

/// Install a formatting subscriber filtered by `RUST_LOG` (default `info`).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Square room of side `size` with the origin at a corner.
pub fn square_room(size: f64) -> Polygon {
    Polygon::from_xy(&[[0.0, 0.0], [size, 0.0], [size, size], [0.0, size]])
}

/// `size` x `size` room with a lattice of square pillars.
pub fn pillar_hall(size: f64, per_side: usize, pillar: f64) -> anyhow::Result<FloorPlan> {
    let pitch = size / (per_side as f64 + 1.0);
    let half = pillar * 0.5;
    let mut pillars = Vec::with_capacity(per_side * per_side);
    for i in 1..=per_side {
        for j in 1..=per_side {
            let c = DVec2::new(i as f64, j as f64) * pitch;
            pillars.push(Polygon::from_xy(&[
                [c.x - half, c.y - half],
                [c.x + half, c.y - half],
                [c.x + half, c.y + half],
                [c.x - half, c.y + half],
            ]));
        }
    }
    Ok(FloorPlan::build(square_room(size), pillars)?)
}

#[derive(Clone, Debug)]
pub struct RenderConfig {
    pub image_size: (u32, u32),
    pub background: [u8; 3],
    pub obstacle: [u8; 3],
    pub highlight: [u8; 3],
    pub invalid: [u8; 3],
}

impl RenderConfig {
    pub fn new(image_size: (u32, u32)) -> Self {
        Self {
            image_size,
            background: [245, 245, 245],
            obstacle: [30, 30, 30],
            highlight: [250, 200, 60],
            invalid: [120, 120, 120],
        }
    }

    pub fn with_background(mut self, background: [u8; 3]) -> Self {
        self.background = background;
        self
    }

    pub fn with_highlight(mut self, highlight: [u8; 3]) -> Self {
        self.highlight = highlight;
        self
    }
}

/// Maps pixel centers into floor-plan coordinates; image row 0 is the top (maximum y).
struct PixelMapper {
    min: DVec2,
    scale: DVec2,
    height: u32,
}

impl PixelMapper {
    fn new(bounds: Aabb, (width, height): (u32, u32)) -> Self {
        Self {
            min: bounds.min,
            scale: bounds.extent() / DVec2::new(width as f64, height as f64),
            height,
        }
    }

    fn world(&self, x: u32, y: u32) -> Point {
        let flipped = (self.height - 1 - y) as f64;
        self.min + DVec2::new(x as f64 + 0.5, flipped + 0.5) * self.scale
    }
}

fn paint_plan(img: &mut RgbImage, plan: &FloorPlan, mapper: &PixelMapper, rc: &RenderConfig) {
    for (x, y, px) in img.enumerate_pixels_mut() {
        let p = mapper.world(x, y);
        if !matches!(plan.classify(p), Location::Free) {
            *px = Rgb(rc.obstacle);
        }
    }
}

/// Render the plan with the isovist filled in `highlight` and the viewpoint marked.
pub fn render_isovist_to_png(
    plan: &FloorPlan,
    isovist: &VisibilityPolygon,
    rc: &RenderConfig,
    out_path: impl AsRef<Path>,
) -> anyhow::Result<()> {
    let (width, height) = rc.image_size;
    let mut img = RgbImage::from_pixel(width, height, Rgb(rc.background));
    let mapper = PixelMapper::new(plan.bounds(), rc.image_size);

    for (x, y, px) in img.enumerate_pixels_mut() {
        if isovist.contains(mapper.world(x, y)) {
            *px = Rgb(rc.highlight);
        }
    }
    paint_plan(&mut img, plan, &mapper, rc);

    let marker = mapper.scale.max_element() * 4.0;
    for (x, y, px) in img.enumerate_pixels_mut() {
        if mapper.world(x, y).distance(isovist.viewpoint()) <= marker {
            *px = Rgb([200, 30, 30]);
        }
    }

    img.save(out_path.as_ref())?;
    Ok(())
}

/// Render heatmap scores with a dark-to-highlight ramp; invalid and unsampled cells are grey.
pub fn render_heatmap_to_png(
    plan: &FloorPlan,
    grid: &HeatmapGrid,
    rc: &RenderConfig,
    out_path: impl AsRef<Path>,
) -> anyhow::Result<()> {
    let (width, height) = rc.image_size;
    let mut img = RgbImage::from_pixel(width, height, Rgb(rc.background));
    let mapper = PixelMapper::new(plan.bounds(), rc.image_size);
    let low = [20.0, 30.0, 90.0];

    for (x, y, px) in img.enumerate_pixels_mut() {
        let color = match grid
            .cell_at(mapper.world(x, y))
            .and_then(|(col, row)| grid.get(col, row))
        {
            Some(CellScore::Score(s)) => std::array::from_fn(|i| {
                (low[i] + (rc.highlight[i] as f64 - low[i]) * s).round() as u8
            }),
            Some(CellScore::Invalid) | Some(CellScore::Unsampled) => rc.invalid,
            None => rc.background,
        };
        *px = Rgb(color);
    }
    paint_plan(&mut img, plan, &mapper, rc);

    img.save(out_path.as_ref())?;
    Ok(())
}
