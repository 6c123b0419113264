use floorsight::prelude::*;
use floorsight_examples::{init_tracing, render_isovist_to_png, square_room, RenderConfig};
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_tracing();

    // With no obstacles the isovist is the room itself.
    let plan = FloorPlan::build(square_room(100.0), Vec::new())?;
    let isovist = visibility_polygon(&plan, Point::new(50.0, 50.0))?;

    info!(
        "Isovist: {} vertices, area {:.1} of {:.1}.",
        isovist.len(),
        isovist.area(),
        plan.boundary().area()
    );
    for v in isovist.vertices() {
        info!("  ({:.3}, {:.3})", v.x, v.y);
    }

    render_isovist_to_png(
        &plan,
        &isovist,
        &RenderConfig::new((500, 500)),
        "isovist-empty-room.png",
    )?;
    Ok(())
}
