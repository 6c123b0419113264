use floorsight::prelude::*;
use floorsight_examples::{init_tracing, render_isovist_to_png, square_room, RenderConfig};
use tracing::{info, warn};

fn main() -> anyhow::Result<()> {
    init_tracing();

    let obstacle = Polygon::from_xy(&[[40.0, 40.0], [60.0, 40.0], [60.0, 60.0], [40.0, 60.0]]);
    let plan = FloorPlan::build(square_room(100.0), vec![obstacle])?;

    // The obstacle casts a wedge-shaped shadow to the north of the viewpoint.
    let isovist = visibility_polygon(&plan, Point::new(50.0, 10.0))?;
    info!(
        "Isovist: {} vertices, area {:.1}, perimeter {:.1}, mean radial distance {:.2}.",
        isovist.len(),
        isovist.area(),
        isovist.perimeter(),
        isovist.mean_radial_distance()
    );

    let near = isovist.clip_to_radius(30.0, 64);
    info!("Visible within 30 units: area {:.1}.", near.area());

    // A viewpoint inside the obstacle is rejected.
    match visibility_polygon(&plan, Point::new(50.0, 50.0)) {
        Ok(_) => warn!("Viewpoint inside the obstacle was accepted."),
        Err(err) => info!("Rejected viewpoint: [{}] {}.", err.kind(), err),
    }

    render_isovist_to_png(
        &plan,
        &isovist,
        &RenderConfig::new((500, 500)).with_highlight([120, 200, 250]),
        "isovist-shadow-wedge.png",
    )?;
    Ok(())
}
