use floorsight::prelude::*;
use floorsight_examples::{init_tracing, pillar_hall, render_heatmap_to_png, RenderConfig};
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let plan = pillar_hall(200.0, 3, 16.0)?;
    let mut scene = Scene::new(plan.clone());

    // A bold sign on the first pillar and fine print on the center pillar.
    scene.set_feature(Feature::anchored_to(&plan, 1)?.with_components(
        FrequencyComponent::new(0.9, 0.05),
        FrequencyComponent::new(0.6, 0.2),
    ))?;
    scene.set_feature(
        Feature::anchored_to(&plan, 5)?
            .with_size(4.0)
            .with_detail_visibility_value(0.9)
            .with_components(
                FrequencyComponent::new(0.5, 0.5),
                FrequencyComponent::new(0.3, 2.0),
            ),
    )?;

    let snapshot = scene.snapshot();
    for aggregation in [AggregationPolicy::Max, AggregationPolicy::ProbabilisticUnion] {
        let config = HeatmapConfig::new(2.0).with_aggregation(aggregation);
        let grid = snapshot.heatmap(&config, &CancelToken::new())?;
        let stats = grid.stats();
        info!(
            "{}: {} x {} cells, {} scored, {} invalid, peak {:.3}.",
            aggregation.as_str(),
            grid.cols(),
            grid.rows(),
            stats.sampled,
            stats.invalid,
            grid.max_score().unwrap_or(0.0)
        );
        render_heatmap_to_png(
            &plan,
            &grid,
            &RenderConfig::new((800, 800)),
            format!("heatmap-pillar-hall-{}.png", aggregation.as_str()),
        )?;
    }
    Ok(())
}
