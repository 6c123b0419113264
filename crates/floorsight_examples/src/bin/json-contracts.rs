use floorsight::api::{handle_heatmap_json, handle_visibility_json};
use floorsight::prelude::*;
use floorsight_examples::init_tracing;
use serde_json::json;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let boundary = json!({ "points": [[0, 0], [100, 0], [100, 100], [0, 100]] });
    let obstacle = json!({ "points": [[40, 40], [60, 40], [60, 60], [40, 60]] });

    let visibility = json!({
        "viewpoint": { "x": 50.0, "y": 10.0 },
        "obstacles": [boundary, obstacle],
    });
    println!("{}", handle_visibility_json(&visibility.to_string())?);

    let inside = json!({
        "viewpoint": { "x": 50.0, "y": 50.0 },
        "obstacles": [boundary, obstacle],
    });
    println!("{}", handle_visibility_json(&inside.to_string())?);

    let heatmap = json!({
        "obstacles": [boundary, obstacle],
        "spacing": 20.0,
        "aggregation": "max",
        "features": [{
            "obstacleIndex": 1,
            "visibilityValue": 0.9,
            "detailVisibilityValue": 0.4,
            "feature1Contrast": 0.8,
            "feature1SpatialFreq": 0.1,
            "feature2Contrast": 0.5,
            "feature2SpatialFreq": 1.0
        }],
    });
    println!("{}", handle_heatmap_json(&heatmap.to_string(), &CancelToken::new())?);
    Ok(())
}
