//! JSON request and response contracts for the visibility and heatmap queries.
//!
//! Requests carry the raw polygon collection (`obstacles[0]` is the boundary). Responses are
//! tagged by `status`: `"success"` with a `data` payload, or `"error"` with a `message` and the
//! stable error `kind`.
use serde::{Deserialize, Serialize};

use crate::cancel::CancelToken;
use crate::error::{Error, Result};
use crate::floorplan::FloorPlan;
use crate::geometry::{Point, Polygon};
use crate::heatmap::{compute_heatmap, AggregationPolicy, HeatmapConfig, HeatmapStats};
use crate::isovist::visibility_polygon;
use crate::sensitivity::{Feature, FeatureTable, FrequencyComponent};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointJson {
    pub x: f64,
    pub y: f64,
}

impl From<PointJson> for Point {
    fn from(p: PointJson) -> Self {
        Point::new(p.x, p.y)
    }
}

impl From<Point> for PointJson {
    fn from(p: Point) -> Self {
        PointJson { x: p.x, y: p.y }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PolygonJson {
    pub points: Vec<[f64; 2]>,
}

impl From<&PolygonJson> for Polygon {
    fn from(p: &PolygonJson) -> Self {
        Polygon::from_xy(&p.points)
    }
}

/// Feature record as sent by clients. Omitted values take the [`Feature::new`] defaults and an
/// omitted position anchors the feature at its obstacle's centroid.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureJson {
    pub obstacle_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<PointJson>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail_visibility_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature1_contrast: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature1_spatial_freq: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature2_contrast: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature2_spatial_freq: Option<f64>,
}

impl FeatureJson {
    /// Resolve against `plan`, filling defaults.
    pub fn to_feature(&self, plan: &FloorPlan) -> Result<Feature> {
        let mut feature = Feature::anchored_to(plan, self.obstacle_index)?;
        if let Some(position) = self.position {
            feature.position = position.into();
        }
        let [first, second] = feature.components;
        feature.size = self.size.unwrap_or(feature.size);
        feature.visibility_value = self.visibility_value.unwrap_or(feature.visibility_value);
        feature.detail_visibility_value = self
            .detail_visibility_value
            .unwrap_or(feature.detail_visibility_value);
        feature.components = [
            FrequencyComponent::new(
                self.feature1_contrast.unwrap_or(first.contrast),
                self.feature1_spatial_freq.unwrap_or(first.spatial_freq),
            ),
            FrequencyComponent::new(
                self.feature2_contrast.unwrap_or(second.contrast),
                self.feature2_spatial_freq.unwrap_or(second.spatial_freq),
            ),
        ];
        feature.validate()?;
        Ok(feature)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VisibilityRequest {
    pub viewpoint: PointJson,
    pub obstacles: Vec<PolygonJson>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibilityData {
    pub visibility_polygon: Vec<[f64; 2]>,
    pub area: f64,
    pub perimeter: f64,
    pub mean_radial_distance: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapRequest {
    pub obstacles: Vec<PolygonJson>,
    pub spacing: f64,
    #[serde(default)]
    pub features: Vec<FeatureJson>,
    #[serde(default)]
    pub aggregation: AggregationPolicy,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapData {
    pub origin: PointJson,
    pub spacing: f64,
    pub cols: usize,
    pub rows: usize,
    /// Row-major scores, row 0 at minimum y; `null` for invalid or unsampled cells.
    pub scores: Vec<Vec<Option<f64>>>,
    pub stats: HeatmapStats,
}

/// Response envelope shared by all queries.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ApiResponse<T> {
    Success { data: T },
    Error { message: String, kind: String },
}

impl<T> From<Result<T>> for ApiResponse<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(data) => ApiResponse::Success { data },
            Err(err) => ApiResponse::Error {
                message: err.to_string(),
                kind: err.kind().as_str().to_string(),
            },
        }
    }
}

fn build_plan(obstacles: &[PolygonJson]) -> Result<FloorPlan> {
    FloorPlan::from_polygons(obstacles.iter().map(Polygon::from).collect())
}

pub fn visibility_query(request: &VisibilityRequest) -> Result<VisibilityData> {
    let plan = build_plan(&request.obstacles)?;
    let isovist = visibility_polygon(&plan, request.viewpoint.into())?;
    Ok(VisibilityData {
        visibility_polygon: isovist.vertices().iter().map(|p| [p.x, p.y]).collect(),
        area: isovist.area(),
        perimeter: isovist.perimeter(),
        mean_radial_distance: isovist.mean_radial_distance(),
    })
}

pub fn heatmap_query(request: &HeatmapRequest, cancel: &CancelToken) -> Result<HeatmapData> {
    let plan = build_plan(&request.obstacles)?;
    let mut features = FeatureTable::new();
    for record in &request.features {
        if features.contains(record.obstacle_index) {
            return Err(Error::InvalidFeature(format!(
                "obstacle {} has more than one feature",
                record.obstacle_index
            )));
        }
        features.insert(record.to_feature(&plan)?)?;
    }

    let config = HeatmapConfig::new(request.spacing).with_aggregation(request.aggregation);
    let grid = compute_heatmap(&plan, &features, &config, cancel)?;
    Ok(HeatmapData {
        origin: grid.origin().into(),
        spacing: grid.spacing(),
        cols: grid.cols(),
        rows: grid.rows(),
        scores: grid.to_nested(),
        stats: grid.stats(),
    })
}

/// Decode a visibility request, run it and encode the response.
///
/// Query failures, including malformed input, become `"error"` responses. Only a failure to
/// encode the response itself is returned as `Err`.
pub fn handle_visibility_json(body: &str) -> Result<String> {
    let result = serde_json::from_str::<VisibilityRequest>(body)
        .map_err(Error::from)
        .and_then(|request| visibility_query(&request));
    Ok(serde_json::to_string(&ApiResponse::from(result))?)
}

/// Decode a heatmap request, run it and encode the response.
pub fn handle_heatmap_json(body: &str, cancel: &CancelToken) -> Result<String> {
    let result = serde_json::from_str::<HeatmapRequest>(body)
        .map_err(Error::from)
        .and_then(|request| heatmap_query(&request, cancel));
    Ok(serde_json::to_string(&ApiResponse::from(result))?)
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;

    fn square(min: f64, max: f64) -> Value {
        json!({ "points": [[min, min], [max, min], [max, max], [min, max]] })
    }

    fn call_visibility(request: Value) -> Value {
        let body = handle_visibility_json(&request.to_string()).expect("encodable");
        serde_json::from_str(&body).expect("valid json")
    }

    fn call_heatmap(request: Value) -> Value {
        let body = handle_heatmap_json(&request.to_string(), &CancelToken::new()).expect("encodable");
        serde_json::from_str(&body).expect("valid json")
    }

    #[test]
    fn empty_room_returns_the_boundary() {
        let response = call_visibility(json!({
            "viewpoint": { "x": 50.0, "y": 50.0 },
            "obstacles": [square(0.0, 100.0)],
        }));
        assert_eq!(response["status"], "success");
        let data = &response["data"];
        assert_eq!(data["visibilityPolygon"].as_array().map(Vec::len), Some(4));
        assert!((data["area"].as_f64().unwrap_or_default() - 10_000.0).abs() < 1e-6);
        assert!((data["perimeter"].as_f64().unwrap_or_default() - 400.0).abs() < 1e-6);
        assert!(data["meanRadialDistance"].as_f64().is_some());
    }

    #[test]
    fn obstacle_shrinks_the_visible_area() {
        let response = call_visibility(json!({
            "viewpoint": { "x": 50.0, "y": 10.0 },
            "obstacles": [square(0.0, 100.0), square(40.0, 60.0)],
        }));
        assert_eq!(response["status"], "success");
        let area = response["data"]["area"].as_f64().unwrap_or(f64::MAX);
        assert!(area < 10_000.0);
    }

    #[test]
    fn failures_carry_kind_and_message() {
        let inside = call_visibility(json!({
            "viewpoint": { "x": 50.0, "y": 50.0 },
            "obstacles": [square(0.0, 100.0), square(40.0, 60.0)],
        }));
        assert_eq!(inside["status"], "error");
        assert_eq!(inside["kind"], "ViewpointInsideObstacle");
        assert!(inside["message"].as_str().is_some_and(|m| m.contains("obstacle 1")));

        let empty = call_visibility(json!({
            "viewpoint": { "x": 1.0, "y": 1.0 },
            "obstacles": [],
        }));
        assert_eq!(empty["kind"], "EmptyObstacleSet");

        let degenerate = call_visibility(json!({
            "viewpoint": { "x": 1.0, "y": 1.0 },
            "obstacles": [{ "points": [[0.0, 0.0], [1.0, 1.0]] }],
        }));
        assert_eq!(degenerate["kind"], "InvalidGeometry");

        let body = handle_visibility_json("{ not json").expect("encodable");
        let malformed: Value = serde_json::from_str(&body).expect("valid json");
        assert_eq!(malformed["status"], "error");
        assert_eq!(malformed["kind"], "Json");
    }

    #[test]
    fn response_envelope_round_trips() {
        let ok: ApiResponse<u32> = Ok(3).into();
        let text = serde_json::to_string(&ok).expect("encode");
        assert_eq!(text, r#"{"status":"success","data":3}"#);

        let err: ApiResponse<u32> = Err(Error::EmptyObstacleSet).into();
        let back: ApiResponse<u32> =
            serde_json::from_str(&serde_json::to_string(&err).expect("encode")).expect("decode");
        assert_eq!(back, err);
    }

    #[test]
    fn heatmap_reports_grid_metadata_and_nulls() {
        let response = call_heatmap(json!({
            "obstacles": [square(0.0, 100.0), square(40.0, 60.0)],
            "spacing": 10.0,
            "features": [{
                "obstacleIndex": 1,
                "size": 2.0,
                "visibilityValue": 0.8,
                "detailVisibilityValue": 0.3,
                "feature1Contrast": 0.9,
                "feature1SpatialFreq": 0.05,
                "feature2Contrast": 0.4,
                "feature2SpatialFreq": 1.5
            }],
        }));
        assert_eq!(response["status"], "success");
        let data = &response["data"];
        assert_eq!(data["cols"], 10);
        assert_eq!(data["rows"], 10);
        assert_eq!(data["spacing"], 10.0);
        assert_eq!(data["origin"], json!({ "x": 0.0, "y": 0.0 }));
        assert!(data["scores"][4][4].is_null());
        assert!(data["scores"][5][5].is_null());
        let score = data["scores"][1][5].as_f64().unwrap_or(-1.0);
        assert!(score > 0.0 && score <= 0.8);
        assert_eq!(data["stats"]["invalid"], 4);
        assert_eq!(data["stats"]["cancelled"], false);
    }

    #[test]
    fn positioned_feature_is_hidden_by_its_own_obstacle() {
        let response = call_heatmap(json!({
            "obstacles": [square(0.0, 100.0), square(40.0, 60.0)],
            "spacing": 10.0,
            "features": [{ "obstacleIndex": 1, "position": { "x": 50.0, "y": 62.0 } }],
        }));
        assert_eq!(response["status"], "success");
        let scores = &response["data"]["scores"];
        assert_eq!(scores[1][5].as_f64(), Some(0.0));
        assert!(scores[9][5].as_f64().is_some_and(|s| s > 0.0));
    }

    #[test]
    fn heatmap_rejects_bad_features() {
        let duplicate = call_heatmap(json!({
            "obstacles": [square(0.0, 100.0), square(40.0, 60.0)],
            "spacing": 10.0,
            "features": [{ "obstacleIndex": 1 }, { "obstacleIndex": 1 }],
        }));
        assert_eq!(duplicate["kind"], "InvalidFeature");

        let unknown = call_heatmap(json!({
            "obstacles": [square(0.0, 100.0)],
            "spacing": 10.0,
            "features": [{ "obstacleIndex": 3 }],
        }));
        assert_eq!(unknown["kind"], "UnknownObstacle");

        let out_of_range = call_heatmap(json!({
            "obstacles": [square(0.0, 100.0), square(40.0, 60.0)],
            "spacing": 10.0,
            "features": [{ "obstacleIndex": 1, "visibilityValue": 1.5 }],
        }));
        assert_eq!(out_of_range["kind"], "InvalidFeature");

        let bad_spacing = call_heatmap(json!({
            "obstacles": [square(0.0, 100.0)],
            "spacing": 0.0,
        }));
        assert_eq!(bad_spacing["kind"], "InvalidConfig");
    }

    #[test]
    fn feature_defaults_fill_missing_values() {
        let plan = FloorPlan::build(
            Polygon::from_xy(&[[0.0, 0.0], [100.0, 0.0], [100.0, 100.0], [0.0, 100.0]]),
            vec![Polygon::from_xy(&[[40.0, 40.0], [60.0, 40.0], [60.0, 60.0], [40.0, 60.0]])],
        )
        .expect("plan");
        let record = FeatureJson {
            obstacle_index: 1,
            feature2_contrast: Some(0.1),
            ..Default::default()
        };
        let feature = record.to_feature(&plan).expect("feature");
        let defaults = Feature::new(1, Point::new(50.0, 50.0));
        assert!((feature.position - defaults.position).length() < 1e-9);
        assert_eq!(feature.components[0], defaults.components[0]);
        assert_eq!(feature.components[1].contrast, 0.1);
        assert_eq!(feature.visibility_value, defaults.visibility_value);

        let moved = FeatureJson {
            obstacle_index: 1,
            position: Some(PointJson { x: 1.0, y: 2.0 }),
            ..Default::default()
        };
        assert_eq!(moved.to_feature(&plan).expect("feature").position, Point::new(1.0, 2.0));
    }

    #[test]
    fn aggregation_name_is_accepted() {
        let request: HeatmapRequest = serde_json::from_value(json!({
            "obstacles": [square(0.0, 100.0)],
            "spacing": 25.0,
            "aggregation": "probabilisticUnion",
        }))
        .expect("decode");
        assert_eq!(request.aggregation, AggregationPolicy::ProbabilisticUnion);
        assert!(request.features.is_empty());
    }
}
