//! Feature sensitivity model: how detectable a feature is from one viewpoint.
//!
//! Detectability is gated by occlusion and then scored from the feature's two
//! contrast / spatial-frequency components:
//!
//! ```text
//! detectability = visibility_value * clamp01((1 - detail) * S(coarse) + detail * S(fine))
//! ```
//!
//! where `detail` is the feature's `detail_visibility_value` and `S` is a pluggable
//! [`ContrastSensitivity`] curve evaluated at the distance to the feature's rim.
use crate::floorplan::FloorPlan;
use crate::geometry::Point;
use crate::isovist::VisibilityPolygon;

pub mod curve;
pub mod feature;

pub use curve::{
    cycles_per_degree, ContrastSensitivity, ExponentialFalloff, FnSensitivity, SensitivityModel,
};
pub use feature::{Feature, FeatureTable, FrequencyComponent};

use curve::clamp01;

/// What an observer knows about a feature from one viewpoint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewContext {
    /// Whether any part of the feature is in line of sight.
    pub visible: bool,
    /// Euclidean distance from the viewpoint to the feature anchor.
    pub distance: f64,
}

impl ViewContext {
    pub fn new(visible: bool, distance: f64) -> Self {
        Self { visible, distance }
    }

    /// Derive the context from an isovist of `plan`.
    ///
    /// An anchor strictly inside its own obstacle, such as the default centroid, is never inside
    /// the isovist; the feature is visible when the sweep reached that obstacle. Any other anchor
    /// is visible when the isovist reaches it.
    pub fn observe(feature: &Feature, isovist: &VisibilityPolygon, plan: &FloorPlan) -> Self {
        let embedded = plan
            .obstacle(feature.obstacle_index)
            .is_some_and(|obstacle| obstacle.contains(feature.position));
        let visible = if embedded {
            isovist.sees(feature.obstacle_index)
        } else {
            isovist.reaches(feature.position)
        };
        Self {
            visible,
            distance: isovist.viewpoint().distance(feature.position),
        }
    }

    /// Context for a viewpoint given an explicit line-of-sight flag.
    pub fn from_viewpoint(viewpoint: Point, feature: &Feature, visible: bool) -> Self {
        Self::new(visible, viewpoint.distance(feature.position))
    }
}

/// Detectability of `feature` in `[0, 1]`; exactly `0` when the feature is not visible.
pub fn detectability(
    feature: &Feature,
    context: &ViewContext,
    curve: &dyn ContrastSensitivity,
) -> f64 {
    if !context.visible {
        return 0.0;
    }
    let distance = (context.distance - feature.size).max(0.0);
    let (coarse, fine) = feature.coarse_and_fine();
    let detail = clamp01(feature.detail_visibility_value);

    let s_coarse = clamp01(curve.sensitivity(coarse.contrast, coarse.spatial_freq, distance));
    let s_fine = clamp01(curve.sensitivity(fine.contrast, fine.spatial_freq, distance));

    clamp01(feature.visibility_value) * clamp01((1.0 - detail) * s_coarse + detail * s_fine)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Polygon;
    use crate::isovist::visibility_polygon;

    fn square(min: f64, max: f64) -> Polygon {
        Polygon::from_xy(&[[min, min], [max, min], [max, max], [min, max]])
    }

    fn occluded_plan() -> FloorPlan {
        // Obstacle 1 stands between the viewpoint (50, 10) and obstacle 2.
        FloorPlan::build(
            square(0.0, 100.0),
            vec![
                square(30.0, 70.0),
                Polygon::from_xy(&[[45.0, 75.0], [55.0, 75.0], [55.0, 85.0], [45.0, 85.0]]),
            ],
        )
        .expect("valid plan")
    }

    fn vivid(index: usize, plan: &FloorPlan) -> Feature {
        Feature::anchored_to(plan, index)
            .expect("feature")
            .with_components(
                FrequencyComponent::new(1.0, 0.01),
                FrequencyComponent::new(1.0, 0.02),
            )
    }

    #[test]
    fn hidden_feature_scores_zero() {
        let plan = occluded_plan();
        let isovist = visibility_polygon(&plan, Point::new(50.0, 10.0)).expect("isovist");
        assert!(isovist.sees(1));
        assert!(!isovist.sees(2));

        let curve = ExponentialFalloff::default();
        let hidden = vivid(2, &plan);
        let ctx = ViewContext::observe(&hidden, &isovist, &plan);
        assert!(!ctx.visible);
        assert_eq!(detectability(&hidden, &ctx, &curve), 0.0);

        let saturating = FnSensitivity::new(|_, _, _| 1.0);
        assert_eq!(detectability(&hidden, &ctx, &saturating), 0.0);
    }

    #[test]
    fn visible_feature_scores_positive_and_bounded() {
        let plan = occluded_plan();
        let isovist = visibility_polygon(&plan, Point::new(50.0, 10.0)).expect("isovist");
        let feature = vivid(1, &plan);
        let ctx = ViewContext::observe(&feature, &isovist, &plan);
        assert!(ctx.visible);
        assert!((ctx.distance - 40.0).abs() < 1e-9);

        let d = detectability(&feature, &ctx, &ExponentialFalloff::default());
        assert!(d > 0.0 && d <= 1.0);
    }

    #[test]
    fn anchor_outside_its_obstacle_needs_line_of_sight() {
        let plan = FloorPlan::build(square(0.0, 100.0), vec![square(40.0, 60.0)]).expect("plan");
        let isovist = visibility_polygon(&plan, Point::new(50.0, 10.0)).expect("isovist");
        assert!(isovist.sees(1));
        let always = FnSensitivity::new(|_, _, _| 1.0);

        let in_front = Feature::new(1, Point::new(50.0, 38.0));
        let ctx = ViewContext::observe(&in_front, &isovist, &plan);
        assert!(ctx.visible);
        assert_eq!(detectability(&in_front, &ctx, &always), 1.0);

        // Just behind the obstacle it is attached to, inside the shadow.
        let behind = Feature::new(1, Point::new(50.0, 62.0));
        assert!(!isovist.contains(behind.position));
        let ctx = ViewContext::observe(&behind, &isovist, &plan);
        assert!(!ctx.visible);
        assert_eq!(detectability(&behind, &ctx, &always), 0.0);
        assert_eq!(detectability(&behind, &ctx, &ExponentialFalloff::default()), 0.0);
    }

    #[test]
    fn anchor_on_obstacle_face_follows_the_isovist_edge() {
        let plan = FloorPlan::build(square(0.0, 100.0), vec![square(40.0, 60.0)]).expect("plan");
        let isovist = visibility_polygon(&plan, Point::new(50.0, 10.0)).expect("isovist");

        let front_face = Feature::new(1, Point::new(50.0, 40.0));
        assert!(ViewContext::observe(&front_face, &isovist, &plan).visible);

        let back_face = Feature::new(1, Point::new(50.0, 60.0));
        assert!(!ViewContext::observe(&back_face, &isovist, &plan).visible);

        let centroid = Feature::anchored_to(&plan, 1).expect("feature");
        assert!(ViewContext::observe(&centroid, &isovist, &plan).visible);
    }

    #[test]
    fn visibility_value_scales_linearly() {
        let curve = FnSensitivity::new(|_, _, _| 0.8);
        let ctx = ViewContext::new(true, 10.0);
        let full = Feature::new(1, Point::ZERO);
        let half = full.clone().with_visibility_value(0.5);
        let a = detectability(&full, &ctx, &curve);
        let b = detectability(&half, &ctx, &curve);
        assert!((a - 0.8).abs() < 1e-12);
        assert!((b - 0.4).abs() < 1e-12);
    }

    #[test]
    fn detail_weight_shifts_toward_fine_component() {
        // Fine detail vanishes past 10 units, coarse detail stays fully visible.
        let curve = FnSensitivity::new(|_c, f, d| if f > 1.0 && d > 10.0 { 0.0 } else { 1.0 });
        let ctx = ViewContext::new(true, 50.0);
        let base = Feature::new(1, Point::ZERO).with_components(
            FrequencyComponent::new(1.0, 0.1),
            FrequencyComponent::new(1.0, 5.0),
        );
        let coarse_only = detectability(&base.clone().with_detail_visibility_value(0.0), &ctx, &curve);
        let fine_only = detectability(&base.clone().with_detail_visibility_value(1.0), &ctx, &curve);
        let mixed = detectability(&base.with_detail_visibility_value(0.25), &ctx, &curve);
        assert_eq!(coarse_only, 1.0);
        assert_eq!(fine_only, 0.0);
        assert!((mixed - 0.75).abs() < 1e-12);
    }

    #[test]
    fn size_shortens_effective_distance() {
        let curve = ExponentialFalloff::default();
        let ctx = ViewContext::new(true, 200.0);
        let small = Feature::new(1, Point::ZERO);
        let large = small.clone().with_size(150.0);
        assert!(detectability(&large, &ctx, &curve) > detectability(&small, &ctx, &curve));

        let inside = small.clone().with_size(500.0);
        let at_zero = detectability(&small, &ViewContext::new(true, 0.0), &curve);
        assert_eq!(detectability(&inside, &ctx, &curve), at_zero);
    }

    #[test]
    fn from_viewpoint_measures_distance() {
        let f = Feature::new(1, Point::new(3.0, 4.0));
        let ctx = ViewContext::from_viewpoint(Point::ZERO, &f, true);
        assert_eq!(ctx.distance, 5.0);
    }
}
