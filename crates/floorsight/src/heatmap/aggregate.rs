//! Per-cell aggregation of feature detectabilities.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::sensitivity::curve::clamp01;

/// How the detectabilities of several features combine into one cell score.
///
/// Every policy maps scores in `[0, 1]` to a result in `[0, 1]`, and an empty input to `0`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AggregationPolicy {
    /// The most salient feature perceivable from the cell.
    #[default]
    Max,
    /// Average over all registered features, hidden ones counting as `0`.
    Mean,
    /// Sum of scores, saturating at `1`.
    ClampedSum,
    /// `1 - prod(1 - s)`: chance that at least one feature is detected, treating features as
    /// independent.
    ProbabilisticUnion,
}

impl AggregationPolicy {
    pub fn aggregate<I>(self, scores: I) -> f64
    where
        I: IntoIterator<Item = f64>,
    {
        let scores = scores.into_iter().map(clamp01);
        let combined = match self {
            AggregationPolicy::Max => scores.fold(0.0, f64::max),
            AggregationPolicy::Mean => {
                let (sum, n) = scores.fold((0.0, 0usize), |(sum, n), s| (sum + s, n + 1));
                if n == 0 {
                    0.0
                } else {
                    sum / n as f64
                }
            }
            AggregationPolicy::ClampedSum => scores.sum::<f64>(),
            AggregationPolicy::ProbabilisticUnion => {
                1.0 - scores.map(|s| 1.0 - s).product::<f64>()
            }
        };
        clamp01(combined)
    }

    /// Stable lower-camel-case name.
    pub fn as_str(self) -> &'static str {
        match self {
            AggregationPolicy::Max => "max",
            AggregationPolicy::Mean => "mean",
            AggregationPolicy::ClampedSum => "clampedSum",
            AggregationPolicy::ProbabilisticUnion => "probabilisticUnion",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [AggregationPolicy; 4] = [
        AggregationPolicy::Max,
        AggregationPolicy::Mean,
        AggregationPolicy::ClampedSum,
        AggregationPolicy::ProbabilisticUnion,
    ];

    #[test]
    fn empty_input_scores_zero() {
        for policy in ALL {
            assert_eq!(policy.aggregate(std::iter::empty()), 0.0, "{}", policy.as_str());
        }
    }

    #[test]
    fn policies_combine_as_documented() {
        let scores = [0.5, 0.25, 0.0];
        assert_eq!(AggregationPolicy::Max.aggregate(scores), 0.5);
        assert_eq!(AggregationPolicy::Mean.aggregate(scores), 0.25);
        assert_eq!(AggregationPolicy::ClampedSum.aggregate(scores), 0.75);
        assert!((AggregationPolicy::ProbabilisticUnion.aggregate(scores) - 0.625).abs() < 1e-12);
    }

    #[test]
    fn results_stay_bounded() {
        let scores = [0.9, 0.8, 0.7, 2.0, f64::NAN, -1.0];
        for policy in ALL {
            let v = policy.aggregate(scores);
            assert!((0.0..=1.0).contains(&v), "{} gave {v}", policy.as_str());
        }
        assert_eq!(AggregationPolicy::ClampedSum.aggregate(scores), 1.0);
    }

    #[test]
    fn default_is_max() {
        assert_eq!(AggregationPolicy::default(), AggregationPolicy::Max);
    }
}
