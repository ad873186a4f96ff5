//! Scoring of single placements by a weighted sum of board features.
//!
//! [`WeightedPlacementEvaluator`] is the scoring function trained by the
//! evolutionary trainer. It looks only at column profiles, holes and
//! transitions and is independent of the region-based topology analysis.

use std::fmt;

use crate::{placement_analysis::PlacementAnalysis, weights::WeightVector};

/// Scores a placement; higher is better.
pub trait PlacementEvaluator: fmt::Debug {
    fn evaluate_placement(&self, analysis: &PlacementAnalysis) -> f32;
}

/// Raw feature values of one placement, in [`WeightTerm::ALL`](crate::weights::WeightTerm::ALL) order.
#[must_use]
#[expect(clippy::cast_precision_loss)]
pub fn placement_features(analysis: &PlacementAnalysis) -> [f32; crate::weights::WeightTerm::LEN] {
    let board = analysis.board_analysis();
    [
        analysis.cleared_lines() as f32,
        board.num_holes() as f32,
        board.blocked_cells() as f32,
        board.row_transitions() as f32,
        board.column_transitions() as f32,
        board.bumpiness() as f32,
        board.bump_risk() as f32,
        board.aggregate_height() as f32,
        board.well_depth_sum() as f32,
        analysis.landing_height(),
    ]
}

#[derive(Debug, Clone)]
pub struct WeightedPlacementEvaluator {
    weights: WeightVector,
}

impl WeightedPlacementEvaluator {
    #[must_use]
    pub fn new(weights: WeightVector) -> Self {
        Self { weights }
    }

    #[must_use]
    pub fn weights(&self) -> &WeightVector {
        &self.weights
    }
}

impl Default for WeightedPlacementEvaluator {
    fn default() -> Self {
        Self::new(WeightVector::BASELINE)
    }
}

impl PlacementEvaluator for WeightedPlacementEvaluator {
    #[inline]
    fn evaluate_placement(&self, analysis: &PlacementAnalysis) -> f32 {
        std::iter::zip(placement_features(analysis), self.weights.to_array())
            .map(|(f, w)| f * w)
            .sum()
    }
}
