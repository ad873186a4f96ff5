use std::{fmt, iter};

use serde::{Deserialize, Serialize};

/// Names of the features scored by [`WeightedPlacementEvaluator`](crate::placement_evaluator::WeightedPlacementEvaluator).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum WeightTerm {
    #[display("lines")]
    Lines,
    #[display("holes")]
    Holes,
    #[display("blocked")]
    Blocked,
    #[display("row_transitions")]
    RowTransitions,
    #[display("column_transitions")]
    ColumnTransitions,
    #[display("bumpiness")]
    Bumpiness,
    #[display("bump_risk")]
    BumpRisk,
    #[display("aggregate_height")]
    AggregateHeight,
    #[display("wells")]
    Wells,
    #[display("landing_height")]
    LandingHeight,
}

impl WeightTerm {
    pub const LEN: usize = 10;

    pub const ALL: [Self; Self::LEN] = [
        Self::Lines,
        Self::Holes,
        Self::Blocked,
        Self::RowTransitions,
        Self::ColumnTransitions,
        Self::Bumpiness,
        Self::BumpRisk,
        Self::AggregateHeight,
        Self::Wells,
        Self::LandingHeight,
    ];
}

/// Coefficients of the weighted placement score, one per [`WeightTerm`].
///
/// Positive coefficients reward a feature and negative ones penalize it.
/// Serialized as a JSON object keyed by term name; unknown keys are rejected
/// and missing keys fall back to the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WeightVector {
    pub lines: f32,
    pub holes: f32,
    pub blocked: f32,
    pub row_transitions: f32,
    pub column_transitions: f32,
    pub bumpiness: f32,
    pub bump_risk: f32,
    pub aggregate_height: f32,
    pub wells: f32,
    pub landing_height: f32,
}

impl Default for WeightVector {
    fn default() -> Self {
        Self::BASELINE
    }
}

impl fmt::Display for WeightVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (term, w) in self.iter() {
            if !first {
                f.write_str(" ")?;
            }
            first = false;
            write!(f, "{term}={w:.4}")?;
        }
        Ok(())
    }
}

impl WeightVector {
    /// Hand-tuned starting point for training and untrained play.
    pub const BASELINE: Self = Self::from_array([
        0.760_666,  // lines
        -0.356_63,  // holes
        -0.1,       // blocked
        -0.12,      // row transitions
        -0.12,      // column transitions
        -0.184_483, // bumpiness
        -0.05,      // bump risk
        -0.510_066, // aggregate height
        -0.05,      // wells
        -0.08,      // landing height
    ]);

    /// Builds a vector from coefficients listed in [`WeightTerm::ALL`] order.
    #[must_use]
    pub const fn from_array(arr: [f32; WeightTerm::LEN]) -> Self {
        let [
            lines,
            holes,
            blocked,
            row_transitions,
            column_transitions,
            bumpiness,
            bump_risk,
            aggregate_height,
            wells,
            landing_height,
        ] = arr;
        Self {
            lines,
            holes,
            blocked,
            row_transitions,
            column_transitions,
            bumpiness,
            bump_risk,
            aggregate_height,
            wells,
            landing_height,
        }
    }

    /// Coefficients in [`WeightTerm::ALL`] order.
    #[must_use]
    pub const fn to_array(&self) -> [f32; WeightTerm::LEN] {
        [
            self.lines,
            self.holes,
            self.blocked,
            self.row_transitions,
            self.column_transitions,
            self.bumpiness,
            self.bump_risk,
            self.aggregate_height,
            self.wells,
            self.landing_height,
        ]
    }

    #[must_use]
    pub fn get(&self, term: WeightTerm) -> f32 {
        self.to_array()[term as usize]
    }

    pub fn set(&mut self, term: WeightTerm, value: f32) {
        let mut arr = self.to_array();
        arr[term as usize] = value;
        *self = Self::from_array(arr);
    }

    pub fn iter(&self) -> impl Iterator<Item = (WeightTerm, f32)> {
        iter::zip(WeightTerm::ALL, self.to_array())
    }

    /// Applies `f` to every coefficient.
    #[must_use]
    pub fn map<F>(&self, mut f: F) -> Self
    where
        F: FnMut(WeightTerm, f32) -> f32,
    {
        let mut arr = self.to_array();
        for (term, w) in iter::zip(WeightTerm::ALL, &mut arr) {
            *w = f(term, *w);
        }
        Self::from_array(arr)
    }
}
