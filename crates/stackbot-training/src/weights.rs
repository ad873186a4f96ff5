//! Mutation operator for weight vectors.
//!
//! Each coefficient is perturbed independently with probability `rate` by a
//! step proportional to its own magnitude:
//!
//! ```text
//! w' = w + |w| · strength · u,    u ~ Uniform[-1, 1]
//! ```
//!
//! A coefficient of zero therefore stays zero, and the sign of a coefficient
//! can only flip when `strength > 1`.

use rand::Rng;
use rand_distr::{Distribution as _, Uniform};
use stackbot_evaluator::weights::WeightVector;

use crate::trainer::TrainerConfigError;

#[derive(Debug, Clone)]
pub struct Mutation {
    rate: f64,
    factor: Uniform<f32>,
}

impl Mutation {
    /// `rate` must lie in `[0, 1]` and `strength` must be finite and non-negative.
    pub fn new(rate: f64, strength: f32) -> Result<Self, TrainerConfigError> {
        if !(0.0..=1.0).contains(&rate) {
            return Err(TrainerConfigError::MutationRate { rate });
        }
        if !strength.is_finite() || strength < 0.0 {
            return Err(TrainerConfigError::MutationStrength { strength });
        }
        let factor = Uniform::new_inclusive(-strength, strength)
            .map_err(|_| TrainerConfigError::MutationStrength { strength })?;
        Ok(Self { rate, factor })
    }

    /// Returns a mutated copy of `weights`.
    pub fn apply<R>(&self, weights: &WeightVector, rng: &mut R) -> WeightVector
    where
        R: Rng + ?Sized,
    {
        if self.rate <= 0.0 {
            return *weights;
        }
        weights.map(|_, w| {
            if rng.random_bool(self.rate) {
                w + w.abs() * self.factor.sample(rng)
            } else {
                w
            }
        })
    }
}
