//! Single-lineage evolutionary search over weight vectors.
//!
//! Each iteration mutates the current best vector, plays
//! `games_per_candidate` self-play games with it and uses the mean number of
//! cleared lines as fitness. A candidate is adopted only when there is no
//! best fitness yet or when it strictly beats the best one; every adoption
//! produces a [`ProgressEvent`].

use std::{
    sync::atomic::{AtomicBool, Ordering},
    thread,
};

use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use stackbot_engine::{GameField, PieceGenerator};
use stackbot_evaluator::{
    placement_evaluator::WeightedPlacementEvaluator, turn_evaluator::TurnEvaluator,
    weights::WeightVector,
};

use crate::weights::Mutation;

#[derive(Debug, Clone, Copy, PartialEq, derive_more::Display, derive_more::Error)]
pub enum TrainerConfigError {
    #[display("mutation rate must be within [0, 1], got {rate}")]
    MutationRate { rate: f64 },
    #[display("mutation strength must be finite and non-negative, got {strength}")]
    MutationStrength { strength: f32 },
    #[display("games per candidate must be positive")]
    ZeroGames,
    #[display("move cap must be positive")]
    ZeroMoveCap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainerConfig {
    /// Games played to measure one candidate.
    pub games_per_candidate: usize,
    /// Placements after which a game is stopped.
    pub move_cap: usize,
    /// Probability that a single coefficient is perturbed.
    pub mutation_rate: f64,
    /// Maximum relative step of a perturbation.
    pub mutation_strength: f32,
    /// Stop after this many candidates; `None` runs until cancelled.
    pub max_iterations: Option<usize>,
    /// Seed of the trainer's generator; `None` seeds from entropy.
    pub rng_seed: Option<u64>,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            games_per_candidate: 3,
            move_cap: 500,
            mutation_rate: 0.3,
            mutation_strength: 0.2,
            max_iterations: None,
            rng_seed: None,
        }
    }
}

impl TrainerConfig {
    pub fn validate(&self) -> Result<(), TrainerConfigError> {
        if self.games_per_candidate == 0 {
            return Err(TrainerConfigError::ZeroGames);
        }
        if self.move_cap == 0 {
            return Err(TrainerConfigError::ZeroMoveCap);
        }
        Mutation::new(self.mutation_rate, self.mutation_strength)?;
        Ok(())
    }
}

/// Emitted whenever a candidate is adopted as the new best.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub iteration: usize,
    pub weights: WeightVector,
    pub fitness: f32,
}

/// State of a finished (or stopped) run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSummary {
    /// Candidates evaluated.
    pub iterations: usize,
    /// Candidates adopted.
    pub improvements: usize,
    pub best_weights: WeightVector,
    pub best_fitness: Option<f32>,
}

#[derive(Debug, Clone)]
pub struct Trainer {
    config: TrainerConfig,
    mutation: Mutation,
    rng: Pcg32,
    best_weights: WeightVector,
    best_fitness: Option<f32>,
    iterations: usize,
    improvements: usize,
}

impl Trainer {
    /// Creates a trainer starting from `seed` (or the baseline weights).
    pub fn new(
        config: TrainerConfig,
        seed: Option<WeightVector>,
    ) -> Result<Self, TrainerConfigError> {
        config.validate()?;
        let mutation = Mutation::new(config.mutation_rate, config.mutation_strength)?;
        let rng = match config.rng_seed {
            Some(seed) => Pcg32::seed_from_u64(seed),
            None => Pcg32::seed_from_u64(rand::rng().random()),
        };
        Ok(Self {
            config,
            mutation,
            rng,
            best_weights: seed.unwrap_or_default(),
            best_fitness: None,
            iterations: 0,
            improvements: 0,
        })
    }

    #[must_use]
    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    #[must_use]
    pub fn best_weights(&self) -> &WeightVector {
        &self.best_weights
    }

    #[must_use]
    pub fn best_fitness(&self) -> Option<f32> {
        self.best_fitness
    }

    #[must_use]
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Mean lines cleared by `weights` over `games_per_candidate` games.
    #[expect(clippy::cast_precision_loss)]
    pub fn evaluate(&mut self, weights: &WeightVector) -> f32 {
        let evaluator = TurnEvaluator::new(Box::new(WeightedPlacementEvaluator::new(*weights)));
        let games = self.config.games_per_candidate;
        let total_lines: usize = (0..games)
            .map(|_| {
                let pieces = PieceGenerator::with_seed(self.rng.random());
                let mut field = GameField::new();
                evaluator
                    .play_session(&mut field, pieces, self.config.move_cap)
                    .total_cleared_lines()
            })
            .sum();
        total_lines as f32 / games as f32
    }

    /// Adopts `weights` if `fitness` improves on the best so far.
    pub fn consider(&mut self, weights: WeightVector, fitness: f32) -> Option<ProgressEvent> {
        let iteration = self.iterations;
        self.iterations += 1;
        let improves = self.best_fitness.is_none_or(|best| fitness > best);
        if !improves {
            tracing::debug!(iteration, fitness, best = ?self.best_fitness, "candidate rejected");
            return None;
        }
        tracing::info!(iteration, fitness, "new best weights");
        self.best_weights = weights;
        self.best_fitness = Some(fitness);
        self.improvements += 1;
        Some(ProgressEvent {
            iteration,
            weights,
            fitness,
        })
    }

    /// Runs one mutate-evaluate-select iteration.
    pub fn step(&mut self) -> Option<ProgressEvent> {
        let candidate = self.mutation.apply(&self.best_weights, &mut self.rng);
        let fitness = self.evaluate(&candidate);
        self.consider(candidate, fitness)
    }

    /// Iterates while `active` is set and the iteration budget lasts.
    ///
    /// The flag is checked before every candidate and the thread yields after
    /// each one, so a stop takes effect at the next candidate boundary.
    pub fn run<F>(&mut self, active: &AtomicBool, mut on_progress: F) -> TrainingSummary
    where
        F: FnMut(&ProgressEvent),
    {
        while active.load(Ordering::Acquire) {
            if self
                .config
                .max_iterations
                .is_some_and(|max| self.iterations >= max)
            {
                break;
            }
            if let Some(event) = self.step() {
                on_progress(&event);
            }
            thread::yield_now();
        }
        self.summary()
    }

    #[must_use]
    pub fn summary(&self) -> TrainingSummary {
        TrainingSummary {
            iterations: self.iterations,
            improvements: self.improvements,
            best_weights: self.best_weights,
            best_fitness: self.best_fitness,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick_config() -> TrainerConfig {
        TrainerConfig {
            games_per_candidate: 1,
            move_cap: 30,
            mutation_rate: 0.5,
            mutation_strength: 0.3,
            max_iterations: Some(3),
            rng_seed: Some(42),
        }
    }

    #[test]
    fn test_config_validation() {
        assert!(TrainerConfig::default().validate().is_ok());
        let config = TrainerConfig {
            games_per_candidate: 0,
            ..TrainerConfig::default()
        };
        assert_eq!(config.validate(), Err(TrainerConfigError::ZeroGames));
        let config = TrainerConfig {
            move_cap: 0,
            ..TrainerConfig::default()
        };
        assert_eq!(config.validate(), Err(TrainerConfigError::ZeroMoveCap));
        let config = TrainerConfig {
            mutation_rate: -0.1,
            ..TrainerConfig::default()
        };
        assert!(Trainer::new(config, None).is_err());
    }

    #[test]
    fn test_first_candidate_is_always_adopted() {
        let mut trainer = Trainer::new(quick_config(), None).unwrap();
        let event = trainer.consider(WeightVector::BASELINE, 0.0).unwrap();
        assert_eq!(event.iteration, 0);
        assert_eq!(trainer.best_fitness(), Some(0.0));
    }

    #[test]
    fn test_adoption_requires_strict_improvement() {
        let mut trainer = Trainer::new(quick_config(), None).unwrap();
        let mut other = WeightVector::BASELINE;
        other.holes = -9.0;

        assert!(trainer.consider(WeightVector::BASELINE, 2.0).is_some());
        assert!(trainer.consider(other, 2.0).is_none());
        assert!(trainer.consider(other, 1.0).is_none());
        assert_eq!(trainer.best_weights(), &WeightVector::BASELINE);

        let event = trainer.consider(other, 2.5).unwrap();
        assert_eq!(event.iteration, 3);
        assert_eq!(trainer.best_weights(), &other);

        let summary = trainer.summary();
        assert_eq!(summary.iterations, 4);
        assert_eq!(summary.improvements, 2);
        assert_eq!(summary.best_fitness, Some(2.5));
    }

    #[test]
    fn test_run_respects_iteration_budget() {
        let mut trainer = Trainer::new(quick_config(), None).unwrap();
        let active = AtomicBool::new(true);
        let mut events = vec![];
        let summary = trainer.run(&active, |event| events.push(event.clone()));
        assert_eq!(summary.iterations, 3);
        assert!(!events.is_empty());
        assert_eq!(events[0].iteration, 0);
        assert!(events.windows(2).all(|w| w[1].fitness > w[0].fitness));
        assert_eq!(summary.best_fitness, events.last().map(|e| e.fitness));
    }

    #[test]
    fn test_run_with_inactive_flag_does_nothing() {
        let mut trainer = Trainer::new(quick_config(), None).unwrap();
        let active = AtomicBool::new(false);
        let summary = trainer.run(&active, |_| panic!("no progress expected"));
        assert_eq!(summary.iterations, 0);
        assert_eq!(summary.best_fitness, None);
        assert_eq!(summary.best_weights, WeightVector::BASELINE);
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let run = || {
            let mut trainer = Trainer::new(quick_config(), None).unwrap();
            trainer.run(&AtomicBool::new(true), |_| {})
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_progress_event_json() {
        let event = ProgressEvent {
            iteration: 5,
            weights: WeightVector::BASELINE,
            fitness: 1.5,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["iteration"], 5);
        assert_eq!(json["fitness"], 1.5);
        assert!(json["weights"]["landing_height"].is_number());
    }
}
