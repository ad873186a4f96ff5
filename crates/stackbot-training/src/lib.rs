//! Self-play training of the weighted placement evaluator.
//!
//! - [`weights`] - magnitude-proportional mutation of a weight vector
//! - [`trainer`] - the mutate, play, select loop and its configuration
//! - [`worker`] - the training context on its own thread with a stop flag
//!
//! The trainer keeps a single best vector rather than a population. Fitness
//! is the mean number of lines cleared over a batch of games played with
//! uniformly random pieces, scored by
//! [`WeightedPlacementEvaluator`](stackbot_evaluator::placement_evaluator::WeightedPlacementEvaluator).
//!
//! # Example
//!
//! ```
//! use std::sync::atomic::AtomicBool;
//!
//! use stackbot_training::trainer::{Trainer, TrainerConfig};
//!
//! let config = TrainerConfig {
//!     games_per_candidate: 1,
//!     move_cap: 20,
//!     max_iterations: Some(2),
//!     rng_seed: Some(7),
//!     ..TrainerConfig::default()
//! };
//! let mut trainer = Trainer::new(config, None).unwrap();
//! let summary = trainer.run(&AtomicBool::new(true), |event| {
//!     println!("#{}: {:.2}", event.iteration, event.fitness);
//! });
//! assert_eq!(summary.iterations, 2);
//! ```

pub mod trainer;
pub mod weights;
pub mod worker;
