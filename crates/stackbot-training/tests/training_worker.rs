use std::time::Duration;

use stackbot_evaluator::weights::WeightVector;
use stackbot_training::{
    trainer::{TrainerConfig, TrainerConfigError},
    worker::TrainingWorker,
};

fn config(max_iterations: Option<usize>) -> TrainerConfig {
    TrainerConfig {
        games_per_candidate: 1,
        move_cap: 20,
        mutation_rate: 0.5,
        mutation_strength: 0.25,
        max_iterations,
        rng_seed: Some(11),
    }
}

#[test]
fn bounded_run_finishes_and_reports_progress() {
    let mut worker = TrainingWorker::start(config(Some(4)), Some(WeightVector::BASELINE)).unwrap();
    let summary = worker.join().unwrap();
    assert_eq!(summary.iterations, 4);
    assert!(!worker.is_active());

    let events: Vec<_> = worker.events().try_iter().collect();
    assert_eq!(events.len(), summary.improvements);
    assert_eq!(events.first().map(|e| e.iteration), Some(0));
    let last = events.last().unwrap();
    assert_eq!(Some(last.fitness), summary.best_fitness);
    assert_eq!(last.weights, summary.best_weights);
}

#[test]
fn stop_cancels_unbounded_run() {
    let mut worker = TrainingWorker::start(config(None), None).unwrap();
    // The first candidate is always adopted.
    let first = worker.events().recv_timeout(Duration::from_secs(60)).unwrap();
    assert_eq!(first.iteration, 0);

    let summary = worker.stop().unwrap();
    assert!(summary.iterations >= 1);
    assert!(!worker.is_active());
    assert!(worker.stop().is_none());
}

#[test]
fn invalid_config_is_rejected_up_front() {
    let bad = TrainerConfig {
        mutation_rate: 2.0,
        ..config(Some(1))
    };
    let error = TrainingWorker::start(bad, None).unwrap_err();
    assert_eq!(error, TrainerConfigError::MutationRate { rate: 2.0 });
}
