use std::path::PathBuf;

use anyhow::Context;
use stackbot_training::{trainer::TrainerConfig, worker::TrainingWorker};

use crate::{
    model::TrainedModel,
    util::{self, Output},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// Weights to start from (trained model or bare weight object)
    #[arg(long)]
    seed_weights: Option<PathBuf>,
    /// File to write the trained model to; stdout when omitted
    #[arg(long)]
    output: Option<PathBuf>,
    /// Candidates to evaluate
    #[arg(long, default_value_t = 100)]
    iterations: usize,
    /// Games played per candidate
    #[arg(long, default_value_t = 3)]
    games: usize,
    /// Placements after which a game is stopped
    #[arg(long, default_value_t = 500)]
    move_cap: usize,
    /// Probability that a coefficient is perturbed
    #[arg(long, default_value_t = 0.3)]
    mutation_rate: f64,
    /// Maximum relative step of a perturbation
    #[arg(long, default_value_t = 0.2)]
    mutation_strength: f32,
    /// Seed for reproducible runs
    #[arg(long)]
    rng_seed: Option<u64>,
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let TrainArg {
        seed_weights,
        output,
        iterations,
        games,
        move_cap,
        mutation_rate,
        mutation_strength,
        rng_seed,
    } = arg;

    let seed = seed_weights
        .as_ref()
        .map(|path| util::read_weights_file(path).map(|file| file.weights()))
        .transpose()?;

    let config = TrainerConfig {
        games_per_candidate: *games,
        move_cap: *move_cap,
        mutation_rate: *mutation_rate,
        mutation_strength: *mutation_strength,
        max_iterations: Some(*iterations),
        rng_seed: *rng_seed,
    };

    eprintln!("Training weights...");
    eprintln!("  Iterations: {iterations}");
    eprintln!("  Games per candidate: {games}");
    eprintln!("  Move cap: {move_cap}");
    eprintln!();

    let mut worker = TrainingWorker::start(config, seed).context("Invalid training settings")?;
    for event in worker.events() {
        eprintln!(
            "  [{:>4}/{iterations}] fitness {:.2}",
            event.iteration, event.fitness
        );
        eprintln!("{}", serde_json::to_string(&event)?);
    }
    let summary = worker
        .join()
        .context("Training stopped without producing a result")?;

    eprintln!();
    eprintln!("Training complete");
    eprintln!("  Improvements: {}", summary.improvements);
    if let Some(fitness) = summary.best_fitness {
        eprintln!("  Best fitness: {fitness:.2}");
    }
    eprintln!("  Best weights: {}", summary.best_weights);

    let model = TrainedModel::from_summary(&summary);
    Output::save_json(&model, output.clone())?;
    Ok(())
}
