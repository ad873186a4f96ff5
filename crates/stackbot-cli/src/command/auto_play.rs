use std::{collections::VecDeque, path::PathBuf};

use serde::Serialize;
use stackbot_engine::{GameField, GameStats, PieceGenerator, PieceKind, Placement};
use stackbot_evaluator::{
    heuristic::HeuristicEvaluator,
    placement_evaluator::WeightedPlacementEvaluator,
    turn_evaluator::TurnEvaluator,
    weights::WeightVector,
};
use stackbot_search::beam::{BeamConfig, BeamPlanner, DEFAULT_BEAM_WIDTH, DEFAULT_MAX_DEPTH};

use crate::util::{self, Output};

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr, derive_more::Display)]
pub(crate) enum Policy {
    #[default]
    Heuristic,
    Weighted,
    Beam,
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct AutoPlayArg {
    /// Placement policy: heuristic, weighted or beam
    #[arg(long, default_value = "heuristic")]
    policy: Policy,
    /// Weights for the weighted policy; baseline weights when omitted
    #[arg(long)]
    weights: Option<PathBuf>,
    /// Placements after which the game is stopped
    #[arg(long, default_value_t = 1000)]
    moves: usize,
    /// Seed of the piece sequence
    #[arg(long)]
    rng_seed: Option<u64>,
    /// Candidates kept per search generation (beam policy)
    #[arg(long, default_value_t = DEFAULT_BEAM_WIDTH)]
    beam_width: usize,
    /// Pieces searched ahead (beam policy)
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,
    /// File to write the game report to; stdout when omitted
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct GameReport {
    policy: String,
    topped_out: bool,
    stats: GameStats,
}

pub(crate) fn run(arg: &AutoPlayArg) -> anyhow::Result<()> {
    let weights = match &arg.weights {
        Some(path) => util::read_weights_file(path)?.weights(),
        None => WeightVector::default(),
    };
    let mut pieces = match arg.rng_seed {
        Some(seed) => PieceGenerator::with_seed(seed),
        None => PieceGenerator::from_entropy(),
    };
    let policy = PolicyState::new(arg, weights);
    let lookahead = match arg.policy {
        Policy::Beam => arg.max_depth.max(1),
        Policy::Heuristic | Policy::Weighted => 1,
    };

    let mut field = GameField::new();
    let mut queue: VecDeque<PieceKind> = (&mut pieces).take(lookahead).collect();
    let mut topped_out = false;

    while field.stats().completed_pieces() < arg.moves {
        let Some(placement) = policy.choose(&field, queue.make_contiguous()) else {
            topped_out = true;
            break;
        };
        let cleared = field.lock(&placement)?;
        tracing::debug!(%placement, cleared, "piece locked");
        queue.pop_front();
        queue.push_back(pieces.next_piece());
    }

    let stats = field.stats().clone();
    eprintln!("Policy: {}", arg.policy);
    eprintln!("  Pieces: {}", stats.completed_pieces());
    eprintln!("  Lines: {}", stats.total_cleared_lines());
    eprintln!("  Score: {}", stats.score());
    if topped_out {
        eprintln!("  Topped out");
    }

    let report = GameReport {
        policy: arg.policy.to_string(),
        topped_out,
        stats,
    };
    Output::save_json(&report, arg.output.clone())?;
    Ok(())
}

enum PolicyState {
    Heuristic,
    Weighted(TurnEvaluator<'static>),
    Beam(BeamPlanner),
}

impl PolicyState {
    fn new(arg: &AutoPlayArg, weights: WeightVector) -> Self {
        match arg.policy {
            Policy::Heuristic => Self::Heuristic,
            Policy::Weighted => Self::Weighted(TurnEvaluator::new(Box::new(
                WeightedPlacementEvaluator::new(weights),
            ))),
            Policy::Beam => Self::Beam(BeamPlanner::new(BeamConfig::new(
                arg.beam_width,
                arg.max_depth,
            ))),
        }
    }

    fn choose(&self, field: &GameField, queue: &[PieceKind]) -> Option<Placement> {
        let &current = queue.first()?;
        match self {
            Self::Heuristic => HeuristicEvaluator::new(field.grid())
                .select(current)
                .map(|choice| choice.placement),
            Self::Weighted(evaluator) => evaluator
                .select_best_turn(field.grid(), current)
                .map(|(placement, _)| placement),
            Self::Beam(planner) => planner.plan(field.grid(), queue).map(|plan| plan.first),
        }
    }
}
