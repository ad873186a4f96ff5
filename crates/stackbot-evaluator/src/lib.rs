//! Board evaluation for the stackbot placement engine.
//!
//! Two independent families of evaluation live here:
//!
//! 1. **Structural analysis** used for search and greedy play
//!    - [`topology`] - open/closed region flood fill, floor profile and roughness
//!    - [`cavity`] - rectangular pockets shaped to receive a piece
//!    - [`heuristic`] - lexicographic single-ply placement selection
//!
//! 2. **Weighted scoring** trained by self-play
//!    - [`board_analysis`] - lazily computed column/hole/transition metrics
//!    - [`placement_analysis`] - a placement applied to a grid plus its metrics
//!    - [`weights`] - the named coefficient vector
//!    - [`placement_evaluator`] - weighted sum of features for one placement
//!    - [`turn_evaluator`] - best-placement selection and self-play sessions
//!
//! The two families do not share definitions. The cavity mask is a local,
//! shape-based notion for single-ply decisions; topology regions are a
//! connectivity notion for multi-ply search.
//!
//! # Example
//!
//! ```
//! use stackbot_engine::{Grid, PieceKind};
//! use stackbot_evaluator::{
//!     heuristic::HeuristicEvaluator,
//!     placement_evaluator::WeightedPlacementEvaluator,
//!     turn_evaluator::TurnEvaluator,
//! };
//!
//! let grid = Grid::from_ascii("####....####");
//!
//! let greedy = HeuristicEvaluator::new(&grid).select(PieceKind::I).unwrap();
//! assert_eq!(greedy.rank.lines, 1);
//!
//! let weighted = TurnEvaluator::new(Box::new(WeightedPlacementEvaluator::default()));
//! let (placement, _) = weighted.select_best_turn(&grid, PieceKind::I).unwrap();
//! assert_eq!(placement, greedy.placement);
//! ```

pub mod board_analysis;
pub mod cavity;
pub mod heuristic;
pub mod placement_analysis;
pub mod placement_evaluator;
pub mod topology;
pub mod turn_evaluator;
pub mod weights;
