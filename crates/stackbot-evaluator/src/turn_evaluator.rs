//! Greedy one-ply turn selection and self-play sessions.
//!
//! [`TurnEvaluator`] scores every placement of the current piece with a
//! [`PlacementEvaluator`] and commits the highest-scoring one. The first
//! enumerated placement wins ties.

use stackbot_engine::{GameField, GameStats, Grid, PieceKind, Placement};

use crate::{placement_analysis::PlacementAnalysis, placement_evaluator::PlacementEvaluator};

#[derive(Debug)]
pub struct TurnEvaluator<'a> {
    placement_evaluator: Box<dyn PlacementEvaluator + 'a>,
}

impl<'a> TurnEvaluator<'a> {
    #[must_use]
    pub fn new(placement_evaluator: Box<dyn PlacementEvaluator + 'a>) -> Self {
        Self {
            placement_evaluator,
        }
    }

    /// Selects the best placement of `kind` on `grid`.
    ///
    /// Returns `None` when the piece has no reachable placement.
    #[must_use]
    pub fn select_best_turn(
        &self,
        grid: &Grid,
        kind: PieceKind,
    ) -> Option<(Placement, PlacementAnalysis)> {
        let mut best_score = f32::NEG_INFINITY;
        let mut best_result = None;

        for placement in Placement::enumerate(grid, kind) {
            let Ok(analysis) = PlacementAnalysis::from_grid(grid, placement) else {
                continue;
            };
            let score = self.placement_evaluator.evaluate_placement(&analysis);
            if best_result.is_none() || score > best_score {
                best_score = score;
                best_result = Some((placement, analysis));
            }
        }

        best_result
    }

    /// Plays pieces from `pieces` onto `field` until `move_cap` placements were
    /// made, the piece source runs dry or a piece has nowhere to go.
    pub fn play_session<I>(&self, field: &mut GameField, pieces: I, move_cap: usize) -> GameStats
    where
        I: IntoIterator<Item = PieceKind>,
    {
        for kind in pieces.into_iter().take(move_cap) {
            let Some((placement, _analysis)) = self.select_best_turn(field.grid(), kind) else {
                break;
            };
            if field.lock(&placement).is_err() {
                break;
            }
        }
        field.stats().clone()
    }
}

#[cfg(test)]
mod tests {
    use stackbot_engine::PieceGenerator;

    use super::*;
    use crate::placement_evaluator::WeightedPlacementEvaluator;

    #[test]
    fn test_select_best_turn_takes_line_clear() {
        let grid = Grid::from_ascii("####....####");
        let evaluator = TurnEvaluator::new(Box::new(WeightedPlacementEvaluator::default()));
        let (placement, analysis) = evaluator.select_best_turn(&grid, PieceKind::I).unwrap();
        assert_eq!(placement.column(), 4);
        assert_eq!(analysis.cleared_lines(), 1);
    }

    #[test]
    fn test_play_session_respects_move_cap() {
        let evaluator = TurnEvaluator::new(Box::new(WeightedPlacementEvaluator::default()));
        let mut field = GameField::new();
        let stats = evaluator.play_session(&mut field, PieceGenerator::with_seed(3), 25);
        assert!(stats.completed_pieces() <= 25);
        assert_eq!(stats.completed_pieces(), field.stats().completed_pieces());
    }

    #[test]
    fn test_play_session_stops_when_stuck() {
        // Every column is blocked at the top row.
        let grid = Grid::from_ascii(&"#.#.#.#.#.#.\n".repeat(stackbot_engine::BOARD_HEIGHT));
        let mut field = GameField::with_grid(grid);
        let evaluator = TurnEvaluator::new(Box::new(WeightedPlacementEvaluator::default()));
        let stats = evaluator.play_session(&mut field, [PieceKind::O, PieceKind::T], 10);
        assert_eq!(stats.completed_pieces(), 0);
    }
}
