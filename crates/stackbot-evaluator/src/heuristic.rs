//! Greedy single-ply placement selection by lexicographic ranking.
//!
//! Every placement of the active piece is simulated (lock, then clear) and
//! ranked by a [`PlacementRank`]. Terms are compared in priority order and a
//! later term only matters when all earlier ones tie:
//!
//! 1. lines cleared (more is better)
//! 2. change in hole-run count versus the current grid (lower is better)
//! 3. hole cells eliminated (more is better)
//! 4. piece cells inside the current [`CavityMask`] (more is better)
//! 5. left/right contact with walls or previously placed cells (more is better)
//! 6. landing row (deeper is better)
//! 7. remaining hole depth (lower is better)
//!
//! The first enumerated placement wins any remaining tie.

use std::cmp::Reverse;

use arrayvec::ArrayVec;
use stackbot_engine::{BOARD_WIDTH, Grid, HoleSummary, PieceKind, Placement};

use crate::cavity::CavityMask;

/// Ranking key of one simulated placement. Larger compares better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PlacementRank {
    pub lines: usize,
    pub hole_delta: Reverse<i64>,
    pub holes_eliminated: u32,
    pub cavity_overlap: usize,
    pub contact: usize,
    pub landing_row: usize,
    pub hole_depth: Reverse<u32>,
}

/// The placement chosen by [`HeuristicEvaluator::select`].
#[derive(Debug, Clone)]
pub struct HeuristicChoice {
    pub placement: Placement,
    pub rank: PlacementRank,
    /// Grid after locking and clearing.
    pub grid: Grid,
}

/// Pre-move state shared by every candidate of one decision.
#[derive(Debug, Clone)]
pub struct HeuristicEvaluator {
    grid: Grid,
    holes: HoleSummary,
    cavities: CavityMask,
}

impl HeuristicEvaluator {
    #[must_use]
    pub fn new(grid: &Grid) -> Self {
        Self {
            grid: grid.clone(),
            holes: grid.count_holes(),
            cavities: CavityMask::from_grid(grid),
        }
    }

    #[must_use]
    pub fn cavities(&self) -> &CavityMask {
        &self.cavities
    }

    /// Simulates `placement` and computes its rank.
    ///
    /// Returns `None` if the placement does not apply cleanly to the grid.
    #[must_use]
    pub fn rank(&self, placement: &Placement) -> Option<(PlacementRank, Grid)> {
        let locked = self.grid.with_placement(placement).ok()?;
        let cells: ArrayVec<(usize, usize), 4> = placement.cells().collect();

        let cavity_overlap = cells
            .iter()
            .filter(|&&(x, y)| self.cavities.contains(x, y))
            .count();
        let contact = cells
            .iter()
            .map(|&(x, y)| {
                let sides = [x.checked_sub(1), Some(x + 1)];
                sides
                    .into_iter()
                    .filter(|side| match *side {
                        Some(nx) if nx < BOARD_WIDTH => {
                            locked.is_occupied(nx, y) && !cells.contains(&(nx, y))
                        }
                        _ => true,
                    })
                    .count()
            })
            .sum();

        let (cleared, lines) = locked.cleared();
        let post = cleared.count_holes();
        let rank = PlacementRank {
            lines,
            hole_delta: Reverse(i64::from(post.count) - i64::from(self.holes.count)),
            holes_eliminated: self.holes.depth.saturating_sub(post.depth),
            cavity_overlap,
            contact,
            landing_row: placement.row(),
            hole_depth: Reverse(post.depth),
        };
        Some((rank, cleared))
    }

    /// Picks the best placement of `kind`, or `None` when it cannot be placed.
    #[must_use]
    pub fn select(&self, kind: PieceKind) -> Option<HeuristicChoice> {
        let mut best: Option<HeuristicChoice> = None;
        for placement in Placement::enumerate(&self.grid, kind) {
            let Some((rank, grid)) = self.rank(&placement) else {
                continue;
            };
            if best.as_ref().is_none_or(|b| rank > b.rank) {
                best = Some(HeuristicChoice {
                    placement,
                    rank,
                    grid,
                });
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use stackbot_engine::PieceRotation;

    use super::*;

    #[test]
    fn test_rank_ordering_is_lexicographic() {
        let base = PlacementRank {
            lines: 0,
            hole_delta: Reverse(0),
            holes_eliminated: 0,
            cavity_overlap: 0,
            contact: 0,
            landing_row: 0,
            hole_depth: Reverse(0),
        };
        let more_lines = PlacementRank {
            lines: 1,
            hole_delta: Reverse(3),
            ..base
        };
        let fewer_holes = PlacementRank {
            hole_delta: Reverse(-1),
            ..base
        };
        let deeper = PlacementRank {
            landing_row: 19,
            ..base
        };
        assert!(more_lines > fewer_holes);
        assert!(fewer_holes > base);
        assert!(PlacementRank { contact: 1, ..base } > deeper);
        let holey = PlacementRank {
            hole_depth: Reverse(2),
            ..base
        };
        assert!(deeper > holey);
    }

    #[test]
    fn test_prefers_line_clear() {
        let grid = Grid::from_ascii("####....####");
        let choice = HeuristicEvaluator::new(&grid).select(PieceKind::I).unwrap();
        assert_eq!(choice.rank.lines, 1);
        assert_eq!(choice.placement.column(), 4);
        assert_eq!(choice.grid, Grid::EMPTY);
    }

    #[test]
    fn test_avoids_creating_holes() {
        let grid = Grid::from_ascii(
            "
            ##..........
            ##..........
            ",
        );
        let evaluator = HeuristicEvaluator::new(&grid);
        let choice = evaluator.select(PieceKind::O).unwrap();
        assert_eq!(choice.rank.hole_delta, Reverse(0));
        // Deepest hole-free spot hugging the existing stack.
        assert_eq!(choice.placement.column(), 2);
        assert_eq!(choice.placement.row(), 18);
    }

    #[test]
    fn test_fills_cavity() {
        let grid = Grid::from_ascii(
            "
            #####..#####
            #####..#####
            ",
        );
        let evaluator = HeuristicEvaluator::new(&grid);
        assert_eq!(evaluator.cavities().count(), 4);
        let choice = evaluator.select(PieceKind::O).unwrap();
        assert_eq!(choice.rank.lines, 2);
        assert_eq!(choice.placement.column(), 5);
    }

    #[test]
    fn test_cavity_overlap_breaks_hole_tie() {
        let grid = Grid::from_ascii(
            "
            ###..#......
            ###..#......
            ",
        );
        let evaluator = HeuristicEvaluator::new(&grid);
        assert_eq!(evaluator.cavities().count(), 4);

        let first = Placement::enumerate(&grid, PieceKind::O).next().unwrap();
        assert_eq!(first.column(), 0);
        let (first_rank, _) = evaluator.rank(&first).unwrap();

        let choice = evaluator.select(PieceKind::O).unwrap();
        assert_eq!(choice.placement.column(), 3);
        assert_eq!(choice.placement.row(), 18);
        assert_eq!(choice.rank.lines, first_rank.lines);
        assert_eq!(choice.rank.hole_delta, first_rank.hole_delta);
        assert_eq!(choice.rank.holes_eliminated, first_rank.holes_eliminated);
        assert_eq!(choice.rank.cavity_overlap, 4);
        assert_eq!(first_rank.cavity_overlap, 0);
    }

    #[test]
    fn test_holes_eliminated_breaks_hole_tie() {
        // Row 17 is complete once column 5 is filled. Clearing it uncovers
        // the two-deep hole in column 6 unless the piece lies on top of it.
        let grid = Grid::from_ascii(
            "
            #####.######
            ######.#####
            ######.#####
            ",
        );
        let evaluator = HeuristicEvaluator::new(&grid);
        assert_eq!(grid.count_holes(), HoleSummary { count: 1, depth: 2 });

        // Overhang to the right covers column 6 again.
        let covering = Placement::resolve(&grid, PieceKind::L, PieceRotation::new(2), 5).unwrap();
        let (covering_rank, _) = evaluator.rank(&covering).unwrap();
        assert_eq!(covering_rank.lines, 1);
        assert_eq!(covering_rank.hole_delta, Reverse(0));
        assert_eq!(covering_rank.holes_eliminated, 0);

        // Overhang to the left opens column 6 but leaves a new one-deep hole.
        let choice = evaluator.select(PieceKind::L).unwrap();
        assert_eq!(choice.placement.rotation(), PieceRotation::new(3));
        assert_eq!(choice.placement.column(), 4);
        assert_eq!(choice.rank.lines, 1);
        assert_eq!(choice.rank.hole_delta, Reverse(0));
        assert_eq!(choice.rank.holes_eliminated, 1);
        assert_eq!(choice.grid.count_holes(), HoleSummary { count: 1, depth: 1 });
    }

    #[test]
    fn test_contact_counts_walls_and_stack_only() {
        let grid = Grid::from_ascii("#...........");
        let evaluator = HeuristicEvaluator::new(&grid);
        let placement =
            Placement::resolve(&grid, PieceKind::O, PieceRotation::new(0), 1).unwrap();
        let (rank, _) = evaluator.rank(&placement).unwrap();
        // (1, 19) touches the garbage cell; own cells do not count.
        assert_eq!(rank.contact, 1);

        let at_wall = Placement::resolve(&grid, PieceKind::O, PieceRotation::new(0), 0).unwrap();
        let (rank, _) = evaluator.rank(&at_wall).unwrap();
        // Resting on the garbage at rows 17-18, both rows touch the wall.
        assert_eq!(rank.contact, 2);
    }

    #[test]
    fn test_first_enumerated_wins_ties() {
        let grid = Grid::EMPTY;
        let evaluator = HeuristicEvaluator::new(&grid);
        // O at column 0 and column 10 tie on every term.
        let choice = evaluator.select(PieceKind::O).unwrap();
        assert_eq!(choice.placement.column(), 0);
    }
}
