use stackbot_engine::{BOARD_HEIGHT, Grid, Placement, PlacementError};

use crate::board_analysis::BoardAnalysis;

/// A placement applied to a grid: lines it cleared plus lazy metrics of the
/// resulting (post-clear) grid.
#[derive(Debug)]
pub struct PlacementAnalysis {
    placement: Placement,
    cleared_lines: usize,
    board_analysis: BoardAnalysis,
}

impl PlacementAnalysis {
    pub fn from_grid(
        before_placement: &Grid,
        placement: Placement,
    ) -> Result<Self, PlacementError> {
        let mut grid = before_placement.with_placement(&placement)?;
        let cleared_lines = grid.clear_lines();
        Ok(Self {
            placement,
            cleared_lines,
            board_analysis: BoardAnalysis::from_grid(&grid),
        })
    }

    #[must_use]
    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    #[must_use]
    pub fn cleared_lines(&self) -> usize {
        self.cleared_lines
    }

    #[must_use]
    pub fn board_analysis(&self) -> &BoardAnalysis {
        &self.board_analysis
    }

    /// Height of the piece's vertical centre above the floor, before clearing.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn landing_height(&self) -> f32 {
        let top = BOARD_HEIGHT - self.placement.row();
        top as f32 - self.placement.shape().height() as f32 / 2.0
    }
}
