use crate::{Grid, Placement, PlacementError};

use super::GameStats;

/// Grid plus statistics for one self-play game.
///
/// # Example
///
/// ```
/// use stackbot_engine::{GameField, PieceKind, Placement};
///
/// let mut field = GameField::new();
/// let placement = Placement::enumerate(field.grid(), PieceKind::I).next().unwrap();
/// let cleared = field.lock(&placement).unwrap();
///
/// assert_eq!(cleared, 0);
/// assert_eq!(field.stats().completed_pieces(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct GameField {
    grid: Grid,
    stats: GameStats,
}

impl GameField {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_grid(grid: Grid) -> Self {
        Self {
            grid,
            stats: GameStats::new(),
        }
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    /// Locks the placement, clears full lines and returns how many were cleared.
    ///
    /// On error the field is left unchanged.
    pub fn lock(&mut self, placement: &Placement) -> Result<usize, PlacementError> {
        let mut grid = self.grid.with_placement(placement)?;
        let cleared = grid.clear_lines();
        self.grid = grid;
        self.stats.record_placement(cleared);
        Ok(cleared)
    }
}
