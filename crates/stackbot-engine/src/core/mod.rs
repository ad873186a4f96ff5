pub use self::{grid::*, piece::*, placement::*};

pub(crate) mod grid;
pub(crate) mod piece;
pub(crate) mod placement;

/// Number of columns on the board.
pub const BOARD_WIDTH: usize = 12;
/// Number of rows on the board. Row 0 is the top row.
pub const BOARD_HEIGHT: usize = 20;
