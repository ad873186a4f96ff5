use std::fmt;

use serde::{Deserialize, Serialize};

use super::{
    grid::Grid,
    piece::{PieceKind, PieceRotation, PieceShape},
};

/// A fully resolved hard drop: piece kind, rotation state, the leftmost
/// column of the piece's bounding box and the row its top edge lands on.
///
/// Placements are produced against a specific grid; the landing row is only
/// meaningful for that grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Placement {
    kind: PieceKind,
    rotation: PieceRotation,
    column: u8,
    row: u8,
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}#{}@{},{}",
            self.kind, self.rotation, self.column, self.row
        )
    }
}

impl Placement {
    /// Drops `kind` in `rotation` at `column` and returns the resolved placement.
    ///
    /// Returns `None` when the piece does not fit horizontally or is blocked
    /// at spawn.
    #[must_use]
    pub fn resolve(
        grid: &Grid,
        kind: PieceKind,
        rotation: PieceRotation,
        column: usize,
    ) -> Option<Self> {
        let shape = kind.shape(rotation);
        let x = isize::try_from(column).ok()?;
        let row = grid.drop_row(shape, x)?;
        Some(Self {
            kind,
            rotation,
            column: u8::try_from(column).ok()?,
            row: u8::try_from(row).ok()?,
        })
    }

    /// Enumerates every reachable placement of `kind` on `grid`.
    ///
    /// Order is rotation-major, then column ascending. Callers that break
    /// ties by first-seen rely on this order.
    pub fn enumerate(grid: &Grid, kind: PieceKind) -> impl Iterator<Item = Self> + '_ {
        kind.rotations().flat_map(move |rotation| {
            let width = kind.shape(rotation).width();
            (0..=Grid::WIDTH - width)
                .filter_map(move |column| Self::resolve(grid, kind, rotation, column))
        })
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub fn rotation(&self) -> PieceRotation {
        self.rotation
    }

    #[must_use]
    pub fn column(&self) -> usize {
        usize::from(self.column)
    }

    #[must_use]
    pub fn row(&self) -> usize {
        usize::from(self.row)
    }

    #[must_use]
    pub fn shape(&self) -> &'static PieceShape {
        self.kind.shape(self.rotation)
    }

    /// Absolute board coordinates of the four cells this placement occupies.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> {
        let (column, row) = (self.column(), self.row());
        self.shape()
            .offsets()
            .map(move |(dx, dy)| (column + dx, row + dy))
    }

    /// Row of the lowest cell of the piece.
    #[must_use]
    pub fn bottom_row(&self) -> usize {
        self.row() + self.shape().height() - 1
    }
}
