use serde::{Deserialize, Serialize};

use super::{
    BOARD_HEIGHT, BOARD_WIDTH,
    piece::{PieceKind, PieceShape},
    placement::Placement,
};

/// Wire identifier used when a [`Block::Garbage`] cell is written back out.
pub const GARBAGE_ID: u8 = 8;

/// A single cell of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Block {
    /// Empty cell.
    #[default]
    Empty,
    /// Occupied cell whose piece type is unknown.
    Garbage,
    /// Locked cell of a specific piece type.
    Piece(PieceKind),
}

impl Block {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Block::Empty
    }

    #[must_use]
    pub fn is_solid(self) -> bool {
        !self.is_empty()
    }

    /// Decodes a wire cell value: `0` is empty, `1..=7` a piece kind, anything
    /// else an untyped occupied cell.
    #[must_use]
    pub fn from_id(id: u8) -> Self {
        match id {
            0 => Block::Empty,
            id => PieceKind::from_id(id).map_or(Block::Garbage, Block::Piece),
        }
    }

    #[must_use]
    pub fn id(self) -> u8 {
        match self {
            Block::Empty => 0,
            Block::Garbage => GARBAGE_ID,
            Block::Piece(kind) => kind.id(),
        }
    }
}

/// Error returned when a placement cannot be locked onto a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum PlacementError {
    #[display("piece cell ({x}, {y}) is outside the board")]
    OutOfBounds { x: isize, y: isize },
    #[display("piece cell in column {x} would lock above the top row")]
    AboveCeiling { x: isize },
    #[display("piece cell ({x}, {y}) collides with an occupied cell")]
    Collision { x: usize, y: usize },
}

/// Error returned when raw rows do not describe a `BOARD_HEIGHT` × `BOARD_WIDTH` grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum GridShapeError {
    #[display("expected {BOARD_HEIGHT} rows, got {actual}")]
    WrongHeight { actual: usize },
    #[display("expected {BOARD_WIDTH} cells in row {row}, got {actual}")]
    WrongWidth { row: usize, actual: usize },
}

/// Result of [`Grid::count_holes`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HoleSummary {
    /// Number of hole runs.
    pub count: u32,
    /// Summed length of all hole runs.
    pub depth: u32,
}

/// A single row of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridRow {
    cells: [Block; BOARD_WIDTH],
}

impl GridRow {
    pub const EMPTY: Self = Self {
        cells: [Block::Empty; BOARD_WIDTH],
    };

    #[must_use]
    pub fn cells(&self) -> &[Block; BOARD_WIDTH] {
        &self.cells
    }

    #[must_use]
    pub fn is_filled(&self) -> bool {
        self.cells.iter().all(|b| b.is_solid())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|b| b.is_empty())
    }
}

/// Fixed-size occupancy grid.
///
/// The grid always has exactly [`BOARD_HEIGHT`] rows of [`BOARD_WIDTH`] cells.
/// Row 0 is the top row and `y` grows downward; pieces fall toward larger `y`.
///
/// Coordinates passed to the collision helpers are signed: a piece cell with a
/// negative row sits above the visible board (spawn overhang) and never
/// collides.
///
/// # Example
///
/// ```
/// use stackbot_engine::{Grid, PieceKind, Placement, PieceRotation};
///
/// let grid = Grid::EMPTY;
/// let placement = Placement::resolve(&grid, PieceKind::O, PieceRotation::default(), 0).unwrap();
/// let locked = grid.with_placement(&placement).unwrap();
/// let (cleared, lines) = locked.cleared();
///
/// assert_eq!(lines, 0);
/// assert_eq!(cleared, locked);
/// assert!(grid.rows().all(|row| row.is_empty()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    rows: [GridRow; BOARD_HEIGHT],
}

impl Default for Grid {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Serialize for Grid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Format: array of rows, each an array of wire cell ids
        serializer.collect_seq(self.to_cell_ids())
    }
}

impl<'de> Deserialize<'de> for Grid {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let rows = Vec::<Vec<u8>>::deserialize(deserializer)?;
        Grid::from_cell_ids(&rows).map_err(serde::de::Error::custom)
    }
}

impl Grid {
    pub const WIDTH: usize = BOARD_WIDTH;
    pub const HEIGHT: usize = BOARD_HEIGHT;

    pub const EMPTY: Self = Self {
        rows: [GridRow::EMPTY; BOARD_HEIGHT],
    };

    /// Builds a grid from wire rows (top row first).
    pub fn from_cell_ids<R>(rows: &[R]) -> Result<Self, GridShapeError>
    where
        R: AsRef<[u8]>,
    {
        if rows.len() != BOARD_HEIGHT {
            return Err(GridShapeError::WrongHeight { actual: rows.len() });
        }
        let mut grid = Self::EMPTY;
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != BOARD_WIDTH {
                return Err(GridShapeError::WrongWidth {
                    row: y,
                    actual: row.len(),
                });
            }
            for (cell, &id) in grid.rows[y].cells.iter_mut().zip(row) {
                *cell = Block::from_id(id);
            }
        }
        Ok(grid)
    }

    /// Returns the grid as wire rows (top row first).
    #[must_use]
    pub fn to_cell_ids(&self) -> Vec<Vec<u8>> {
        self.rows
            .iter()
            .map(|row| row.cells.iter().map(|b| b.id()).collect())
            .collect()
    }

    /// Iterates the rows from top to bottom.
    pub fn rows(&self) -> impl DoubleEndedIterator<Item = &GridRow> + ExactSizeIterator {
        self.rows.iter()
    }

    #[must_use]
    pub fn cell(&self, x: usize, y: usize) -> Block {
        self.rows[y].cells[x]
    }

    #[must_use]
    pub fn is_occupied(&self, x: usize, y: usize) -> bool {
        self.cell(x, y).is_solid()
    }

    /// Returns whether the signed coordinate is a wall, the floor or a solid
    /// cell. Cells above the top row count as open.
    #[must_use]
    pub fn is_solid_at(&self, x: isize, y: isize) -> bool {
        let Ok(ux) = usize::try_from(x) else {
            return true;
        };
        if ux >= BOARD_WIDTH {
            return true;
        }
        let Ok(uy) = usize::try_from(y) else {
            return false;
        };
        uy >= BOARD_HEIGHT || self.is_occupied(ux, uy)
    }

    /// Overwrites a single cell.
    pub fn fill_block_at(&mut self, x: usize, y: usize, block: Block) {
        self.rows[y].cells[x] = block;
    }

    /// Number of empty cells on the grid.
    #[must_use]
    pub fn empty_cell_count(&self) -> usize {
        self.rows
            .iter()
            .map(|row| row.cells.iter().filter(|b| b.is_empty()).count())
            .sum()
    }

    /// Checks whether a piece with top-left corner at `(x, y)` fits.
    ///
    /// Every cell must land in an existing column and at or above the floor.
    /// Cells with a negative row are above the visible board and always fit;
    /// all other cells must be empty.
    #[must_use]
    pub fn is_placeable(&self, shape: &PieceShape, x: isize, y: isize) -> bool {
        shape.offsets().all(|(dx, dy)| {
            let cx = x + dx.cast_signed();
            let cy = y + dy.cast_signed();
            let Ok(cx) = usize::try_from(cx) else {
                return false;
            };
            if cx >= BOARD_WIDTH || cy >= BOARD_HEIGHT.cast_signed() {
                return false;
            }
            usize::try_from(cy).map_or(true, |cy| self.rows[cy].cells[cx].is_empty())
        })
    }

    /// Resolves the landing row of a piece dropped in column `x`.
    ///
    /// The piece starts at row 0 and falls while the next row down is still
    /// placeable. Returns `None` when the piece does not fit at row 0 (it is
    /// stuck at spawn and the placement is unreachable).
    #[must_use]
    pub fn drop_row(&self, shape: &PieceShape, x: isize) -> Option<isize> {
        let mut y = 0;
        if !self.is_placeable(shape, x, y) {
            return None;
        }
        while self.is_placeable(shape, x, y + 1) {
            y += 1;
        }
        Some(y)
    }

    /// Returns a copy of the grid with the placement's cells locked in.
    ///
    /// The receiver is never modified.
    pub fn with_placement(&self, placement: &Placement) -> Result<Self, PlacementError> {
        let mut grid = self.clone();
        grid.lock_cells(
            placement.shape(),
            placement.column().cast_signed(),
            placement.row().cast_signed(),
            Block::Piece(placement.kind()),
        )?;
        Ok(grid)
    }

    /// Locks `shape` at `(x, y)` in place, leaving the grid untouched on error.
    pub fn lock_cells(
        &mut self,
        shape: &PieceShape,
        x: isize,
        y: isize,
        block: Block,
    ) -> Result<(), PlacementError> {
        let mut targets = [(0, 0); 4];
        for ((dx, dy), target) in shape.offsets().zip(&mut targets) {
            let cx = x + dx.cast_signed();
            let cy = y + dy.cast_signed();
            let (Ok(ux), Ok(uy)) = (usize::try_from(cx), usize::try_from(cy)) else {
                if cx < 0 || cx >= BOARD_WIDTH.cast_signed() {
                    return Err(PlacementError::OutOfBounds { x: cx, y: cy });
                }
                return Err(PlacementError::AboveCeiling { x: cx });
            };
            if ux >= BOARD_WIDTH || uy >= BOARD_HEIGHT {
                return Err(PlacementError::OutOfBounds { x: cx, y: cy });
            }
            if self.rows[uy].cells[ux].is_solid() {
                return Err(PlacementError::Collision { x: ux, y: uy });
            }
            *target = (ux, uy);
        }
        for (x, y) in targets {
            self.rows[y].cells[x] = block;
        }
        Ok(())
    }

    /// Clears filled lines in place and returns the number of lines cleared.
    ///
    /// Remaining rows keep their order and empty rows are inserted at the top.
    pub fn clear_lines(&mut self) -> usize {
        let mut count = 0;
        for y in (0..BOARD_HEIGHT).rev() {
            if self.rows[y].is_filled() {
                count += 1;
                continue;
            }
            if count > 0 {
                self.rows[y + count] = self.rows[y];
            }
        }
        self.rows[..count].fill(GridRow::EMPTY);
        count
    }

    /// Returns a copy with all filled lines cleared, together with the count.
    #[must_use]
    pub fn cleared(&self) -> (Self, usize) {
        let mut grid = self.clone();
        let count = grid.clear_lines();
        (grid, count)
    }

    /// Counts structural holes column by column.
    ///
    /// A hole run is a maximal vertical run of empty cells with a solid cell
    /// (or the floor) directly below it and a solid cell directly above it.
    /// Runs touching the top edge are open sky, not holes. Each run counts once
    /// and contributes its length to the depth.
    #[must_use]
    pub fn count_holes(&self) -> HoleSummary {
        let mut summary = HoleSummary::default();
        for x in 0..BOARD_WIDTH {
            let mut y = 0;
            while y < BOARD_HEIGHT {
                if self.is_occupied(x, y) {
                    y += 1;
                    continue;
                }
                let start = y;
                while y < BOARD_HEIGHT && !self.is_occupied(x, y) {
                    y += 1;
                }
                // `y` now points at the solid base or one past the floor.
                if start > 0 {
                    summary.count += 1;
                    summary.depth += u32::try_from(y - start).unwrap_or(u32::MAX);
                }
            }
        }
        summary
    }

    /// Creates a grid from ASCII art, mainly for tests.
    ///
    /// `.` is empty, `#` is garbage and a piece letter (`I`, `O`, ...) is a
    /// locked cell of that kind. Rows are given top to bottom and are aligned
    /// to the bottom of the board, so fewer than [`BOARD_HEIGHT`] rows may be
    /// given. Whitespace is ignored.
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        let mut grid = Self::EMPTY;
        let lines: Vec<Vec<char>> = art
            .lines()
            .map(|line| line.chars().filter(|c| !c.is_whitespace()).collect())
            .filter(|chars: &Vec<char>| !chars.is_empty())
            .collect();
        assert!(
            lines.len() <= BOARD_HEIGHT,
            "at most {BOARD_HEIGHT} rows allowed, got {}",
            lines.len()
        );
        let offset = BOARD_HEIGHT - lines.len();
        for (i, chars) in lines.iter().enumerate() {
            assert_eq!(
                chars.len(),
                BOARD_WIDTH,
                "Each row must have exactly {BOARD_WIDTH} cells, got {} at row {i}",
                chars.len(),
            );
            for (x, &ch) in chars.iter().enumerate() {
                let block = match ch {
                    '.' => Block::Empty,
                    '#' => Block::Garbage,
                    c => Block::Piece(
                        PieceKind::from_char(c)
                            .unwrap_or_else(|| panic!("invalid cell character: {c:?}")),
                    ),
                };
                grid.rows[offset + i].cells[x] = block;
            }
        }
        grid
    }
}
