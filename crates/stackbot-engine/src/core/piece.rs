use std::fmt;

use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

/// Enum representing the type of piece.
///
/// On the wire a piece kind is identified by a small integer in `1..=7`
/// (see [`PieceKind::id`]); `0` is reserved for the empty cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// O-piece.
    O = 1,
    /// S-piece.
    S = 2,
    /// Z-piece.
    Z = 3,
    /// J-piece.
    J = 4,
    /// L-piece.
    L = 5,
    /// T-piece.
    T = 6,
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        PieceKind::ALL[rng.random_range(0..PieceKind::LEN)]
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    pub const ALL: [PieceKind; Self::LEN] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
        PieceKind::T,
    ];

    /// Returns the wire identifier of this piece kind (`1..=7`).
    ///
    /// # Examples
    ///
    /// ```
    /// use stackbot_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.id(), 1);
    /// assert_eq!(PieceKind::from_id(PieceKind::T.id()), Some(PieceKind::T));
    /// ```
    #[must_use]
    pub const fn id(self) -> u8 {
        self as u8 + 1
    }

    /// Parses a wire identifier. `0` (empty cell) and values above 7 yield `None`.
    #[must_use]
    pub const fn from_id(id: u8) -> Option<Self> {
        match id {
            1..=7 => Some(Self::ALL[(id - 1) as usize]),
            _ => None,
        }
    }

    /// Number of distinct rotation states of this piece.
    #[must_use]
    pub const fn rotation_count(self) -> usize {
        ROTATION_COUNTS[self as usize] as usize
    }

    /// Iterates the distinct rotation states in canonical order.
    pub fn rotations(self) -> impl Iterator<Item = PieceRotation> {
        (0..ROTATION_COUNTS[self as usize]).map(PieceRotation)
    }

    /// Returns the shape of the piece in the given rotation state.
    ///
    /// Rotation indices wrap around the number of distinct states, so any
    /// [`PieceRotation`] maps to a valid shape.
    #[must_use]
    pub fn shape(self, rotation: PieceRotation) -> &'static PieceShape {
        &PIECE_SHAPES[self as usize][rotation.index() % self.rotation_count()]
    }

    /// Returns the single character representation of this piece kind.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
            PieceKind::T => 'T',
        }
    }

    /// Parses a piece kind from a single character.
    ///
    /// # Examples
    ///
    /// ```
    /// use stackbot_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_char('I'), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_char('X'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'O' => Some(PieceKind::O),
            'S' => Some(PieceKind::S),
            'Z' => Some(PieceKind::Z),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            'T' => Some(PieceKind::T),
            _ => None,
        }
    }
}

/// Rotation state index of a piece.
///
/// `0` is the spawn orientation; each step is a quarter turn. Only the first
/// [`PieceKind::rotation_count`] indices are distinct for a given kind.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize,
)]
#[serde(transparent)]
pub struct PieceRotation(u8);

impl fmt::Display for PieceRotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl PieceRotation {
    #[must_use]
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self.0
    }
}

/// One rotation state of a piece: four cells relative to the top-left corner
/// of the piece's bounding box.
///
/// Cells are normalized so that the leftmost cell has `dx == 0` and the
/// topmost cell has `dy == 0`, and are listed in row-major order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceShape {
    cells: [(u8, u8); 4],
    width: u8,
    height: u8,
}

impl PieceShape {
    /// Relative `(dx, dy)` offsets of the occupied cells.
    #[must_use]
    pub const fn cells(&self) -> &[(u8, u8); 4] {
        &self.cells
    }

    /// Iterates the relative cell offsets as `usize` pairs.
    pub fn offsets(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells
            .iter()
            .map(|&(dx, dy)| (usize::from(dx), usize::from(dy)))
    }

    /// Width of the bounding box in columns.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width as usize
    }

    /// Height of the bounding box in rows.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height as usize
    }

    /// Occupancy matrix of the bounding box (`height` rows of `width` cells).
    #[must_use]
    pub fn matrix(&self) -> Vec<Vec<bool>> {
        let mut matrix = vec![vec![false; self.width()]; self.height()];
        for (dx, dy) in self.offsets() {
            matrix[dy][dx] = true;
        }
        matrix
    }
}

type ShapeMatrix = [[bool; 4]; 4];

/// Generates all 4 rotation states of a shape matrix by rotating 90° clockwise.
///
/// `size` is the effective size of the piece (3 for most pieces, 4 for I, 2 for O).
const fn matrix_rotations(size: usize, matrix: &ShapeMatrix) -> [ShapeMatrix; 4] {
    let mut rotates = [*matrix; 4];
    let mut i = 1;
    while i < 4 {
        let mut rotated = [[false; 4]; 4];
        let mut y = 0;
        while y < size {
            let mut x = 0;
            while x < size {
                rotated[y][x] = rotates[i - 1][size - 1 - x][y];
                x += 1;
            }
            y += 1;
        }
        rotates[i] = rotated;
        i += 1;
    }
    rotates
}

#[expect(clippy::cast_possible_truncation)]
const fn normalize(matrix: &ShapeMatrix) -> PieceShape {
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (4, 4, 0, 0);
    let mut y = 0;
    while y < 4 {
        let mut x = 0;
        while x < 4 {
            if matrix[y][x] {
                if x < min_x {
                    min_x = x;
                }
                if x > max_x {
                    max_x = x;
                }
                if y < min_y {
                    min_y = y;
                }
                if y > max_y {
                    max_y = y;
                }
            }
            x += 1;
        }
        y += 1;
    }

    let mut cells = [(0, 0); 4];
    let mut n = 0;
    let mut y = 0;
    while y < 4 {
        let mut x = 0;
        while x < 4 {
            if matrix[y][x] {
                cells[n] = ((x - min_x) as u8, (y - min_y) as u8);
                n += 1;
            }
            x += 1;
        }
        y += 1;
    }
    assert!(n == 4, "every tetromino has exactly four cells");

    PieceShape {
        cells,
        width: (max_x - min_x + 1) as u8,
        height: (max_y - min_y + 1) as u8,
    }
}

const fn shape_rotations(size: usize, matrix: &ShapeMatrix) -> [PieceShape; 4] {
    let rotates = matrix_rotations(size, matrix);
    [
        normalize(&rotates[0]),
        normalize(&rotates[1]),
        normalize(&rotates[2]),
        normalize(&rotates[3]),
    ]
}

const ROTATION_COUNTS: [u8; PieceKind::LEN] = [2, 1, 2, 2, 4, 4, 4];

static PIECE_SHAPES: [[PieceShape; 4]; PieceKind::LEN] = {
    const C: bool = true;
    const E: bool = false;
    const EEEE: [bool; 4] = [E; 4];
    [
        // I-piece
        shape_rotations(4, &[EEEE, [C, C, C, C], EEEE, EEEE]),
        // O-piece
        shape_rotations(2, &[[C, C, E, E], [C, C, E, E], EEEE, EEEE]),
        // S-piece
        shape_rotations(3, &[[E, C, C, E], [C, C, E, E], EEEE, EEEE]),
        // Z-piece
        shape_rotations(3, &[[C, C, E, E], [E, C, C, E], EEEE, EEEE]),
        // J-piece
        shape_rotations(3, &[[C, E, E, E], [C, C, C, E], EEEE, EEEE]),
        // L-piece
        shape_rotations(3, &[[E, E, C, E], [C, C, C, E], EEEE, EEEE]),
        // T-piece
        shape_rotations(3, &[[E, C, E, E], [C, C, C, E], EEEE, EEEE]),
    ]
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_piece_kind_id_conversion() {
        for (i, kind) in PieceKind::ALL.into_iter().enumerate() {
            assert_eq!(usize::from(kind.id()), i + 1);
            assert_eq!(PieceKind::from_id(kind.id()), Some(kind));
        }
        assert_eq!(PieceKind::from_id(0), None);
        assert_eq!(PieceKind::from_id(8), None);
    }

    #[test]
    fn test_piece_kind_char_conversion() {
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::from_char(kind.as_char()), Some(kind));
        }
        assert_eq!(PieceKind::from_char('x'), None);
    }

    #[test]
    fn test_shapes_are_normalized() {
        for kind in PieceKind::ALL {
            for rotation in kind.rotations() {
                let shape = kind.shape(rotation);
                assert_eq!(shape.offsets().map(|(dx, _)| dx).min(), Some(0));
                assert_eq!(shape.offsets().map(|(_, dy)| dy).min(), Some(0));
                assert_eq!(
                    shape.offsets().map(|(dx, _)| dx).max(),
                    Some(shape.width() - 1)
                );
                assert_eq!(
                    shape.offsets().map(|(_, dy)| dy).max(),
                    Some(shape.height() - 1)
                );
            }
        }
    }

    #[test]
    fn test_rotation_states_are_distinct() {
        for kind in PieceKind::ALL {
            let shapes: Vec<_> = kind.rotations().map(|r| *kind.shape(r)).collect();
            for (i, a) in shapes.iter().enumerate() {
                for b in &shapes[i + 1..] {
                    assert_ne!(a, b, "{kind} has duplicate rotation states");
                }
            }
        }
    }

    #[test]
    fn test_shape_dimensions() {
        let i0 = PieceKind::I.shape(PieceRotation::new(0));
        let i1 = PieceKind::I.shape(PieceRotation::new(1));
        assert_eq!((i0.width(), i0.height()), (4, 1));
        assert_eq!((i1.width(), i1.height()), (1, 4));

        let o = PieceKind::O.shape(PieceRotation::default());
        assert_eq!((o.width(), o.height()), (2, 2));
        assert_eq!(o.matrix(), vec![vec![true, true], vec![true, true]]);

        let t = PieceKind::T.shape(PieceRotation::default());
        assert_eq!(
            t.matrix(),
            vec![vec![false, true, false], vec![true, true, true]]
        );
    }

    #[test]
    fn test_rotation_index_wraps() {
        let o = PieceKind::O;
        assert_eq!(o.shape(PieceRotation::new(3)), o.shape(PieceRotation::new(0)));
        let s = PieceKind::S;
        assert_eq!(s.shape(PieceRotation::new(2)), s.shape(PieceRotation::new(0)));
    }
}
