//! Cavity mask: empty pockets shaped to receive a piece.
//!
//! A cavity is an empty axis-aligned rectangle of 1 to 4 columns by 1 to 4
//! rows covering at least two cells, resting on solid cells or the floor
//! along its whole bottom edge, with a solid cell or wall on both sides of
//! every row. The mask is the union of all such rectangles.
//!
//! This is a local, shape-based notion used only by the single-ply
//! heuristic. It is independent of the connectivity-based
//! [`topology`](crate::topology) analysis: a cavity may well be part of the
//! open region.

use stackbot_engine::{BOARD_HEIGHT, BOARD_WIDTH, Grid};

const MAX_SIDE: usize = 4;
const MIN_CELLS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CavityMask {
    cells: [[bool; BOARD_WIDTH]; BOARD_HEIGHT],
}

impl CavityMask {
    #[must_use]
    pub fn from_grid(grid: &Grid) -> Self {
        let mut cells = [[false; BOARD_WIDTH]; BOARD_HEIGHT];
        for y in 0..BOARD_HEIGHT {
            for x in 0..BOARD_WIDTH {
                for height in 1..=MAX_SIDE.min(BOARD_HEIGHT - y) {
                    for width in 1..=MAX_SIDE.min(BOARD_WIDTH - x) {
                        if width * height < MIN_CELLS || !is_cavity(grid, x, y, width, height) {
                            continue;
                        }
                        for row in &mut cells[y..y + height] {
                            row[x..x + width].fill(true);
                        }
                    }
                }
            }
        }
        Self { cells }
    }

    #[must_use]
    pub fn contains(&self, x: usize, y: usize) -> bool {
        self.cells[y][x]
    }

    /// Number of cells covered by the mask.
    #[must_use]
    pub fn count(&self) -> usize {
        self.cells.iter().flatten().filter(|&&c| c).count()
    }
}

fn is_cavity(grid: &Grid, x: usize, y: usize, width: usize, height: usize) -> bool {
    let xs = x..x + width;
    let ys = y..y + height;
    let (x, y, width, height) = (
        x.cast_signed(),
        y.cast_signed(),
        width.cast_signed(),
        height.cast_signed(),
    );

    let empty = ys
        .clone()
        .all(|cy| xs.clone().all(|cx| !grid.is_occupied(cx, cy)));
    let supported = (x..x + width).all(|cx| grid.is_solid_at(cx, y + height));
    let enclosed =
        (y..y + height).all(|cy| grid.is_solid_at(x - 1, cy) && grid.is_solid_at(x + width, cy));
    empty && supported && enclosed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_board_has_no_cavity() {
        // Bottom row of an empty board has walls only at the board edges,
        // which enclose a 12-wide span: too wide for any rectangle.
        assert_eq!(CavityMask::from_grid(&Grid::EMPTY).count(), 0);
    }

    #[test]
    fn test_vertical_slot() {
        let grid = Grid::from_ascii(
            "
            ###.########
            ###.########
            ",
        );
        let mask = CavityMask::from_grid(&grid);
        assert!(mask.contains(3, 18));
        assert!(mask.contains(3, 19));
        assert_eq!(mask.count(), 2);
    }

    #[test]
    fn test_single_cell_is_too_small() {
        let grid = Grid::from_ascii("###.########");
        assert_eq!(CavityMask::from_grid(&grid).count(), 0);
    }

    #[test]
    fn test_slot_against_wall() {
        let grid = Grid::from_ascii(
            "
            ..##########
            ..##########
            ",
        );
        let mask = CavityMask::from_grid(&grid);
        assert_eq!(mask.count(), 4);
        for (x, y) in [(0, 18), (1, 18), (0, 19), (1, 19)] {
            assert!(mask.contains(x, y));
        }
    }

    #[test]
    fn test_l_shaped_pocket_has_no_rectangle() {
        let grid = Grid::from_ascii(
            "
            #..#########
            #.##########
            ",
        );
        // The 1x2 column is open on its right at row 18 and the 2x1 row
        // overhangs an empty cell, so neither qualifies.
        assert_eq!(CavityMask::from_grid(&grid).count(), 0);
    }

    #[test]
    fn test_wide_trench_between_stacks() {
        let grid = Grid::from_ascii(
            "
            ####...#####
            ####...#####
            ",
        );
        let mask = CavityMask::from_grid(&grid);
        assert_eq!(mask.count(), 6);
        assert!(!mask.contains(4, 17));
    }
}
