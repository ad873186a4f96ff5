use std::{cell::OnceCell, iter};

use stackbot_engine::{BOARD_HEIGHT, BOARD_WIDTH, Grid};

/// Column height above which [`BoardAnalysis::bump_risk`] starts penalizing.
pub const BUMP_RISK_THRESHOLD: u8 = 8;

/// Lazily computed structural metrics of a grid.
///
/// Each metric is computed on first access and cached.
#[derive(Debug)]
pub struct BoardAnalysis {
    grid: Grid,
    column_heights: OnceCell<[u8; BOARD_WIDTH]>,
    column_occupied_cells: OnceCell<[u8; BOARD_WIDTH]>,
    column_well_depths: OnceCell<[u8; BOARD_WIDTH]>,
    aggregate_height: OnceCell<u32>,
    num_holes: OnceCell<u32>,
    blocked_cells: OnceCell<u32>,
    row_transitions: OnceCell<u32>,
    column_transitions: OnceCell<u32>,
    bumpiness: OnceCell<u32>,
    bump_risk: OnceCell<u32>,
    well_depth_sum: OnceCell<u32>,
}

impl BoardAnalysis {
    #[must_use]
    pub fn from_grid(grid: &Grid) -> Self {
        Self {
            grid: grid.clone(),
            column_heights: OnceCell::new(),
            column_occupied_cells: OnceCell::new(),
            column_well_depths: OnceCell::new(),
            aggregate_height: OnceCell::new(),
            num_holes: OnceCell::new(),
            blocked_cells: OnceCell::new(),
            row_transitions: OnceCell::new(),
            column_transitions: OnceCell::new(),
            bumpiness: OnceCell::new(),
            bump_risk: OnceCell::new(),
            well_depth_sum: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Height of each column measured from the floor to its topmost solid cell.
    #[must_use]
    pub fn column_heights(&self) -> &[u8; BOARD_WIDTH] {
        self.column_heights.get_or_init(|| {
            let mut column_heights = [0; BOARD_WIDTH];
            for (x, h) in column_heights.iter_mut().enumerate() {
                let Some(top) = (0..BOARD_HEIGHT).find(|&y| self.grid.is_occupied(x, y)) else {
                    continue;
                };
                *h = to_u8(BOARD_HEIGHT - top);
            }
            column_heights
        })
    }

    #[must_use]
    pub fn column_occupied_cells(&self) -> &[u8; BOARD_WIDTH] {
        self.column_occupied_cells.get_or_init(|| {
            let mut column_occupied_cells = [0; BOARD_WIDTH];
            for (x, o) in column_occupied_cells.iter_mut().enumerate() {
                *o = to_u8((0..BOARD_HEIGHT).filter(|&y| self.grid.is_occupied(x, y)).count());
            }
            column_occupied_cells
        })
    }

    /// Depth of the well in each column; walls count as infinitely high.
    #[must_use]
    pub fn column_well_depths(&self) -> &[u8; BOARD_WIDTH] {
        self.column_well_depths.get_or_init(|| {
            let h = self.column_heights();
            let start = &[u8::MAX, h[0], h[1]][..];
            let end = &[h[h.len() - 2], h[h.len() - 1], u8::MAX][..];
            let triples = iter::once(start).chain(h.windows(3)).chain(iter::once(end));
            let wells = triples.map(|w| {
                if w[1] < w[0] && w[1] < w[2] {
                    u8::min(w[0], w[2]).min(to_u8(BOARD_HEIGHT)) - w[1]
                } else {
                    0
                }
            });
            let mut column_well_depths = [0; BOARD_WIDTH];
            for (w, d) in iter::zip(wells, &mut column_well_depths) {
                *d = w;
            }
            column_well_depths
        })
    }

    #[must_use]
    pub fn aggregate_height(&self) -> u32 {
        *self.aggregate_height.get_or_init(|| {
            self.column_heights().iter().copied().map(u32::from).sum()
        })
    }

    /// Empty cells below the top of their column.
    #[must_use]
    pub fn num_holes(&self) -> u32 {
        *self.num_holes.get_or_init(|| {
            iter::zip(self.column_heights(), self.column_occupied_cells())
                .map(|(h, occ)| u32::from(h - occ))
                .sum()
        })
    }

    /// Solid cells sitting above at least one hole in their column.
    #[must_use]
    pub fn blocked_cells(&self) -> u32 {
        *self.blocked_cells.get_or_init(|| {
            let mut blocked = 0;
            for x in 0..BOARD_WIDTH {
                let lowest_hole = (0..BOARD_HEIGHT).rev().find(|&y| {
                    !self.grid.is_occupied(x, y)
                        && (0..y).any(|above| self.grid.is_occupied(x, above))
                });
                if let Some(hole_y) = lowest_hole {
                    blocked += (0..hole_y).filter(|&y| self.grid.is_occupied(x, y)).count();
                }
            }
            to_u32(blocked)
        })
    }

    /// Solid/empty changes along each row; the side walls count as solid.
    #[must_use]
    pub fn row_transitions(&self) -> u32 {
        *self.row_transitions.get_or_init(|| {
            let mut transitions = 0;
            for y in 0..BOARD_HEIGHT {
                let mut prev_occupied = true;
                for x in 0..BOARD_WIDTH {
                    let occupied = self.grid.is_occupied(x, y);
                    if occupied != prev_occupied {
                        transitions += 1;
                    }
                    prev_occupied = occupied;
                }
                if !prev_occupied {
                    transitions += 1;
                }
            }
            transitions
        })
    }

    /// Solid/empty changes down each column; the floor counts as solid.
    #[must_use]
    pub fn column_transitions(&self) -> u32 {
        *self.column_transitions.get_or_init(|| {
            let mut transitions = 0;
            for x in 0..BOARD_WIDTH {
                let mut prev_occupied = self.grid.is_occupied(x, 0);
                for y in 1..BOARD_HEIGHT {
                    let occupied = self.grid.is_occupied(x, y);
                    if occupied != prev_occupied {
                        transitions += 1;
                    }
                    prev_occupied = occupied;
                }
                if !prev_occupied {
                    transitions += 1;
                }
            }
            transitions
        })
    }

    #[must_use]
    pub fn bumpiness(&self) -> u32 {
        *self.bumpiness.get_or_init(|| {
            self.column_heights()
                .windows(2)
                .map(|w| u32::from(w[0].abs_diff(w[1])))
                .sum()
        })
    }

    /// Σ max(0, h − [`BUMP_RISK_THRESHOLD`])² over all columns.
    #[must_use]
    pub fn bump_risk(&self) -> u32 {
        *self.bump_risk.get_or_init(|| {
            self.column_heights()
                .iter()
                .map(|h| u32::from(h.saturating_sub(BUMP_RISK_THRESHOLD)).pow(2))
                .sum()
        })
    }

    #[must_use]
    pub fn well_depth_sum(&self) -> u32 {
        *self
            .well_depth_sum
            .get_or_init(|| self.column_well_depths().iter().copied().map(u32::from).sum())
    }
}

fn to_u8(n: usize) -> u8 {
    u8::try_from(n).unwrap_or(u8::MAX)
}

fn to_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
