//! Open/closed region analysis of the empty space on a grid.
//!
//! Empty cells are partitioned by 4-connected flood fill into exactly one
//! *open region* (everything reachable from the empty cells of the top row)
//! and zero or more *closed regions* (sealed cavities). The open region's
//! deepest row per column forms the floor profile whose adjacent differences
//! give the surface roughness.
//!
//! The analysis is recomputed from scratch for every snapshot: a single
//! placement can reclassify any number of cells.
//!
//! # Example
//!
//! ```
//! use stackbot_engine::Grid;
//! use stackbot_evaluator::topology::Topology;
//!
//! let grid = Grid::from_ascii(
//!     "
//!     .####.......
//!     .#..#.......
//!     .#..#.......
//!     .####.......
//!     ",
//! );
//! let topology = Topology::analyze(&grid);
//!
//! assert_eq!(topology.closed_regions().len(), 1);
//! assert_eq!(topology.metrics().closed_area, 4);
//! ```

use std::collections::VecDeque;

use serde::Serialize;
use stackbot_engine::{BOARD_HEIGHT, BOARD_WIDTH, Grid};

/// Floor value of a column the open region never reaches.
pub const SEALED_FLOOR: isize = -1;

type Visited = [[bool; BOARD_WIDTH]; BOARD_HEIGHT];

/// Empty space reachable from the top edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenRegion {
    area: usize,
    min_row: Option<usize>,
    column_floors: [isize; BOARD_WIDTH],
}

impl OpenRegion {
    #[must_use]
    pub fn area(&self) -> usize {
        self.area
    }

    /// Smallest row index reached, `None` when the top row is fully occupied.
    #[must_use]
    pub fn min_row(&self) -> Option<usize> {
        self.min_row
    }

    /// Deepest open row of each column, or [`SEALED_FLOOR`].
    #[must_use]
    pub fn column_floors(&self) -> &[isize; BOARD_WIDTH] {
        &self.column_floors
    }

    /// Σ |floor[i] − floor[i + 1]| over adjacent columns.
    #[must_use]
    pub fn roughness(&self) -> u32 {
        self.column_floors
            .windows(2)
            .map(|w| u32::try_from(w[0].abs_diff(w[1])).unwrap_or(u32::MAX))
            .sum()
    }
}

/// A maximal connected pocket of empty cells not reachable from the top edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosedRegion {
    cells: Vec<(usize, usize)>,
}

impl ClosedRegion {
    #[must_use]
    pub fn area(&self) -> usize {
        self.cells.len()
    }

    /// Member cells as `(x, y)` pairs, in discovery order.
    #[must_use]
    pub fn cells(&self) -> &[(usize, usize)] {
        &self.cells
    }
}

/// Summary numbers the planner ranks candidates by.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TopologyMetrics {
    pub open_area: usize,
    pub closed_area: usize,
    pub roughness: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology {
    open: OpenRegion,
    closed: Vec<ClosedRegion>,
}

impl Topology {
    #[must_use]
    pub fn analyze(grid: &Grid) -> Self {
        let mut visited = [[false; BOARD_WIDTH]; BOARD_HEIGHT];

        let seeds = (0..BOARD_WIDTH)
            .filter(|&x| !grid.is_occupied(x, 0))
            .map(|x| (x, 0));
        let open_cells = flood_fill(grid, &mut visited, seeds);

        let mut column_floors = [SEALED_FLOOR; BOARD_WIDTH];
        for &(x, y) in &open_cells {
            let y = y.cast_signed();
            if y > column_floors[x] {
                column_floors[x] = y;
            }
        }
        let open = OpenRegion {
            area: open_cells.len(),
            min_row: open_cells.iter().map(|&(_, y)| y).min(),
            column_floors,
        };

        let mut closed = vec![];
        for y in 0..BOARD_HEIGHT {
            for x in 0..BOARD_WIDTH {
                if visited[y][x] || grid.is_occupied(x, y) {
                    continue;
                }
                let cells = flood_fill(grid, &mut visited, [(x, y)]);
                closed.push(ClosedRegion { cells });
            }
        }

        Self { open, closed }
    }

    #[must_use]
    pub fn open_region(&self) -> &OpenRegion {
        &self.open
    }

    #[must_use]
    pub fn closed_regions(&self) -> &[ClosedRegion] {
        &self.closed
    }

    #[must_use]
    pub fn closed_area(&self) -> usize {
        self.closed.iter().map(ClosedRegion::area).sum()
    }

    #[must_use]
    pub fn metrics(&self) -> TopologyMetrics {
        TopologyMetrics {
            open_area: self.open.area(),
            closed_area: self.closed_area(),
            roughness: self.open.roughness(),
        }
    }
}

fn flood_fill<I>(grid: &Grid, visited: &mut Visited, seeds: I) -> Vec<(usize, usize)>
where
    I: IntoIterator<Item = (usize, usize)>,
{
    let mut cells = vec![];
    let mut queue = VecDeque::new();
    for (x, y) in seeds {
        if !visited[y][x] {
            visited[y][x] = true;
            queue.push_back((x, y));
        }
    }
    while let Some((x, y)) = queue.pop_front() {
        cells.push((x, y));
        let neighbors = [
            x.checked_sub(1).map(|nx| (nx, y)),
            (x + 1 < BOARD_WIDTH).then_some((x + 1, y)),
            y.checked_sub(1).map(|ny| (x, ny)),
            (y + 1 < BOARD_HEIGHT).then_some((x, y + 1)),
        ];
        for (nx, ny) in neighbors.into_iter().flatten() {
            if visited[ny][nx] || grid.is_occupied(nx, ny) {
                continue;
            }
            visited[ny][nx] = true;
            queue.push_back((nx, ny));
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_grid_is_one_open_region() {
        let topology = Topology::analyze(&Grid::EMPTY);
        assert!(topology.closed_regions().is_empty());
        let open = topology.open_region();
        assert_eq!(open.area(), BOARD_WIDTH * BOARD_HEIGHT);
        assert_eq!(open.min_row(), Some(0));
        assert_eq!(open.column_floors(), &[19; BOARD_WIDTH]);
        assert_eq!(open.roughness(), 0);
    }

    #[test]
    fn test_sealed_void_is_closed() {
        let grid = Grid::from_ascii(
            "
            ....####....
            ....#..#....
            ....#..#....
            ....####....
            ",
        );
        let topology = Topology::analyze(&grid);
        assert_eq!(topology.closed_regions().len(), 1);
        let region = &topology.closed_regions()[0];
        assert_eq!(region.area(), 4);
        let mut cells = region.cells().to_vec();
        cells.sort_unstable();
        assert_eq!(cells, vec![(5, 17), (5, 18), (6, 17), (6, 18)]);

        let metrics = topology.metrics();
        assert_eq!(metrics.closed_area, 4);
        assert_eq!(metrics.open_area, grid.empty_cell_count() - 4);
    }

    #[test]
    fn test_overhang_reachable_from_side_is_open() {
        let grid = Grid::from_ascii(
            "
            ####........
            ............
            ",
        );
        let topology = Topology::analyze(&grid);
        assert!(topology.closed_regions().is_empty());
        assert_eq!(topology.open_region().column_floors()[0], 19);
    }

    #[test]
    fn test_sealed_columns_use_sentinel_floor() {
        let grid = Grid::from_ascii(&"##..........\n".repeat(BOARD_HEIGHT));
        let topology = Topology::analyze(&grid);
        let floors = topology.open_region().column_floors();
        assert_eq!(floors[0], SEALED_FLOOR);
        assert_eq!(floors[1], SEALED_FLOOR);
        assert_eq!(floors[2], 19);
        assert_eq!(topology.open_region().roughness(), 20);
    }

    #[test]
    fn test_full_top_row_leaves_no_open_region() {
        let mut grid = Grid::EMPTY;
        for x in 0..BOARD_WIDTH {
            grid.fill_block_at(x, 0, stackbot_engine::Block::Garbage);
        }
        let topology = Topology::analyze(&grid);
        assert_eq!(topology.open_region().area(), 0);
        assert_eq!(topology.open_region().min_row(), None);
        assert_eq!(topology.closed_regions().len(), 1);
        assert_eq!(topology.closed_area(), BOARD_WIDTH * (BOARD_HEIGHT - 1));
    }
}
