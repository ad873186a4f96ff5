//! Bounded-width lookahead over a short piece queue.
//!
//! Each generation expands every surviving candidate with every placement of
//! the next piece, simulates lock and clear, drops duplicate grids, ranks the
//! children by their [`TopologyMetrics`] and keeps the best `beam_width`.
//!
//! Ranking keys, in order: less closed area, more open area, less roughness.
//! The sort is stable, so children that tie on all three keep expansion order
//! (survivor order first, then placement enumeration order).

use std::{cmp::Reverse, collections::HashSet};

use serde::{Deserialize, Serialize};
use stackbot_engine::{Grid, PieceKind, Placement};
use stackbot_evaluator::topology::{Topology, TopologyMetrics};

/// Default number of candidates kept per generation.
pub const DEFAULT_BEAM_WIDTH: usize = 15;
/// Default number of queued pieces looked at.
pub const DEFAULT_MAX_DEPTH: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeamConfig {
    /// Candidates kept per generation.
    pub beam_width: usize,
    /// Pieces of the queue considered; the rest is ignored.
    pub max_depth: usize,
}

impl Default for BeamConfig {
    fn default() -> Self {
        Self {
            beam_width: DEFAULT_BEAM_WIDTH,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl BeamConfig {
    #[must_use]
    pub fn new(beam_width: usize, max_depth: usize) -> Self {
        Self {
            beam_width: beam_width.max(1),
            max_depth: max_depth.max(1),
        }
    }
}

/// One search node: a simulated grid and the placements that led to it.
#[derive(Debug, Clone)]
pub struct Candidate {
    grid: Grid,
    path: Vec<Placement>,
    metrics: TopologyMetrics,
}

impl Candidate {
    fn root(grid: &Grid) -> Self {
        Self {
            grid: grid.clone(),
            path: vec![],
            metrics: Topology::analyze(grid).metrics(),
        }
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub fn path(&self) -> &[Placement] {
        &self.path
    }

    #[must_use]
    pub fn metrics(&self) -> TopologyMetrics {
        self.metrics
    }

    fn rank_key(&self) -> (usize, Reverse<usize>, u32) {
        (
            self.metrics.closed_area,
            Reverse(self.metrics.open_area),
            self.metrics.roughness,
        )
    }
}

/// Result of a successful search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    /// Placement to play now.
    pub first: Placement,
    /// Placements of the best path, one per searched piece.
    pub path: Vec<Placement>,
    /// Number of pieces the best path covers.
    pub depth: usize,
    /// Topology of the grid at the end of the best path.
    pub metrics: TopologyMetrics,
    /// Open area at the end of the best path minus open area now.
    pub open_area_delta: i32,
}

#[derive(Debug, Clone, Default)]
pub struct BeamPlanner {
    config: BeamConfig,
}

impl BeamPlanner {
    #[must_use]
    pub fn new(config: BeamConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &BeamConfig {
        &self.config
    }

    /// Searches placements for `queue` on `grid`.
    ///
    /// Returns `None` when the queue is empty or its first piece has no
    /// placement. A later dead end truncates the search to the last
    /// non-empty generation.
    #[must_use]
    pub fn plan(&self, grid: &Grid, queue: &[PieceKind]) -> Option<Plan> {
        let initial = Topology::analyze(grid).metrics();
        let mut generation = vec![Candidate::root(grid)];

        for (depth, &kind) in queue.iter().take(self.config.max_depth).enumerate() {
            let children = self.expand(&generation, kind);
            if children.is_empty() {
                tracing::debug!(depth, piece = %kind, "search truncated: no placement");
                break;
            }
            generation = children;
        }

        let best = generation.into_iter().next()?;
        let first = *best.path.first()?;
        let open_area_delta = to_i32(best.metrics.open_area) - to_i32(initial.open_area);
        tracing::debug!(
            first = %first,
            depth = best.path.len(),
            closed_area = best.metrics.closed_area,
            open_area_delta,
            roughness = best.metrics.roughness,
            "plan selected",
        );
        Some(Plan {
            first,
            depth: best.path.len(),
            path: best.path,
            metrics: best.metrics,
            open_area_delta,
        })
    }

    /// Builds, deduplicates, ranks and prunes the children of `generation`.
    #[must_use]
    pub fn expand(&self, generation: &[Candidate], kind: PieceKind) -> Vec<Candidate> {
        let mut seen = HashSet::new();
        let mut children = vec![];
        for parent in generation {
            for placement in Placement::enumerate(&parent.grid, kind) {
                let locked = match parent.grid.with_placement(&placement) {
                    Ok(locked) => locked,
                    Err(error) => {
                        tracing::trace!(%placement, %error, "dropping candidate");
                        continue;
                    }
                };
                let (grid, _lines) = locked.cleared();
                if seen.contains(&grid) {
                    continue;
                }
                seen.insert(grid.clone());
                let metrics = Topology::analyze(&grid).metrics();
                let mut path = parent.path.clone();
                path.push(placement);
                children.push(Candidate {
                    grid,
                    path,
                    metrics,
                });
            }
        }
        children.sort_by_key(Candidate::rank_key);
        children.truncate(self.config.beam_width);
        children
    }

    /// Root generation for `grid`, for driving [`Self::expand`] by hand.
    #[must_use]
    pub fn root(grid: &Grid) -> Vec<Candidate> {
        vec![Candidate::root(grid)]
    }
}

fn to_i32(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}
