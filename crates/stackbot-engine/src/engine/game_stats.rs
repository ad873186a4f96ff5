use serde::Serialize;

/// Score values for line clears, indexed by lines cleared at once.
const SCORE_TABLE: [usize; 5] = [0, 100, 300, 500, 800];

/// Counters for a self-play game.
///
/// # Example
///
/// ```
/// use stackbot_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.record_placement(4);
///
/// assert_eq!(stats.score(), 800);
/// assert_eq!(stats.total_cleared_lines(), 4);
/// assert_eq!(stats.line_cleared_counter()[4], 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameStats {
    score: usize,
    completed_pieces: usize,
    total_cleared_lines: usize,
    line_cleared_counter: [usize; 5],
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            completed_pieces: 0,
            total_cleared_lines: 0,
            line_cleared_counter: [0; 5],
        }
    }

    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    /// Number of pieces locked so far.
    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    #[must_use]
    pub const fn total_cleared_lines(&self) -> usize {
        self.total_cleared_lines
    }

    /// Histogram of placements by number of lines they cleared (0 to 4).
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.line_cleared_counter
    }

    /// Records one locked piece that cleared `cleared_lines` rows.
    pub const fn record_placement(&mut self, cleared_lines: usize) {
        self.completed_pieces += 1;
        self.total_cleared_lines += cleared_lines;
        if cleared_lines < SCORE_TABLE.len() {
            self.line_cleared_counter[cleared_lines] += 1;
            self.score += SCORE_TABLE[cleared_lines];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_placement_accumulates() {
        let mut stats = GameStats::new();
        for lines in [0, 1, 0, 2, 3] {
            stats.record_placement(lines);
        }
        assert_eq!(stats.completed_pieces(), 5);
        assert_eq!(stats.total_cleared_lines(), 6);
        assert_eq!(stats.score(), 900);
        assert_eq!(stats.line_cleared_counter(), &[2, 1, 1, 1, 0]);
    }
}
