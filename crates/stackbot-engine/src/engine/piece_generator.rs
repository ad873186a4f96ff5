use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;

use crate::PieceKind;

/// Infinite source of uniformly random pieces.
///
/// Every draw is independent; there is no bag. Two generators built with the
/// same seed yield the same sequence.
///
/// # Example
///
/// ```
/// use stackbot_engine::PieceGenerator;
///
/// let a: Vec<_> = PieceGenerator::with_seed(7).take(16).collect();
/// let b: Vec<_> = PieceGenerator::with_seed(7).take(16).collect();
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone)]
pub struct PieceGenerator {
    rng: Pcg32,
}

impl PieceGenerator {
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Creates a generator seeded from the thread-local RNG.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::with_seed(rand::rng().random())
    }

    pub fn next_piece(&mut self) -> PieceKind {
        self.rng.random()
    }
}

impl Iterator for PieceGenerator {
    type Item = PieceKind;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_piece())
    }
}
