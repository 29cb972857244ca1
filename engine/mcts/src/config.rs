//! MCTS configuration parameters.

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

/// Configuration for Monte Carlo Tree Search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Number of select/expand/simulate/backpropagate rounds per search.
    pub iterations: u32,

    /// Seed for the playout RNG. `None` draws a fresh seed from the OS for
    /// every search.
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            iterations: 10_000,
            seed: None,
        }
    }
}

impl SearchConfig {
    /// Create a fast, reproducible config for testing.
    pub fn for_testing() -> Self {
        Self {
            iterations: 200,
            seed: Some(42),
        }
    }

    /// Builder: set the iteration budget.
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    /// Builder: set (or clear) the playout seed.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// RNG for one search, seeded from `seed` when set.
    pub fn rng(&self) -> ChaCha20Rng {
        match self.seed {
            Some(seed) => ChaCha20Rng::seed_from_u64(seed),
            None => ChaCha20Rng::from_entropy(),
        }
    }
}
