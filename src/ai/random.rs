use crate::game::GameState;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use tracing::debug;

use super::opponent::Opponent;

/// An opponent that selects uniformly at random from legal columns.
pub struct RandomOpponent {
    rng: StdRng,
}

impl RandomOpponent {
    pub fn new() -> Self {
        RandomOpponent {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Reproducible opponent: the same seed yields the same choices.
    pub fn from_seed(seed: u64) -> Self {
        RandomOpponent {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomOpponent {
    fn default() -> Self {
        Self::new()
    }
}

impl Opponent for RandomOpponent {
    fn choose_move(&mut self, state: &GameState) -> Option<usize> {
        let columns = state.legal_columns();
        let choice = columns.choose(&mut self.rng).copied();
        debug!(?columns, ?choice, "random opponent chose a column");
        choice
    }

    fn name(&self) -> &str {
        "Random"
    }
}
