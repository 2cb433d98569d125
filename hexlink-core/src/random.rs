//! Uniform random player

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::board::Cell;
use crate::game::GameState;

/// Plays a uniformly random empty cell
#[derive(Debug, Clone)]
pub struct RandomAI {
    rng: ChaCha8Rng,
}

impl RandomAI {
    pub fn new() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Random legal move, `None` on a full board
    pub fn best_move(&mut self, state: &GameState) -> Option<Cell> {
        state.legal_moves().choose(&mut self.rng).copied()
    }
}

impl Default for RandomAI {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Player;

    #[test]
    fn test_random_move_is_legal() {
        let state = GameState::from_position("R . B\n. . .\nB R .".parse().unwrap(), Player::Red);
        let mut ai = RandomAI::with_seed(7);
        for _ in 0..50 {
            let mv = ai.best_move(&state).unwrap();
            assert!(state.is_legal(mv));
        }
    }

    #[test]
    fn test_random_seed_is_reproducible() {
        let state = GameState::new(5).unwrap();
        let a: Vec<_> = {
            let mut ai = RandomAI::with_seed(42);
            (0..10).map(|_| ai.best_move(&state)).collect()
        };
        let b: Vec<_> = {
            let mut ai = RandomAI::with_seed(42);
            (0..10).map(|_| ai.best_move(&state)).collect()
        };
        assert_eq!(a, b);
    }

    #[test]
    fn test_full_board_has_no_move() {
        let state = GameState::from_position("R B\nB R".parse().unwrap(), Player::Red);
        assert_eq!(RandomAI::with_seed(1).best_move(&state), None);
    }
}
