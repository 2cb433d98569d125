//! Rollout (simulation) policy for MCTS
//!
//! Epsilon-greedy playouts guided by the shortest-path evaluation.
//!
//! ## Architecture
//! - Level 2: RolloutEngine (policy parameters bound to a root player)
//! - Level 3: Single rollout implementation
//! - Level 4: Move selection

use hexlink_core::{evaluate, Cell, GameState, Player};
use rand::prelude::*;

// ============================================================================
// ROLLOUT RESULT
// ============================================================================

/// Result of a rollout simulation
#[derive(Clone, Debug, PartialEq)]
pub struct RolloutResult {
    /// Player credited with the rollout, None for a drawn board
    pub winner: Option<Player>,
    /// Number of moves played
    pub moves_played: u32,
}

// ============================================================================
// ROLLOUT ENGINE (Level 2)
// ============================================================================

/// Rollout policy scored from the root player's point of view
#[derive(Clone, Debug)]
pub struct RolloutEngine {
    root_player: Player,
    epsilon: f32,
    max_depth: u32,
}

impl RolloutEngine {
    pub fn new(root_player: Player, epsilon: f32, max_depth: u32) -> Self {
        Self {
            root_player,
            epsilon,
            max_depth,
        }
    }

    /// Play out from `state` until a decision, a decided evaluation or the
    /// depth cap.
    pub fn rollout<R: Rng>(&self, state: &GameState, rng: &mut R) -> RolloutResult {
        let mut current = state.clone();
        let mut moves_played = 0;

        loop {
            if current.is_terminal() {
                return RolloutResult {
                    winner: current.winner(),
                    moves_played,
                };
            }

            if moves_played >= self.max_depth {
                // Capped: the root is credited only when strictly ahead
                let winner = if evaluate(&current, self.root_player) > 0.0 {
                    self.root_player
                } else {
                    self.root_player.opponent()
                };
                return RolloutResult {
                    winner: Some(winner),
                    moves_played,
                };
            }

            let legal_moves = current.legal_moves();
            let (next, score) = if rng.gen::<f32>() < self.epsilon {
                let mv = select_random_move(&legal_moves, rng);
                let next = current.play(mv);
                let score = evaluate(&next, self.root_player);
                (next, score)
            } else {
                self.select_greedy(&current, &legal_moves)
            };
            current = next;
            moves_played += 1;

            if score == f32::INFINITY {
                return RolloutResult {
                    winner: Some(self.root_player),
                    moves_played,
                };
            }
            if score == f32::NEG_INFINITY {
                return RolloutResult {
                    winner: Some(self.root_player.opponent()),
                    moves_played,
                };
            }
        }
    }

    // ========================================================================
    // Level 4: Move Selection
    // ========================================================================

    /// Successor with the best root evaluation; the first one found wins ties
    fn select_greedy(&self, state: &GameState, moves: &[Cell]) -> (GameState, f32) {
        let mut best: Option<(GameState, f32)> = None;

        for &mv in moves {
            let next = state.play(mv);
            let score = evaluate(&next, self.root_player);
            match &best {
                Some((_, best_score)) if score <= *best_score => {}
                _ => best = Some((next, score)),
            }
        }

        // Callers only roll out non-terminal states, which have a move
        best.unwrap_or_else(|| (state.clone(), evaluate(state, self.root_player)))
    }
}

/// Select a random move uniformly from the list
fn select_random_move<R: Rng>(moves: &[Cell], rng: &mut R) -> Cell {
    let idx = rng.gen_range(0..moves.len());
    moves[idx]
}

// ============================================================================
// TESTS
// ============================================================================
