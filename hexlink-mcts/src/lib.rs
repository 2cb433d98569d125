//! HEXLINK MCTS - Monte Carlo Tree Search for Hex
//!
//! This crate provides a heuristic-guided MCTS engine:
//! - Tree policy (UCB1 with progressive bias from the path-distance heuristic)
//! - Epsilon-greedy rollouts with a depth cap
//! - Backpropagation from the mover's perspective
//! - Robust-child move choice

pub mod tree;
pub mod rollout;
pub mod search;

use std::time::Duration;

use hexlink_core::{Board, Cell, GameState, HexError, Player};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub use rollout::{RolloutEngine, RolloutResult};
pub use search::{run_search, MoveStatistics, SearchResult};
pub use tree::{MctsNode, MctsTree, NodeId, NodeStats};

/// Default exploration constant
pub const DEFAULT_EXPLORATION: f32 = 1.0;

/// The textbook UCB1 constant, for callers who want it
pub const DEFAULT_EXPLORATION_SQRT2: f32 = std::f32::consts::SQRT_2;

/// Default progressive-bias weight
pub const DEFAULT_BIAS_WEIGHT: f32 = 0.0005;

/// Default probability of a random rollout move
pub const DEFAULT_EPSILON: f32 = 0.2;

/// Default rollout depth cap in plies
pub const DEFAULT_ROLLOUT_DEPTH: u32 = 20;

/// How long a search runs
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchBudget {
    Iterations(u32),
    Time(Duration),
}

impl Default for SearchBudget {
    fn default() -> Self {
        SearchBudget::Iterations(1000)
    }
}

/// MCTS configuration
#[derive(Clone, Debug, PartialEq)]
pub struct MctsConfig {
    pub budget: SearchBudget,
    pub exploration: f32,
    pub bias_weight: f32,
    pub epsilon: f32,
    pub max_rollout_depth: u32,
    /// Fixed RNG seed, entropy when None
    pub seed: Option<u64>,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            budget: SearchBudget::default(),
            exploration: DEFAULT_EXPLORATION,
            bias_weight: DEFAULT_BIAS_WEIGHT,
            epsilon: DEFAULT_EPSILON,
            max_rollout_depth: DEFAULT_ROLLOUT_DEPTH,
            seed: None,
        }
    }
}

impl MctsConfig {
    /// Config with an iteration budget
    pub fn iterations(iterations: u32) -> Self {
        Self {
            budget: SearchBudget::Iterations(iterations),
            ..Default::default()
        }
    }

    /// Config with a wall-clock budget
    pub fn timed(limit: Duration) -> Self {
        Self {
            budget: SearchBudget::Time(limit),
            ..Default::default()
        }
    }

    pub fn with_budget(mut self, budget: SearchBudget) -> Self {
        self.budget = budget;
        self
    }

    pub fn with_exploration(mut self, exploration: f32) -> Self {
        self.exploration = exploration;
        self
    }

    pub fn with_bias_weight(mut self, bias_weight: f32) -> Self {
        self.bias_weight = bias_weight;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f32) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_max_rollout_depth(mut self, depth: u32) -> Self {
        self.max_rollout_depth = depth;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Reject budgets and constants the search cannot run with
    pub fn validate(&self) -> Result<(), HexError> {
        match self.budget {
            SearchBudget::Iterations(0) => {
                return Err(HexError::InvalidParameter(
                    "iteration budget must be positive".into(),
                ))
            }
            SearchBudget::Time(limit) if limit.is_zero() => {
                return Err(HexError::InvalidParameter(
                    "time budget must be positive".into(),
                ))
            }
            _ => {}
        }
        if !self.exploration.is_finite() || self.exploration < 0.0 {
            return Err(HexError::InvalidParameter(format!(
                "exploration constant {} must be finite and non-negative",
                self.exploration
            )));
        }
        if !self.bias_weight.is_finite() || self.bias_weight < 0.0 {
            return Err(HexError::InvalidParameter(format!(
                "bias weight {} must be finite and non-negative",
                self.bias_weight
            )));
        }
        if !(0.0..=1.0).contains(&self.epsilon) {
            return Err(HexError::InvalidParameter(format!(
                "rollout epsilon {} must lie in [0, 1]",
                self.epsilon
            )));
        }
        if self.max_rollout_depth == 0 {
            return Err(HexError::InvalidParameter(
                "rollout depth cap must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// MCTS player; each search builds a fresh tree
pub struct MctsPlayer {
    config: MctsConfig,
    rng: ChaCha8Rng,
}

impl MctsPlayer {
    pub fn new(config: MctsConfig) -> Result<Self, HexError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Ok(Self { config, rng })
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    /// Run a full search from `state`
    pub fn search(&mut self, state: &GameState) -> SearchResult {
        run_search(MctsTree::new(state.clone()), &self.config, &mut self.rng)
    }

    /// Get best move using MCTS
    ///
    /// Falls back to a random legal move when the root never grew
    /// children (a decided position that still has empty cells).
    pub fn best_move(&mut self, state: &GameState) -> Option<Cell> {
        let result = self.search(state);
        result
            .best_move()
            .or_else(|| state.legal_moves().choose(&mut self.rng).copied())
    }
}

/// Choose a move for a driver-supplied position with default parameters.
pub fn choose_move_mcts(
    board: &Board,
    player_to_move: Player,
    empty_count: usize,
    budget: SearchBudget,
) -> Result<Option<Cell>, HexError> {
    let state = GameState::from_board(board.clone(), player_to_move, empty_count)?;
    let mut player = MctsPlayer::new(MctsConfig::default().with_budget(budget))?;
    Ok(player.best_move(&state))
}

// ============================================================================
// TESTS
// ============================================================================
