//! MCTS Search Loop
//!
//! Implements the core MCTS algorithm:
//! 1. Selection - UCB1 plus progressive bias down the tree
//! 2. Expansion - Add one random child
//! 3. Simulation - Heuristic rollout
//! 4. Backpropagation - Update statistics
//!
//! ## Architecture
//! - Level 2: Search loop coordination
//! - Level 3: Individual MCTS phases
//! - Level 4: Utilities

use std::time::{Duration, Instant};

use hexlink_core::{Cell, Player};
use rand::Rng;
use tracing::debug;

use crate::rollout::RolloutEngine;
use crate::tree::{MctsTree, NodeId};
use crate::{MctsConfig, SearchBudget};

// ============================================================================
// SEARCH RESULT
// ============================================================================

/// Result of MCTS search
#[derive(Debug)]
pub struct SearchResult {
    /// The final tree after search
    pub tree: MctsTree,
    /// Iterations completed
    pub iterations: u32,
    /// Wall-clock time spent searching
    pub elapsed: Duration,
    /// Statistics for each root move
    pub move_stats: Vec<MoveStatistics>,
}

/// Statistics for a single move at root
#[derive(Clone, Debug)]
pub struct MoveStatistics {
    pub mv: Cell,
    pub visits: u32,
    pub win_rate: f32,
    /// Static evaluation of the child for the root player
    pub heuristic: f32,
}

impl SearchResult {
    /// Get the best move (most visited)
    pub fn best_move(&self) -> Option<Cell> {
        self.tree.best_move()
    }

    /// Get move with highest win rate
    pub fn highest_winrate_move(&self) -> Option<Cell> {
        self.move_stats
            .iter()
            .max_by(|a, b| {
                a.win_rate
                    .partial_cmp(&b.win_rate)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|s| s.mv)
    }

    /// Get all moves sorted by visits
    pub fn moves_by_visits(&self) -> Vec<(Cell, u32)> {
        let mut moves: Vec<_> = self.move_stats.iter().map(|s| (s.mv, s.visits)).collect();
        moves.sort_by(|a, b| b.1.cmp(&a.1));
        moves
    }
}

// ============================================================================
// SEARCH LOOP (Level 2 - Main Coordination)
// ============================================================================

/// Run MCTS search
///
/// Level 2 function - coordinates the search phases. A time budget is
/// only checked between iterations.
pub fn run_search<R: Rng>(mut tree: MctsTree, config: &MctsConfig, rng: &mut R) -> SearchResult {
    let rollout_engine = RolloutEngine::new(
        tree.root_player(),
        config.epsilon,
        config.max_rollout_depth,
    );
    let start = Instant::now();
    let mut iterations = 0;

    match config.budget {
        SearchBudget::Iterations(limit) => {
            while iterations < limit {
                run_single_iteration(&mut tree, config, &rollout_engine, rng);
                iterations += 1;
            }
        }
        SearchBudget::Time(limit) => {
            while start.elapsed() < limit {
                run_single_iteration(&mut tree, config, &rollout_engine, rng);
                iterations += 1;
            }
        }
    }

    let elapsed = start.elapsed();
    let move_stats = collect_move_statistics(&tree);

    debug!(
        iterations,
        nodes = tree.len(),
        root_moves = move_stats.len(),
        elapsed_ms = elapsed.as_millis() as u64,
        best = ?tree.best_move(),
        "mcts search finished"
    );

    SearchResult {
        tree,
        iterations,
        elapsed,
        move_stats,
    }
}

// ============================================================================
// MCTS PHASES (Level 3)
// ============================================================================

/// Single MCTS iteration
///
/// Level 3 function - implements one complete MCTS cycle.
fn run_single_iteration<R: Rng>(
    tree: &mut MctsTree,
    config: &MctsConfig,
    rollout_engine: &RolloutEngine,
    rng: &mut R,
) {
    // Phase 1: Selection
    let leaf_id = tree.select_leaf(config.exploration, config.bias_weight);

    // Phase 2: Expansion (if not terminal)
    let simulation_node = if !tree.get(leaf_id).is_terminal() {
        tree.expand(leaf_id, rng).unwrap_or(leaf_id)
    } else {
        leaf_id
    };

    // Phase 3: Simulation (rollout)
    let winner = simulate_node(tree, simulation_node, rollout_engine, rng);

    // Phase 4: Backpropagation
    tree.backpropagate(simulation_node, winner);
}

/// Simulate a node (terminal nodes report their winner directly)
fn simulate_node<R: Rng>(
    tree: &MctsTree,
    node_id: NodeId,
    rollout_engine: &RolloutEngine,
    rng: &mut R,
) -> Option<Player> {
    let node = tree.get(node_id);

    if node.is_terminal() {
        return node.state.winner();
    }

    rollout_engine.rollout(&node.state, rng).winner
}

// ============================================================================
// STATISTICS COLLECTION (Level 4 - Utilities)
// ============================================================================

/// Collect statistics for root moves
fn collect_move_statistics(tree: &MctsTree) -> Vec<MoveStatistics> {
    let root = tree.get(tree.root());

    root.children
        .iter()
        .map(|(mv, child_id)| {
            let child = tree.get(*child_id);
            MoveStatistics {
                mv: *mv,
                visits: child.stats.visits,
                win_rate: child.stats.win_rate(),
                heuristic: child.heuristic,
            }
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use hexlink_core::GameState;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn mock_state() -> GameState {
        GameState::new(3).unwrap()
    }

    fn stats(mv: Cell, visits: u32, win_rate: f32) -> MoveStatistics {
        MoveStatistics {
            mv,
            visits,
            win_rate,
            heuristic: 0.0,
        }
    }

    #[test]
    fn test_search_result_best_move() {
        let tree = MctsTree::new(mock_state());
        let result = SearchResult {
            tree,
            iterations: 0,
            elapsed: Duration::ZERO,
            move_stats: vec![
                stats(Cell::new(0, 0), 100, 0.6),
                stats(Cell::new(1, 1), 50, 0.4),
            ],
        };

        // highest_winrate_move should return (0,0) (0.6 > 0.4)
        assert_eq!(result.highest_winrate_move(), Some(Cell::new(0, 0)));
        // No children in the tree itself
        assert_eq!(result.best_move(), None);
    }

    #[test]
    fn test_moves_by_visits() {
        let tree = MctsTree::new(mock_state());
        let result = SearchResult {
            tree,
            iterations: 150,
            elapsed: Duration::ZERO,
            move_stats: vec![
                stats(Cell::new(0, 0), 50, 0.6),
                stats(Cell::new(1, 1), 100, 0.4),
            ],
        };

        let sorted = result.moves_by_visits();
        assert_eq!(sorted[0], (Cell::new(1, 1), 100));
        assert_eq!(sorted[1], (Cell::new(0, 0), 50));
    }

    #[test]
    fn test_collect_move_statistics_empty() {
        let tree = MctsTree::new(mock_state());
        let stats = collect_move_statistics(&tree);
        assert!(stats.is_empty()); // No children expanded
    }

    #[test]
    fn test_run_search_counts_iterations() {
        let tree = MctsTree::new(mock_state());
        let config = MctsConfig::iterations(50).with_seed(1);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let result = run_search(tree, &config, &mut rng);

        assert_eq!(result.iterations, 50);
        assert_eq!(result.tree.total_simulations(), 50);
        // 9 root moves, all tried within 50 iterations
        assert_eq!(result.move_stats.len(), 9);
        let child_visits: u32 = result.move_stats.iter().map(|s| s.visits).sum();
        assert_eq!(child_visits, 50);
    }

    #[test]
    fn test_run_search_time_budget() {
        let tree = MctsTree::new(mock_state());
        let config = MctsConfig::timed(Duration::from_millis(20));
        let mut rng = ChaCha8Rng::seed_from_u64(4);

        let result = run_search(tree, &config, &mut rng);

        assert!(result.iterations > 0);
        assert!(result.elapsed >= Duration::from_millis(20));
        assert_eq!(result.tree.total_simulations(), result.iterations);
    }

    #[test]
    fn test_terminal_root_is_visited_without_children() {
        let state = GameState::from_position("R . .\nR . .\nR . .".parse().unwrap(), Player::Blue);
        let config = MctsConfig::iterations(10);
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        let result = run_search(MctsTree::new(state), &config, &mut rng);

        assert_eq!(result.tree.len(), 1);
        assert_eq!(result.tree.total_simulations(), 10);
        assert_eq!(result.best_move(), None);
    }
}
