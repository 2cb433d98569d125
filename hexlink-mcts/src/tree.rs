//! MCTS Tree structure and node management
//!
//! Uses arena allocation: nodes own their children by index and keep a
//! plain index back to their parent, so the whole tree drops at once.
//!
//! ## Architecture
//! - Level 2: Tree operations (select_leaf, expand, backpropagate)
//! - Level 3: UCB1 with progressive bias, node accessors
//! - Level 4: Statistics, utilities

use hexlink_core::{evaluate, Cell, GameState, Player};
use rand::Rng;

// ============================================================================
// TYPES
// ============================================================================

/// Node identifier (index into arena)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);
}

/// Statistics for a tree node
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NodeStats {
    /// Number of times this node was visited
    pub visits: u32,
    /// Rollouts won by the player who moved TO this node
    pub wins: u32,
}

impl NodeStats {
    /// Win rate of the move leading here (0.0 when unvisited)
    pub fn win_rate(&self) -> f32 {
        if self.visits == 0 {
            0.0
        } else {
            self.wins as f32 / self.visits as f32
        }
    }
}

/// A node in the MCTS tree
#[derive(Clone, Debug)]
pub struct MctsNode {
    /// Game state at this node
    pub state: GameState,
    /// Parent node (None for root)
    pub parent: Option<NodeId>,
    /// Move that led to this node (None for root)
    pub incoming_move: Option<Cell>,
    /// Children: (move, node_id) pairs
    pub children: Vec<(Cell, NodeId)>,
    /// Moves not yet expanded
    pub untried_moves: Vec<Cell>,
    /// Visit/win statistics
    pub stats: NodeStats,
    /// Static evaluation for the root player, fixed at creation
    pub heuristic: f32,
    terminal: bool,
}

impl MctsNode {
    /// Create a new node, scoring it for `root_player`
    pub fn new(
        state: GameState,
        parent: Option<NodeId>,
        incoming_move: Option<Cell>,
        root_player: Player,
    ) -> Self {
        let terminal = state.is_terminal();
        let untried_moves = if terminal {
            Vec::new()
        } else {
            state.legal_moves()
        };
        let heuristic = evaluate(&state, root_player);

        Self {
            state,
            parent,
            incoming_move,
            children: Vec::new(),
            untried_moves,
            stats: NodeStats::default(),
            heuristic,
            terminal,
        }
    }

    /// Is this a terminal node?
    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    /// Every legal move has a child
    pub fn is_fully_expanded(&self) -> bool {
        self.untried_moves.is_empty()
    }

    /// Player whose move created this node
    pub fn mover(&self) -> Player {
        self.state.current_player().opponent()
    }
}

// ============================================================================
// MCTS TREE (Level 2 - Tree Operations)
// ============================================================================

/// MCTS search tree with arena allocation
#[derive(Debug)]
pub struct MctsTree {
    /// Arena storage for nodes
    nodes: Vec<MctsNode>,
    /// Player to move at the root
    root_player: Player,
}

impl MctsTree {
    /// Create a new tree with the given root state
    pub fn new(root_state: GameState) -> Self {
        let root_player = root_state.current_player();
        let root = MctsNode::new(root_state, None, None, root_player);
        Self {
            nodes: vec![root],
            root_player,
        }
    }

    /// Get the root node id
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn root_player(&self) -> Player {
        self.root_player
    }

    /// Get a reference to a node
    pub fn get(&self, id: NodeId) -> &MctsNode {
        &self.nodes[id.0]
    }

    /// Get a mutable reference to a node
    pub fn get_mut(&mut self, id: NodeId) -> &mut MctsNode {
        &mut self.nodes[id.0]
    }

    /// Get the number of nodes in the tree
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Is the tree empty?
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ========================================================================
    // Level 2: Tree Operations
    // ========================================================================

    /// Descend through fully expanded nodes by UCB until reaching a node
    /// with untried moves or no children.
    pub fn select_leaf(&self, exploration: f32, bias_weight: f32) -> NodeId {
        let mut current = self.root();

        loop {
            let node = self.get(current);
            if node.children.is_empty() || !node.is_fully_expanded() {
                return current;
            }
            match self.select_best_child(current, exploration, bias_weight) {
                Some(child) => current = child,
                None => return current,
            }
        }
    }

    /// Expand a node by adding one child for a uniformly random untried move
    ///
    /// Returns the new child's NodeId, or None if node is fully expanded.
    pub fn expand<R: Rng>(&mut self, node_id: NodeId, rng: &mut R) -> Option<NodeId> {
        let untried = &mut self.get_mut(node_id).untried_moves;
        if untried.is_empty() {
            return None;
        }
        let pick = rng.gen_range(0..untried.len());
        let mv = untried.swap_remove(pick);

        let child_state = self.get(node_id).state.play(mv);
        let child_id = NodeId(self.nodes.len());
        let child = MctsNode::new(child_state, Some(node_id), Some(mv), self.root_player);
        self.nodes.push(child);

        self.get_mut(node_id).children.push((mv, child_id));

        Some(child_id)
    }

    // ========================================================================
    // Level 3: Selection Helpers
    // ========================================================================

    /// Select best child using UCB1 plus progressive bias
    fn select_best_child(
        &self,
        node_id: NodeId,
        exploration: f32,
        bias_weight: f32,
    ) -> Option<NodeId> {
        let node = self.get(node_id);
        let parent_visits = node.stats.visits;

        node.children
            .iter()
            .max_by(|(_, a), (_, b)| {
                let ucb_a = self.ucb(*a, parent_visits, exploration, bias_weight);
                let ucb_b = self.ucb(*b, parent_visits, exploration, bias_weight);
                ucb_a.partial_cmp(&ucb_b).unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|(_, id)| *id)
    }

    /// Selection score for a node
    ///
    /// UCB = wins/visits + C * sqrt(ln(parent_visits) / visits) + k * heuristic
    pub fn ucb(&self, node_id: NodeId, parent_visits: u32, exploration: f32, bias_weight: f32) -> f32 {
        let node = self.get(node_id);
        let visits = node.stats.visits;

        if visits == 0 {
            return f32::INFINITY; // Prioritize unexplored nodes
        }

        let exploitation = node.stats.win_rate();
        let exploration_term =
            exploration * ((parent_visits.max(1) as f32).ln() / visits as f32).sqrt();
        // 0 * inf would be NaN on decided positions
        let bias = if bias_weight == 0.0 {
            0.0
        } else {
            bias_weight * node.heuristic
        };

        exploitation + exploration_term + bias
    }

    // ========================================================================
    // Level 2: Backpropagation
    // ========================================================================

    /// Backpropagate a rollout winner from leaf to root
    ///
    /// A node's wins count rollouts won by the player who moved into it.
    pub fn backpropagate(&mut self, leaf_id: NodeId, winner: Option<Player>) {
        let mut current = Some(leaf_id);

        while let Some(node_id) = current {
            let node = self.get_mut(node_id);
            node.stats.visits += 1;
            if winner == Some(node.mover()) {
                node.stats.wins += 1;
            }
            current = node.parent;
        }
    }

    // ========================================================================
    // Level 3: Best Move Selection
    // ========================================================================

    /// Robust child: the root move with the most visits
    pub fn best_move(&self) -> Option<Cell> {
        let root = self.get(self.root());

        root.children
            .iter()
            .max_by_key(|(_, id)| self.get(*id).stats.visits)
            .map(|(mv, _)| *mv)
    }

    /// Get all root moves with their visit counts and win rates
    pub fn move_statistics(&self) -> Vec<(Cell, u32, f32)> {
        let root = self.get(self.root());

        root.children
            .iter()
            .map(|(mv, id)| {
                let node = self.get(*id);
                (*mv, node.stats.visits, node.stats.win_rate())
            })
            .collect()
    }

    /// Get total simulations run (root visits)
    pub fn total_simulations(&self) -> u32 {
        self.get(self.root()).stats.visits
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn mock_state() -> GameState {
        GameState::new(3).unwrap()
    }

    #[test]
    fn test_node_creation() {
        let node = MctsNode::new(mock_state(), None, None, Player::Red);

        assert!(node.parent.is_none());
        assert!(node.incoming_move.is_none());
        assert!(node.children.is_empty());
        assert_eq!(node.untried_moves.len(), 9);
        assert_eq!(node.stats.visits, 0);
        assert_eq!(node.stats.wins, 0);
        assert_eq!(node.heuristic, 0.0);
        assert!(!node.is_terminal());
    }

    #[test]
    fn test_terminal_node_has_no_untried_moves() {
        let state = GameState::from_position("R . .\nR . .\nR . .".parse().unwrap(), Player::Blue);
        let node = MctsNode::new(state, None, None, Player::Red);
        assert!(node.is_terminal());
        assert!(node.untried_moves.is_empty());
        assert_eq!(node.heuristic, f32::INFINITY);
    }

    #[test]
    fn test_tree_creation() {
        let tree = MctsTree::new(mock_state());

        assert_eq!(tree.len(), 1);
        assert_eq!(tree.root(), NodeId::ROOT);
        assert_eq!(tree.root_player(), Player::Red);
    }

    #[test]
    fn test_node_stats_win_rate() {
        let mut stats = NodeStats::default();
        assert_eq!(stats.win_rate(), 0.0);

        stats.visits = 10;
        stats.wins = 7;
        assert!((stats.win_rate() - 0.7).abs() < 0.001);
    }

    #[test]
    fn test_ucb_unexplored() {
        let mut tree = MctsTree::new(mock_state());
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let child = tree.expand(NodeId::ROOT, &mut rng).unwrap();

        // UCB for unexplored node should be infinity
        let ucb = tree.ucb(child, 100, 1.0, 0.0005);
        assert!(ucb.is_infinite());
    }

    #[test]
    fn test_ucb_includes_bias() {
        let mut tree = MctsTree::new(mock_state());
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let child = tree.expand(NodeId::ROOT, &mut rng).unwrap();
        tree.get_mut(child).stats = NodeStats { visits: 4, wins: 2 };
        tree.get_mut(child).heuristic = 2.0;

        let plain = tree.ucb(child, 16, 1.0, 0.0);
        let biased = tree.ucb(child, 16, 1.0, 0.5);
        let expected = 0.5 + ((16f32).ln() / 4.0).sqrt();
        assert!((plain - expected).abs() < 1e-5);
        assert!((biased - (expected + 1.0)).abs() < 1e-5);
    }

    #[test]
    fn test_tree_expansion() {
        let mut tree = MctsTree::new(mock_state());
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        let child_id = tree.expand(NodeId::ROOT, &mut rng).unwrap();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.get(child_id).parent, Some(NodeId::ROOT));
        assert_eq!(tree.get(NodeId::ROOT).untried_moves.len(), 8);

        let mv = tree.get(child_id).incoming_move.unwrap();
        assert!(!tree.get(NodeId::ROOT).untried_moves.contains(&mv));
        assert_eq!(tree.get(child_id).state.current_player(), Player::Blue);
    }

    #[test]
    fn test_expand_until_full() {
        let mut tree = MctsTree::new(mock_state());
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        for _ in 0..9 {
            assert!(tree.expand(NodeId::ROOT, &mut rng).is_some());
        }
        assert!(tree.get(NodeId::ROOT).is_fully_expanded());
        assert!(tree.expand(NodeId::ROOT, &mut rng).is_none());

        let mut moves: Vec<Cell> = tree.get(NodeId::ROOT).children.iter().map(|(mv, _)| *mv).collect();
        moves.sort();
        let mut legal = mock_state().legal_moves();
        legal.sort();
        assert_eq!(moves, legal);
    }

    #[test]
    fn test_backpropagation_alternates_perspective() {
        let mut tree = MctsTree::new(mock_state());
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let child = tree.expand(NodeId::ROOT, &mut rng).unwrap();
        let grandchild = tree.expand(child, &mut rng).unwrap();

        // Red moved into `child`, Blue moved into `grandchild`
        tree.backpropagate(grandchild, Some(Player::Red));

        assert_eq!(tree.get(grandchild).stats, NodeStats { visits: 1, wins: 0 });
        assert_eq!(tree.get(child).stats, NodeStats { visits: 1, wins: 1 });
        // Root was "moved into" by Blue
        assert_eq!(tree.get(NodeId::ROOT).stats, NodeStats { visits: 1, wins: 0 });

        tree.backpropagate(grandchild, None);
        assert_eq!(tree.get(child).stats, NodeStats { visits: 2, wins: 1 });
        assert_eq!(tree.total_simulations(), 2);
    }

    #[test]
    fn test_best_move_is_most_visited() {
        let mut tree = MctsTree::new(mock_state());
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let a = tree.expand(NodeId::ROOT, &mut rng).unwrap();
        let b = tree.expand(NodeId::ROOT, &mut rng).unwrap();
        tree.get_mut(a).stats = NodeStats { visits: 10, wins: 1 };
        tree.get_mut(b).stats = NodeStats { visits: 3, wins: 3 };

        assert_eq!(tree.best_move(), tree.get(a).incoming_move);
    }

    #[test]
    fn test_select_leaf_stops_at_unexpanded() {
        let mut tree = MctsTree::new(mock_state());
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        tree.expand(NodeId::ROOT, &mut rng);
        // Root still has untried moves
        assert_eq!(tree.select_leaf(1.0, 0.0005), NodeId::ROOT);
    }
}
