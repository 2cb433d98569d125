//! CPU-based Alpha-Beta AI
//!
//! Minimax with alpha-beta pruning, heuristic move ordering, a
//! transposition cache and iterative deepening.

use std::time::{Duration, Instant};

use rustc_hash::FxHashMap;

use crate::board::{Board, Cell};
use crate::error::HexError;
use crate::eval::evaluate;
use crate::game::{GameState, Player};

// ============================================================================
// TRANSPOSITION CACHE
// ============================================================================

/// How a cached score relates to the true minimax value
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
    /// Searched with a full window
    Exact,
    /// Fail-high: true value >= score
    Lower,
    /// Fail-low: true value <= score
    Upper,
}

/// Cached search result for (board, depth, polarity)
#[derive(Clone, Copy, Debug)]
pub struct TranspositionEntry {
    pub score: f32,
    pub best_move: Option<Cell>,
    pub bound: Bound,
}

impl TranspositionEntry {
    /// Whether this entry answers a probe with the given window
    fn usable(&self, alpha: f32, beta: f32) -> bool {
        match self.bound {
            Bound::Exact => true,
            Bound::Lower => self.score >= beta,
            Bound::Upper => self.score <= alpha,
        }
    }
}

type CacheKey = (Board, u32, bool);

// ============================================================================
// SEARCH STATISTICS
// ============================================================================

/// Counters for one iterative-deepening run
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchStats {
    /// Nodes entered (including cache hits)
    pub nodes: u64,
    /// Probes answered from the cache
    pub cache_hits: u64,
    /// Sibling lists abandoned on `beta <= alpha`
    pub cutoffs: u64,
    /// Deepest depth that finished
    pub depth_completed: u32,
    /// Cache entries present when the last depth finished
    pub cache_entries: usize,
}

/// Outcome of a search
#[derive(Clone, Debug)]
pub struct SearchReport {
    pub best_move: Option<Cell>,
    /// Score of the best move from the mover's perspective
    pub score: f32,
    pub stats: SearchStats,
}

// ============================================================================
// ALPHA-BETA AI
// ============================================================================

/// Alpha-Beta AI player
#[derive(Debug)]
pub struct AlphaBetaAI {
    pub max_depth: u32,
    pub time_limit: Option<Duration>,
    cache: FxHashMap<CacheKey, TranspositionEntry>,
}

impl AlphaBetaAI {
    pub fn new(max_depth: u32) -> Self {
        Self {
            max_depth,
            time_limit: None,
            cache: FxHashMap::default(),
        }
    }

    /// Abort deeper iterations once the budget is spent
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn validate(&self) -> Result<(), HexError> {
        if self.max_depth == 0 {
            return Err(HexError::InvalidParameter(
                "search depth must be at least 1".to_string(),
            ));
        }
        if self.time_limit == Some(Duration::ZERO) {
            return Err(HexError::InvalidParameter(
                "time limit must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Get best move for current position
    pub fn best_move(&mut self, state: &GameState) -> Option<Cell> {
        self.search(state).best_move
    }

    /// Run iterative deepening from `state` and report the deepest result
    pub fn search(&mut self, state: &GameState) -> SearchReport {
        let root = state.current_player();
        let moves = state.legal_moves();
        if moves.is_empty() {
            return SearchReport {
                best_move: None,
                score: evaluate(state, root),
                stats: SearchStats::default(),
            };
        }

        if let Some(mv) = immediate_win(state, &moves) {
            tracing::debug!(%mv, "taking immediate win");
            return SearchReport {
                best_move: Some(mv),
                score: f32::INFINITY,
                stats: SearchStats::default(),
            };
        }

        let deadline = self.time_limit.map(|limit| Instant::now() + limit);
        let mut stats = SearchStats::default();
        let mut best: Option<(Option<Cell>, f32)> = None;

        for depth in 1..=self.max_depth.max(1) {
            // Scores are depth-relative: entries from the previous depth are stale
            self.cache.clear();

            let mut searcher = Searcher {
                cache: &mut self.cache,
                root,
                // Depth 1 always completes
                deadline: if depth == 1 { None } else { deadline },
                aborted: false,
                stats: &mut stats,
            };
            let (mv, score) =
                searcher.minimax(state, depth, f32::NEG_INFINITY, f32::INFINITY, true);

            if searcher.aborted {
                tracing::debug!(depth, "time budget spent, keeping previous depth");
                break;
            }

            stats.depth_completed = depth;
            stats.cache_entries = self.cache.len();
            tracing::debug!(
                depth,
                best = ?mv,
                score,
                nodes = stats.nodes,
                cache_hits = stats.cache_hits,
                cutoffs = stats.cutoffs,
                "depth complete"
            );
            best = Some((mv, score));

            // Decided root: deeper search cannot change the outcome
            if score.is_infinite() || depth as usize >= state.empty_count() {
                break;
            }
        }

        let (best_move, score) = best.unwrap_or((None, evaluate(state, root)));
        SearchReport {
            // Search only comes back empty-handed on a terminal root
            best_move: best_move.or_else(|| moves.first().copied()),
            score,
            stats,
        }
    }

    /// Number of cached entries left from the last depth searched
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }
}

/// First legal move that wins on the spot for the player to move
fn immediate_win(state: &GameState, moves: &[Cell]) -> Option<Cell> {
    let player = state.current_player();
    moves
        .iter()
        .copied()
        .find(|&mv| state.play(mv).check_win(player))
}

// ============================================================================
// MINIMAX WITH ALPHA-BETA
// ============================================================================

struct Searcher<'a> {
    cache: &'a mut FxHashMap<CacheKey, TranspositionEntry>,
    root: Player,
    deadline: Option<Instant>,
    aborted: bool,
    stats: &'a mut SearchStats,
}

impl Searcher<'_> {
    fn out_of_time(&mut self) -> bool {
        if !self.aborted {
            if let Some(deadline) = self.deadline {
                self.aborted = Instant::now() >= deadline;
            }
        }
        self.aborted
    }

    fn minimax(
        &mut self,
        state: &GameState,
        depth: u32,
        mut alpha: f32,
        mut beta: f32,
        maximizing: bool,
    ) -> (Option<Cell>, f32) {
        self.stats.nodes += 1;

        if depth == 0 || state.is_terminal() {
            return (None, evaluate(state, self.root));
        }
        if self.out_of_time() {
            return (None, 0.0);
        }

        let key = (state.board().clone(), depth, maximizing);
        if let Some(entry) = self.cache.get(&key) {
            if entry.usable(alpha, beta) {
                self.stats.cache_hits += 1;
                return (entry.best_move, entry.score);
            }
        }

        let (alpha_orig, beta_orig) = (alpha, beta);
        let children = ordered_children(state, self.root, maximizing);

        let mut best_move = children.first().map(|(mv, _, _)| *mv);
        let mut best_score = if maximizing {
            f32::NEG_INFINITY
        } else {
            f32::INFINITY
        };

        for (mv, child, _) in &children {
            let (_, score) = self.minimax(child, depth - 1, alpha, beta, !maximizing);
            if self.aborted {
                return (None, 0.0);
            }

            if maximizing {
                if score > best_score {
                    best_score = score;
                    best_move = Some(*mv);
                }
                alpha = alpha.max(score);
            } else {
                if score < best_score {
                    best_score = score;
                    best_move = Some(*mv);
                }
                beta = beta.min(score);
            }

            if beta <= alpha {
                self.stats.cutoffs += 1;
                break;
            }
        }

        let bound = if best_score <= alpha_orig {
            Bound::Upper
        } else if best_score >= beta_orig {
            Bound::Lower
        } else {
            Bound::Exact
        };
        self.cache.insert(
            key,
            TranspositionEntry {
                score: best_score,
                best_move,
                bound,
            },
        );

        (best_move, best_score)
    }
}

// ============================================================================
// MOVE ORDERING
// ============================================================================

/// Children paired with their static score, best first for the side to move
fn ordered_children(
    state: &GameState,
    root: Player,
    maximizing: bool,
) -> Vec<(Cell, GameState, f32)> {
    let mut children: Vec<(Cell, GameState, f32)> = state
        .legal_moves()
        .into_iter()
        .map(|mv| {
            let child = state.play(mv);
            let score = evaluate(&child, root);
            (mv, child, score)
        })
        .collect();

    // Stable sort keeps row-major order among equal scores
    if maximizing {
        children.sort_by(|a, b| b.2.partial_cmp(&a.2).unwrap_or(std::cmp::Ordering::Equal));
    } else {
        children.sort_by(|a, b| a.2.partial_cmp(&b.2).unwrap_or(std::cmp::Ordering::Equal));
    }
    children
}

// ============================================================================
// DRIVER ENTRY POINT
// ============================================================================

/// Pick a move with iterative-deepening alpha-beta.
///
/// Returns `Ok(None)` when the board has no empty cell.
pub fn choose_move_minimax(
    board: &Board,
    player_to_move: Player,
    empty_count: usize,
    max_depth: u32,
) -> Result<Option<Cell>, HexError> {
    let mut ai = AlphaBetaAI::new(max_depth);
    ai.validate()?;
    let state = GameState::from_board(board.clone(), player_to_move, empty_count)?;
    Ok(ai.best_move(&state))
}

// ============================================================================
// TESTS
// ============================================================================
