//! HEXLINK Core - Hex game model and search
//!
//! This crate provides the core game logic for Hex:
//! - Board geometry (N x N rhombus, six-neighbor adjacency)
//! - Game state with copy-on-write move application
//! - Win detection and shortest-path evaluation
//! - CPU-based alpha-beta AI with iterative deepening
//! - Uniform random player

pub mod board;
pub mod error;
pub mod game;
pub mod eval;
pub mod ai;
pub mod random;

// Re-exports for convenient access
pub use board::{Board, Cell, Mark, DEFAULT_BOARD_SIZE, MAX_BOARD_SIZE, NEIGHBOR_OFFSETS};
pub use error::HexError;
pub use game::{GameState, GameResult, Player};
pub use eval::{evaluate, shortest_path_distance, UNREACHABLE, WIN_VALUE};
pub use ai::{choose_move_minimax, AlphaBetaAI, SearchReport, SearchStats};
pub use random::RandomAI;
