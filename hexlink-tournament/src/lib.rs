//! HEXLINK Tournament - Engine-vs-engine evaluation through game playing
//!
//! This crate provides tournament infrastructure:
//! - Single games with per-player clocks and KPIs
//! - Matches between two configured engines
//! - Tournaments over explicit or round-robin pairings
//! - PGN-style result logs
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run_tournament (orchestration)
//! - Level 2: play_match (phases)
//! - Level 3: play_game (steps)
//! - Level 4: utilities, configuration, PGN output

mod config;
mod game_runner;
mod match_play;
pub mod pgn;
mod tournament;

pub use config::{AiConfig, Pairing, Participant, PlayerType, TournamentConfig};
pub use game_runner::{AiPlayer, EndReason, GameOutcome, GameRunner, PlayerKpi};
pub use match_play::{play_match, GameRecord, MatchResult, MatchSettings};
pub use tournament::{run_tournament, Standing, TournamentResult};
