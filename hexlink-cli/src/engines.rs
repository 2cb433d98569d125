//! Engine selection flags shared by the commands

use clap::{Args, ValueEnum};
use hexlink_tournament::AiConfig;

/// Which engine to run
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum EngineKind {
    Minimax,
    Mcts,
    Random,
}

/// Search parameters; each engine reads the ones it understands
#[derive(Args, Clone, Debug)]
pub struct EngineArgs {
    /// Alpha-beta search depth
    #[arg(long, default_value = "3")]
    pub depth: u32,

    /// MCTS iterations per move
    #[arg(long, default_value = "1000")]
    pub iterations: u32,

    /// Time budget per move in milliseconds (MCTS budget, minimax deadline)
    #[arg(long, value_name = "MS")]
    pub time_ms: Option<u64>,
}

impl EngineArgs {
    /// Build the engine config for `kind`
    pub fn ai_config(&self, kind: EngineKind) -> AiConfig {
        let config = match kind {
            EngineKind::Minimax => AiConfig::alpha_beta(self.depth),
            EngineKind::Mcts => AiConfig::mcts(self.iterations),
            EngineKind::Random => AiConfig::random(),
        };
        match self.time_ms {
            Some(ms) => config.with_time_limit_ms(ms),
            None => config,
        }
    }
}
