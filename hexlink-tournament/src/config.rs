//! Configuration types for tournament play
//!
//! Level 4 - Utilities and configuration

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use hexlink_core::{HexError, DEFAULT_BOARD_SIZE, MAX_BOARD_SIZE};
use serde::{Deserialize, Serialize};

/// Player type for games
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerType {
    /// Uniform random legal moves
    Random,
    /// Alpha-Beta pruning search
    #[default]
    AlphaBeta,
    /// Monte Carlo Tree Search
    Mcts,
}

/// AI configuration for game playing
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Player type
    pub player_type: PlayerType,
    /// Search depth for alpha-beta
    pub depth: u32,
    /// Number of iterations for MCTS
    pub simulations: u32,
    /// Optional time limit in milliseconds (MCTS budget, alpha-beta deadline)
    pub time_limit_ms: Option<u64>,
    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            player_type: PlayerType::AlphaBeta,
            depth: 2,
            simulations: 1000,
            time_limit_ms: None,
            seed: None,
        }
    }
}

impl AiConfig {
    /// Create config for the random player
    pub fn random() -> Self {
        Self {
            player_type: PlayerType::Random,
            ..Default::default()
        }
    }

    /// Create config for alpha-beta at given depth
    pub fn alpha_beta(depth: u32) -> Self {
        Self {
            player_type: PlayerType::AlphaBeta,
            depth,
            ..Default::default()
        }
    }

    /// Create config for MCTS with given iterations
    pub fn mcts(simulations: u32) -> Self {
        Self {
            player_type: PlayerType::Mcts,
            simulations,
            ..Default::default()
        }
    }

    /// Set a time limit
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Set random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_ms.map(Duration::from_millis)
    }

    /// Short descriptive label, e.g. `Minimax_depth2`
    pub fn label(&self) -> String {
        match self.player_type {
            PlayerType::Random => "Random".to_string(),
            PlayerType::AlphaBeta => format!("Minimax_depth{}", self.depth),
            PlayerType::Mcts => match self.time_limit_ms {
                Some(ms) => format!("MCTS_{}ms", ms),
                None => format!("MCTS_{}", self.simulations),
            },
        }
    }

    /// Reject budgets the selected engine cannot run with
    pub fn validate(&self) -> Result<(), HexError> {
        match self.player_type {
            PlayerType::Random => Ok(()),
            PlayerType::AlphaBeta if self.depth == 0 => Err(HexError::InvalidParameter(
                "alpha-beta depth must be positive".into(),
            )),
            PlayerType::Mcts if self.time_limit_ms.is_none() && self.simulations == 0 => Err(
                HexError::InvalidParameter("MCTS iterations must be positive".into()),
            ),
            _ if self.time_limit_ms == Some(0) => Err(HexError::InvalidParameter(
                "time limit must be positive".into(),
            )),
            _ => Ok(()),
        }
    }
}

/// A named tournament entrant
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,
    #[serde(flatten)]
    pub ai: AiConfig,
}

impl Participant {
    pub fn new(name: impl Into<String>, ai: AiConfig) -> Self {
        Self {
            name: name.into(),
            ai,
        }
    }
}

/// Which entrant opens as Red and which as Blue
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pairing {
    pub red: String,
    pub blue: String,
}

impl Pairing {
    pub fn new(red: impl Into<String>, blue: impl Into<String>) -> Self {
        Self {
            red: red.into(),
            blue: blue.into(),
        }
    }
}

/// Tournament configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TournamentConfig {
    /// Board edge length
    pub board_size: usize,
    /// Number of games per pairing
    pub games_per_pairing: usize,
    /// Entrants, referenced by name from `pairings`
    pub participants: Vec<Participant>,
    /// Pairings to play; empty means every entrant meets every other.
    /// A file that omits this gets a round robin, not the built-in pairings.
    #[serde(default)]
    pub pairings: Vec<Pairing>,
    /// Swap colors on every other game of a pairing
    pub alternate_colors: bool,
    /// Whether to run games in parallel
    pub parallel: bool,
    /// Per-player thinking clock in milliseconds (None = unlimited)
    pub clock_ms: Option<u64>,
    /// Base seed for agents without their own
    pub seed: Option<u64>,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            board_size: DEFAULT_BOARD_SIZE,
            games_per_pairing: 5,
            participants: vec![
                Participant::new("Random", AiConfig::random()),
                Participant::new("Minimax_depth2", AiConfig::alpha_beta(2)),
                Participant::new("MCTS", AiConfig::mcts(20)),
            ],
            pairings: vec![
                Pairing::new("Random", "MCTS"),
                Pairing::new("Random", "Minimax_depth2"),
                Pairing::new("Minimax_depth2", "MCTS"),
            ],
            alternate_colors: false,
            parallel: true,
            clock_ms: None,
            seed: None,
        }
    }
}

impl TournamentConfig {
    /// Load from a JSON file; missing fields take their defaults
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read tournament config {}", path.display()))?;
        let config: TournamentConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse tournament config {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid tournament config {}", path.display()))?;
        Ok(config)
    }

    /// Builder: set board size
    pub fn with_board_size(mut self, size: usize) -> Self {
        self.board_size = size;
        self
    }

    /// Builder: set games per pairing
    pub fn with_games_per_pairing(mut self, games: usize) -> Self {
        self.games_per_pairing = games;
        self
    }

    /// Builder: replace entrants and pairings
    pub fn with_participants(mut self, participants: Vec<Participant>, pairings: Vec<Pairing>) -> Self {
        self.participants = participants;
        self.pairings = pairings;
        self
    }

    pub fn with_alternate_colors(mut self, alternate: bool) -> Self {
        self.alternate_colors = alternate;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_clock_ms(mut self, ms: u64) -> Self {
        self.clock_ms = Some(ms);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn clock(&self) -> Option<Duration> {
        self.clock_ms.map(Duration::from_millis)
    }

    /// Look up an entrant by name
    pub fn participant(&self, name: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.name == name)
    }

    /// Pairings to play, expanding an empty list to a round robin
    pub fn resolved_pairings(&self) -> Vec<Pairing> {
        if !self.pairings.is_empty() {
            return self.pairings.clone();
        }
        let n = self.participants.len();
        let mut pairings = Vec::new();
        for i in 0..n {
            for j in (i + 1)..n {
                pairings.push(Pairing::new(
                    self.participants[i].name.clone(),
                    self.participants[j].name.clone(),
                ));
            }
        }
        pairings
    }

    /// Check sizes, entrant configs and pairing references
    pub fn validate(&self) -> Result<(), HexError> {
        if self.board_size == 0 || self.board_size > MAX_BOARD_SIZE {
            return Err(HexError::InvalidBoardSize(self.board_size));
        }
        for (i, p) in self.participants.iter().enumerate() {
            p.ai.validate()?;
            if self.participants[..i].iter().any(|q| q.name == p.name) {
                return Err(HexError::InvalidParameter(format!(
                    "duplicate participant '{}'",
                    p.name
                )));
            }
        }
        for pairing in &self.pairings {
            for name in [&pairing.red, &pairing.blue] {
                if self.participant(name).is_none() {
                    return Err(HexError::InvalidParameter(format!(
                        "pairing references unknown participant '{}'",
                        name
                    )));
                }
            }
        }
        Ok(())
    }
}
