//! Game runner - executes single games
//!
//! Level 3 - Step-level implementation

use std::time::{Duration, Instant};

use hexlink_core::{AlphaBetaAI, Cell, GameResult, GameState, HexError, Player, RandomAI};
use hexlink_mcts::{MctsConfig, MctsPlayer, SearchBudget};
use tracing::{debug, warn};

use crate::config::{AiConfig, PlayerType};

// ============================================================================
// AI PLAYERS
// ============================================================================

/// Any engine that can be asked for a move
pub enum AiPlayer {
    Random(RandomAI),
    AlphaBeta(AlphaBetaAI),
    Mcts(MctsPlayer),
}

impl AiPlayer {
    /// Create an AI player from config
    ///
    /// `seed` applies when the config carries none; both absent means entropy.
    pub fn from_config(config: &AiConfig, seed: Option<u64>) -> Result<Self, HexError> {
        config.validate()?;
        let seed = config.seed.or(seed);

        match config.player_type {
            PlayerType::Random => Ok(AiPlayer::Random(match seed {
                Some(seed) => RandomAI::with_seed(seed),
                None => RandomAI::new(),
            })),
            PlayerType::AlphaBeta => {
                let mut ai = AlphaBetaAI::new(config.depth);
                if let Some(limit) = config.time_limit() {
                    ai = ai.with_time_limit(limit);
                }
                ai.validate()?;
                Ok(AiPlayer::AlphaBeta(ai))
            }
            PlayerType::Mcts => {
                let budget = match config.time_limit() {
                    Some(limit) => SearchBudget::Time(limit),
                    None => SearchBudget::Iterations(config.simulations),
                };
                let mut mcts_config = MctsConfig::default().with_budget(budget);
                if let Some(seed) = seed {
                    mcts_config = mcts_config.with_seed(seed);
                }
                Ok(AiPlayer::Mcts(MctsPlayer::new(mcts_config)?))
            }
        }
    }

    /// Get move from AI player
    pub fn choose_move(&mut self, state: &GameState) -> Option<Cell> {
        match self {
            AiPlayer::Random(ai) => ai.best_move(state),
            AiPlayer::AlphaBeta(ai) => ai.best_move(state),
            AiPlayer::Mcts(ai) => ai.best_move(state),
        }
    }
}

// ============================================================================
// GAME OUTCOME
// ============================================================================

/// Per-player bookkeeping for one game
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlayerKpi {
    /// Times the player was asked for a move
    pub moves: u32,
    /// Total time spent choosing moves
    pub think_time: Duration,
}

/// Why a game stopped
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndReason {
    /// A player connected their edges
    Connection,
    /// No empty cell left without a connection
    BoardFull,
    /// The player to move produced no move
    NoMove,
    /// The player to move used up their clock
    Timeout,
    /// The player to move produced an illegal cell
    IllegalMove,
}

/// Outcome of a single game
#[derive(Clone, Debug)]
pub struct GameOutcome {
    /// Final game result
    pub result: GameResult,
    /// How the game ended
    pub end: EndReason,
    /// Move history
    pub moves: Vec<Cell>,
    pub red: PlayerKpi,
    pub blue: PlayerKpi,
}

impl GameOutcome {
    /// Get winner (None for draw)
    pub fn winner(&self) -> Option<Player> {
        self.result.winner()
    }

    /// Check if game is a draw
    pub fn is_draw(&self) -> bool {
        self.winner().is_none()
    }

    pub fn kpi(&self, player: Player) -> &PlayerKpi {
        match player {
            Player::Red => &self.red,
            Player::Blue => &self.blue,
        }
    }
}

// ============================================================================
// GAME RUNNER
// ============================================================================

/// Game runner that plays engine-vs-engine games from an empty board
#[derive(Clone, Debug)]
pub struct GameRunner {
    initial: GameState,
    clock: Option<Duration>,
}

impl GameRunner {
    /// Create a new game runner for an N x N board
    pub fn new(board_size: usize) -> Result<Self, HexError> {
        Ok(Self {
            initial: GameState::new(board_size)?,
            clock: None,
        })
    }

    /// Give each player a thinking clock; running out loses the game
    pub fn with_clock(mut self, clock: Duration) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn board_size(&self) -> usize {
        self.initial.size()
    }

    /// Play a single game, returning the outcome
    pub fn play_game(&self, red: &mut AiPlayer, blue: &mut AiPlayer) -> GameOutcome {
        let mut state = self.initial.clone();
        let mut moves = Vec::new();
        let mut red_kpi = PlayerKpi::default();
        let mut blue_kpi = PlayerKpi::default();

        let (result, end) = loop {
            match state.result() {
                GameResult::Ongoing => {}
                GameResult::Draw => break (GameResult::Draw, EndReason::BoardFull),
                decided => break (decided, EndReason::Connection),
            }

            let mover = state.current_player();
            let (agent, kpi) = match mover {
                Player::Red => (&mut *red, &mut red_kpi),
                Player::Blue => (&mut *blue, &mut blue_kpi),
            };

            let start = Instant::now();
            let choice = agent.choose_move(&state);
            kpi.think_time += start.elapsed();
            kpi.moves += 1;

            if let Some(clock) = self.clock {
                if kpi.think_time >= clock {
                    warn!(player = %mover, used_ms = kpi.think_time.as_millis() as u64, "clock ran out");
                    break (win_for(mover.opponent()), EndReason::Timeout);
                }
            }

            let Some(cell) = choice else {
                debug!(player = %mover, "no move available, scoring a draw");
                break (GameResult::Draw, EndReason::NoMove);
            };

            match state.apply_move(cell) {
                Ok(next) => {
                    state = next;
                    moves.push(cell);
                }
                Err(e) => {
                    warn!(player = %mover, error = %e, "illegal move forfeits the game");
                    break (win_for(mover.opponent()), EndReason::IllegalMove);
                }
            }
        };

        GameOutcome {
            result,
            end,
            moves,
            red: red_kpi,
            blue: blue_kpi,
        }
    }
}

fn win_for(player: Player) -> GameResult {
    match player {
        Player::Red => GameResult::RedWins,
        Player::Blue => GameResult::BlueWins,
    }
}
