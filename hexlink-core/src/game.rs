//! Game state, move application and win detection

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{Board, Cell, Mark};
use crate::error::HexError;

// ============================================================================
// CORE TYPES
// ============================================================================

/// Player color. Red connects top to bottom, Blue connects left to right.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    Red = 0,
    Blue = 1,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::Red => Player::Blue,
            Player::Blue => Player::Red,
        }
    }

    pub fn mark(self) -> Mark {
        match self {
            Player::Red => Mark::Red,
            Player::Blue => Mark::Blue,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Player::Red => "red",
            Player::Blue => "blue",
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Player {
    type Err = HexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "red" | "r" => Ok(Player::Red),
            "blue" | "b" => Ok(Player::Blue),
            other => Err(HexError::Parse(format!("unknown player '{}'", other))),
        }
    }
}

/// Game result
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    Ongoing,
    RedWins,
    BlueWins,
    /// Board filled without a connection
    Draw,
}

impl GameResult {
    pub fn winner(self) -> Option<Player> {
        match self {
            GameResult::RedWins => Some(Player::Red),
            GameResult::BlueWins => Some(Player::Blue),
            GameResult::Ongoing | GameResult::Draw => None,
        }
    }
}

// ============================================================================
// GAME STATE
// ============================================================================

/// Immutable-per-move game snapshot (apply a move to get a new one)
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GameState {
    board: Board,
    current_player: Player,
    empty_count: usize,
}

impl GameState {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Empty board of the given size, Red to move
    pub fn new(size: usize) -> Result<Self, HexError> {
        Ok(Self::from_position(Board::new(size)?, Player::Red))
    }

    /// Build a state from driver data, checking the empty count
    pub fn from_board(
        board: Board,
        current_player: Player,
        empty_count: usize,
    ) -> Result<Self, HexError> {
        let actual = board.count_empty();
        if actual != empty_count {
            return Err(HexError::EmptyCountMismatch {
                given: empty_count,
                actual,
            });
        }
        Ok(Self {
            board,
            current_player,
            empty_count,
        })
    }

    /// Build a state, counting empty cells from the board
    pub fn from_position(board: Board, current_player: Player) -> Self {
        let empty_count = board.count_empty();
        Self {
            board,
            current_player,
            empty_count,
        }
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn size(&self) -> usize {
        self.board.size()
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn empty_count(&self) -> usize {
        self.empty_count
    }

    /// Check whether a cell can be played
    pub fn is_legal(&self, cell: Cell) -> bool {
        self.board.get(cell) == Some(Mark::Empty)
    }

    // ========================================================================
    // MOVES
    // ========================================================================

    /// All empty cells in row-major order
    pub fn legal_moves(&self) -> Vec<Cell> {
        if self.empty_count == 0 {
            return Vec::new();
        }
        let mut moves = Vec::with_capacity(self.empty_count);
        moves.extend(self.board.empty_cells());
        moves
    }

    /// Apply a move, returning the successor state
    pub fn apply_move(&self, cell: Cell) -> Result<GameState, HexError> {
        match self.board.get(cell) {
            None => Err(HexError::InvalidMove {
                cell,
                reason: "cell is off the board",
            }),
            Some(Mark::Empty) => Ok(self.place(cell)),
            Some(_) => Err(HexError::InvalidMove {
                cell,
                reason: "cell is occupied",
            }),
        }
    }

    /// Apply a move taken from `legal_moves`.
    ///
    /// # Panics
    ///
    /// Panics if the cell is off the board or occupied.
    pub fn play(&self, cell: Cell) -> GameState {
        assert!(self.is_legal(cell), "illegal move {} on this board", cell);
        self.place(cell)
    }

    fn place(&self, cell: Cell) -> GameState {
        let mut next = self.clone();
        let idx = next.board.index(cell);
        next.board.set_index(idx, self.current_player.mark());
        next.empty_count -= 1;
        next.current_player = self.current_player.opponent();
        next
    }

    // ========================================================================
    // TERMINAL DETECTION
    // ========================================================================

    /// Breadth-first search from the player's start edge over its own stones
    pub fn check_win(&self, player: Player) -> bool {
        let n = self.board.size();
        let mark = player.mark();
        let mut visited = vec![false; n * n];
        let mut queue = VecDeque::new();

        for i in 0..n {
            let start = match player {
                Player::Red => Cell::new(i, 0),
                Player::Blue => Cell::new(0, i),
            };
            let idx = self.board.index(start);
            if self.board.mark_at(idx) == mark {
                visited[idx] = true;
                queue.push_back(start);
            }
        }

        while let Some(cell) = queue.pop_front() {
            let reached_goal = match player {
                Player::Red => cell.y == n - 1,
                Player::Blue => cell.x == n - 1,
            };
            if reached_goal {
                return true;
            }
            for next in self.board.neighbors(cell) {
                let idx = self.board.index(next);
                if !visited[idx] && self.board.mark_at(idx) == mark {
                    visited[idx] = true;
                    queue.push_back(next);
                }
            }
        }

        false
    }

    pub fn is_terminal(&self) -> bool {
        self.check_win(Player::Red) || self.check_win(Player::Blue) || self.empty_count == 0
    }

    pub fn result(&self) -> GameResult {
        if self.check_win(Player::Red) {
            GameResult::RedWins
        } else if self.check_win(Player::Blue) {
            GameResult::BlueWins
        } else if self.empty_count == 0 {
            GameResult::Draw
        } else {
            GameResult::Ongoing
        }
    }

    pub fn winner(&self) -> Option<Player> {
        self.result().winner()
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.board)?;
        writeln!(f, "{} to move, {} empty", self.current_player, self.empty_count)
    }
}

// ============================================================================
// TESTS
// ============================================================================
