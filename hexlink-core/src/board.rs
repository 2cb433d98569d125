//! Rhombic hex board geometry and cell storage

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::HexError;
use crate::game::Player;

/// Default board size (11x11)
pub const DEFAULT_BOARD_SIZE: usize = 11;

/// Largest supported board size
pub const MAX_BOARD_SIZE: usize = 26;

/// Neighbor offsets (dx, dy) in the exact order the renderer's tiling uses.
///
/// The set is asymmetric in indices: (x-1, y+1) and (x+1, y-1) are
/// neighbors, (x+1, y+1) and (x-1, y-1) are not.
pub const NEIGHBOR_OFFSETS: [(isize, isize); 6] = [
    (-1, 1),
    (0, 1),
    (-1, 0),
    (1, 0),
    (0, -1),
    (1, -1),
];

/// Board coordinate: `x` is the column, `y` is the row
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: usize,
    pub y: usize,
}

impl Cell {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Contents of a single cell
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    #[default]
    Empty,
    Red,
    Blue,
}

impl Mark {
    pub fn to_char(self) -> char {
        match self {
            Mark::Empty => '.',
            Mark::Red => 'R',
            Mark::Blue => 'B',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            '.' => Some(Mark::Empty),
            'R' => Some(Mark::Red),
            'B' => Some(Mark::Blue),
            _ => None,
        }
    }

    /// Player owning this mark, if any
    pub fn player(self) -> Option<Player> {
        match self {
            Mark::Empty => None,
            Mark::Red => Some(Player::Red),
            Mark::Blue => Some(Player::Blue),
        }
    }
}

/// N x N board, row-major
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    size: usize,
    cells: Vec<Mark>,
}

impl Board {
    /// Create an empty board
    pub fn new(size: usize) -> Result<Self, HexError> {
        if size == 0 || size > MAX_BOARD_SIZE {
            return Err(HexError::InvalidBoardSize(size));
        }
        Ok(Self {
            size,
            cells: vec![Mark::Empty; size * size],
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Check if a cell lies on the board
    pub fn contains(&self, cell: Cell) -> bool {
        cell.x < self.size && cell.y < self.size
    }

    /// Mark at a cell, `None` when off the board
    pub fn get(&self, cell: Cell) -> Option<Mark> {
        if self.contains(cell) {
            Some(self.cells[self.index(cell)])
        } else {
            None
        }
    }

    /// Overwrite a cell. Returns the previous mark.
    pub fn set(&mut self, cell: Cell, mark: Mark) -> Result<Mark, HexError> {
        if !self.contains(cell) {
            return Err(HexError::InvalidMove {
                cell,
                reason: "cell is off the board",
            });
        }
        let idx = self.index(cell);
        Ok(std::mem::replace(&mut self.cells[idx], mark))
    }

    pub fn count_empty(&self) -> usize {
        self.cells.iter().filter(|&&m| m == Mark::Empty).count()
    }

    /// All cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        let n = self.size;
        (0..n).flat_map(move |y| (0..n).map(move |x| Cell::new(x, y)))
    }

    /// Cells currently empty, row-major
    pub fn empty_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells().filter(move |&c| self.cells[self.index(c)] == Mark::Empty)
    }

    /// On-board neighbors of a cell, in `NEIGHBOR_OFFSETS` order
    pub fn neighbors(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        let n = self.size as isize;
        NEIGHBOR_OFFSETS.iter().filter_map(move |&(dx, dy)| {
            let nx = cell.x as isize + dx;
            let ny = cell.y as isize + dy;
            if nx >= 0 && nx < n && ny >= 0 && ny < n {
                Some(Cell::new(nx as usize, ny as usize))
            } else {
                None
            }
        })
    }

    #[inline]
    pub(crate) fn index(&self, cell: Cell) -> usize {
        cell.y * self.size + cell.x
    }

    #[inline]
    pub(crate) fn mark_at(&self, idx: usize) -> Mark {
        self.cells[idx]
    }

    #[inline]
    pub(crate) fn set_index(&mut self, idx: usize, mark: Mark) {
        self.cells[idx] = mark;
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.size {
            let row: Vec<String> = (0..self.size)
                .map(|x| self.cells[y * self.size + x].to_char().to_string())
                .collect();
            writeln!(f, "{}", row.join(" "))?;
        }
        Ok(())
    }
}

impl FromStr for Board {
    type Err = HexError;

    /// Parse one row per line; cells may be space separated or contiguous.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows: Vec<Vec<Mark>> = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .enumerate()
            .map(|(y, line)| {
                line.chars()
                    .filter(|c| !c.is_whitespace())
                    .map(|c| {
                        Mark::from_char(c).ok_or_else(|| {
                            HexError::Parse(format!("unexpected character '{}' in row {}", c, y))
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<_, _>>()?;

        let mut board = Board::new(rows.len())?;
        for (y, row) in rows.iter().enumerate() {
            if row.len() != board.size {
                return Err(HexError::Parse(format!(
                    "row {} has {} cells, expected {}",
                    y,
                    row.len(),
                    board.size
                )));
            }
            for (x, &mark) in row.iter().enumerate() {
                let idx = board.index(Cell::new(x, y));
                board.cells[idx] = mark;
            }
        }
        Ok(board)
    }
}
