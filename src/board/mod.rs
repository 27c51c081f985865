//! Board representation shared by both game topologies

mod board;


use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// Re-exports
pub use board::{Board, LegalMoves};

/// Largest supported board side (columns are labelled A-Z in the UI)
pub const MAX_DIM: u8 = 26;

/// The two sides of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    #[serde(rename = "X")]
    First,
    #[serde(rename = "O")]
    Second,
}

impl Player {
    /// Get opponent
    #[inline]
    pub fn opponent(self) -> Player {
        match self {
            Player::First => Player::Second,
            Player::Second => Player::First,
        }
    }

    /// Single-character symbol used in text boards
    #[inline]
    pub fn symbol(self) -> char {
        match self {
            Player::First => 'X',
            Player::Second => 'O',
        }
    }
}

/// Contents of one board cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    Occupied(Player),
}

impl Cell {
    #[inline]
    pub fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }

    #[inline]
    pub fn player(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::Occupied(p) => Some(p),
        }
    }
}

impl From<Option<Player>> for Cell {
    fn from(value: Option<Player>) -> Self {
        value.map_or(Cell::Empty, Cell::Occupied)
    }
}

/// How a move chooses its cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Placement {
    /// Any empty cell may be taken
    #[serde(rename = "free")]
    FreePlacement,
    /// A column is chosen; the stone falls to the lowest empty row
    #[serde(rename = "gravity")]
    GravityDrop,
}

/// Board geometry and win rule
///
/// Deserializing runs [`BoardConfig::validate`], so a decoded value is always usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawBoardConfig")]
pub struct BoardConfig {
    pub rows: u8,
    pub cols: u8,
    pub win_length: u8,
    pub placement: Placement,
}

impl BoardConfig {
    /// Build and validate a configuration.
    pub fn new(
        rows: u8,
        cols: u8,
        win_length: u8,
        placement: Placement,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            rows,
            cols,
            win_length,
            placement,
        };
        config.validate()?;
        Ok(config)
    }

    /// Free-placement 15x15 board, five in a row.
    pub const fn gomoku() -> Self {
        Self {
            rows: 15,
            cols: 15,
            win_length: 5,
            placement: Placement::FreePlacement,
        }
    }

    /// Gravity-drop 6x7 board, four in a row.
    pub const fn connect_four() -> Self {
        Self {
            rows: 6,
            cols: 7,
            win_length: 4,
            placement: Placement::GravityDrop,
        }
    }

    /// `win_length` may exceed the board sides; such boards simply never produce a winner.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.rows > MAX_DIM {
            return Err(ConfigError::Validation(format!(
                "rows must be in 1..={MAX_DIM}, got {}",
                self.rows
            )));
        }
        if self.cols == 0 || self.cols > MAX_DIM {
            return Err(ConfigError::Validation(format!(
                "cols must be in 1..={MAX_DIM}, got {}",
                self.cols
            )));
        }
        if self.win_length < 2 {
            return Err(ConfigError::Validation(format!(
                "win_length must be >= 2, got {}",
                self.win_length
            )));
        }
        Ok(())
    }

    #[inline]
    pub fn total_cells(&self) -> usize {
        self.rows as usize * self.cols as usize
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self::gomoku()
    }
}

/// Unchecked wire form of [`BoardConfig`]
#[derive(Deserialize)]
struct RawBoardConfig {
    rows: u8,
    cols: u8,
    win_length: u8,
    placement: Placement,
}

impl TryFrom<RawBoardConfig> for BoardConfig {
    type Error = ConfigError;

    fn try_from(raw: RawBoardConfig) -> Result<Self, Self::Error> {
        Self::new(raw.rows, raw.cols, raw.win_length, raw.placement)
    }
}

/// Position on the board (row 0 is the top row)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub row: u8,
    pub col: u8,
}

impl Pos {
    #[inline]
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }
}

impl PartialOrd for Pos {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pos {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.row, self.col).cmp(&(other.row, other.col))
    }
}

/// A move as chosen by a player.
///
/// Only meaningful against the board it was generated from: a `Drop` lands
/// wherever the column's lowest empty cell currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Place { row: u8, col: u8 },
    Drop { col: u8 },
}

impl Move {
    #[inline]
    pub const fn place(row: u8, col: u8) -> Self {
        Move::Place { row, col }
    }

    #[inline]
    pub const fn column(col: u8) -> Self {
        Move::Drop { col }
    }

    #[inline]
    pub fn col(self) -> u8 {
        match self {
            Move::Place { col, .. } | Move::Drop { col } => col,
        }
    }
}

impl From<Pos> for Move {
    fn from(pos: Pos) -> Self {
        Move::Place {
            row: pos.row,
            col: pos.col,
        }
    }
}
