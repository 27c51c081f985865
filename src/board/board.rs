//! Grid storage, move resolution and legal-move enumeration

use std::fmt;

use super::{BoardConfig, Cell, Move, Placement, Player, Pos};
use crate::error::{MoveError, ProtocolError};

/// Game board for either topology.
///
/// `apply` has copy semantics and never touches `self`; `place`/`remove` mutate
/// in place and are meant for a private working copy (the search tree).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    config: BoardConfig,
    cells: Vec<Cell>,
    /// Number of occupied cells
    stones: usize,
}

impl Board {
    pub fn new(config: BoardConfig) -> Self {
        Self {
            config,
            cells: vec![Cell::Empty; config.total_cells()],
            stones: 0,
        }
    }

    /// Build a board from text rows: `X` for First, `O` for Second, anything else empty.
    ///
    /// Stones are taken as written, gravity is not re-applied.
    pub fn from_rows(config: BoardConfig, rows: &[&str]) -> Result<Self, ProtocolError> {
        config.validate()?;
        if rows.len() != config.rows as usize {
            return Err(ProtocolError::RowCount {
                expected: config.rows as usize,
                actual: rows.len(),
            });
        }
        let mut board = Self::new(config);
        for (r, line) in rows.iter().enumerate() {
            let count = line.chars().count();
            if count != config.cols as usize {
                return Err(ProtocolError::ColumnCount {
                    row: r,
                    expected: config.cols as usize,
                    actual: count,
                });
            }
            for (c, ch) in line.chars().enumerate() {
                let player = match ch {
                    'X' | 'x' => Player::First,
                    'O' | 'o' => Player::Second,
                    _ => continue,
                };
                board.place(Pos::new(r as u8, c as u8), player);
            }
        }
        Ok(board)
    }

    /// Build a board from a grid of optional owners (row-major, top row first).
    pub fn from_grid(
        config: BoardConfig,
        grid: &[Vec<Option<Player>>],
    ) -> Result<Self, ProtocolError> {
        config.validate()?;
        if grid.len() != config.rows as usize {
            return Err(ProtocolError::RowCount {
                expected: config.rows as usize,
                actual: grid.len(),
            });
        }
        let mut board = Self::new(config);
        for (r, row) in grid.iter().enumerate() {
            if row.len() != config.cols as usize {
                return Err(ProtocolError::ColumnCount {
                    row: r,
                    expected: config.cols as usize,
                    actual: row.len(),
                });
            }
            for (c, owner) in row.iter().enumerate() {
                if let Some(player) = owner {
                    board.place(Pos::new(r as u8, c as u8), *player);
                }
            }
        }
        Ok(board)
    }

    /// Grid of optional owners, the inverse of [`Board::from_grid`].
    pub fn to_grid(&self) -> Vec<Vec<Option<Player>>> {
        self.cells
            .chunks(self.config.cols as usize)
            .map(|row| row.iter().map(|cell| cell.player()).collect())
            .collect()
    }

    #[inline]
    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    #[inline]
    pub fn rows(&self) -> u8 {
        self.config.rows
    }

    #[inline]
    pub fn cols(&self) -> u8 {
        self.config.cols
    }

    #[inline]
    pub fn win_length(&self) -> u8 {
        self.config.win_length
    }

    #[inline]
    pub fn placement(&self) -> Placement {
        self.config.placement
    }

    #[inline]
    fn index(&self, pos: Pos) -> usize {
        debug_assert!(pos.row < self.config.rows && pos.col < self.config.cols);
        pos.row as usize * self.config.cols as usize + pos.col as usize
    }

    /// Check signed coordinates against the board bounds
    #[inline]
    pub fn contains(&self, row: i32, col: i32) -> bool {
        row >= 0 && row < i32::from(self.config.rows) && col >= 0 && col < i32::from(self.config.cols)
    }

    /// Get cell at position
    #[inline]
    pub fn get(&self, pos: Pos) -> Cell {
        self.cells[self.index(pos)]
    }

    /// Bounds-checked lookup with signed coordinates
    #[inline]
    pub fn cell_at(&self, row: i32, col: i32) -> Option<Cell> {
        if self.contains(row, col) {
            Some(self.get(Pos::new(row as u8, col as u8)))
        } else {
            None
        }
    }

    #[inline]
    pub fn is_empty(&self, pos: Pos) -> bool {
        self.get(pos).is_empty()
    }

    /// Set a cell in place, without any legality check.
    #[inline]
    pub fn place(&mut self, pos: Pos, player: Player) {
        let idx = self.index(pos);
        if self.cells[idx].is_empty() {
            self.stones += 1;
        }
        self.cells[idx] = Cell::Occupied(player);
    }

    /// Clear a cell in place (search unmake)
    #[inline]
    pub fn remove(&mut self, pos: Pos) {
        let idx = self.index(pos);
        if !self.cells[idx].is_empty() {
            self.stones -= 1;
        }
        self.cells[idx] = Cell::Empty;
    }

    /// Lowest empty row of a column, `None` when the column is full
    pub fn lowest_empty_row(&self, col: u8) -> Option<u8> {
        (0..self.config.rows)
            .rev()
            .find(|&row| self.is_empty(Pos::new(row, col)))
    }

    /// Resolve a move to the cell it would occupy.
    pub fn landing(&self, mv: Move) -> Result<Pos, MoveError> {
        match (self.config.placement, mv) {
            (Placement::FreePlacement, Move::Place { row, col }) => {
                if row >= self.config.rows || col >= self.config.cols {
                    return Err(MoveError::OutOfRange { row, col });
                }
                let pos = Pos::new(row, col);
                if !self.is_empty(pos) {
                    return Err(MoveError::Occupied { row, col });
                }
                Ok(pos)
            }
            (Placement::GravityDrop, Move::Drop { col }) => {
                if col >= self.config.cols {
                    return Err(MoveError::ColumnOutOfRange { col });
                }
                self.lowest_empty_row(col)
                    .map(|row| Pos::new(row, col))
                    .ok_or(MoveError::ColumnFull { col })
            }
            _ => Err(MoveError::PlacementMismatch),
        }
    }

    /// Return a new board with `mv` played by `player`. `self` is left untouched.
    pub fn apply(&self, mv: Move, player: Player) -> Result<Board, MoveError> {
        let pos = self.landing(mv)?;
        let mut next = self.clone();
        next.place(pos, player);
        Ok(next)
    }

    /// Legal moves in enumeration order: row-major empty cells, or open columns left to right.
    pub fn legal_moves(&self) -> LegalMoves<'_> {
        LegalMoves {
            board: self,
            next: 0,
        }
    }

    /// True iff no legal move remains
    #[inline]
    pub fn is_full(&self) -> bool {
        match self.config.placement {
            Placement::FreePlacement => self.stones == self.cells.len(),
            Placement::GravityDrop => {
                (0..self.config.cols).all(|col| self.lowest_empty_row(col).is_none())
            }
        }
    }

    /// Total stones on board
    #[inline]
    pub fn stone_count(&self) -> usize {
        self.stones
    }

    #[inline]
    pub fn is_board_empty(&self) -> bool {
        self.stones == 0
    }

    /// Iterate over occupied cells
    pub fn stones(&self) -> impl Iterator<Item = (Pos, Player)> + '_ {
        let cols = self.config.cols as usize;
        self.cells.iter().enumerate().filter_map(move |(idx, cell)| {
            cell.player()
                .map(|p| (Pos::new((idx / cols) as u8, (idx % cols) as u8), p))
        })
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (r, row) in self.cells.chunks(self.config.cols as usize).enumerate() {
            if r > 0 {
                writeln!(f)?;
            }
            for cell in row {
                let ch = cell.player().map_or('.', Player::symbol);
                write!(f, "{ch}")?;
            }
        }
        Ok(())
    }
}

/// Lazy iterator over the legal moves of a board.
///
/// Calling [`Board::legal_moves`] again restarts the enumeration.
#[derive(Debug, Clone)]
pub struct LegalMoves<'a> {
    board: &'a Board,
    next: usize,
}

impl Iterator for LegalMoves<'_> {
    type Item = Move;

    fn next(&mut self) -> Option<Self::Item> {
        let config = self.board.config;
        match config.placement {
            Placement::FreePlacement => {
                let cols = config.cols as usize;
                while self.next < self.board.cells.len() {
                    let idx = self.next;
                    self.next += 1;
                    if self.board.cells[idx].is_empty() {
                        return Some(Move::Place {
                            row: (idx / cols) as u8,
                            col: (idx % cols) as u8,
                        });
                    }
                }
                None
            }
            Placement::GravityDrop => {
                while self.next < config.cols as usize {
                    let col = self.next as u8;
                    self.next += 1;
                    if self.board.lowest_empty_row(col).is_some() {
                        return Some(Move::Drop { col });
                    }
                }
                None
            }
        }
    }
}
