//! Game rules: K-in-a-row win detection and terminal status
//!
//! Both topologies share one rule set; the only difference between them lives
//! in how a move picks its cell (see [`crate::board::Board::landing`]).

pub mod win;

use crate::board::{Board, Player, Pos};

// Re-exports for convenient access
pub use win::{check_win, winning_line, AXES};

/// Status of a game after a move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    Won(Player),
    Draw,
}

impl GameStatus {
    #[inline]
    pub fn is_over(self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }
}

/// Status after `player` has just played at `pos`.
///
/// A completed line wins even when it also fills the board.
pub fn outcome_after(board: &Board, pos: Pos, player: Player) -> GameStatus {
    if check_win(board, Some(pos), player) {
        GameStatus::Won(player)
    } else if board.is_full() {
        GameStatus::Draw
    } else {
        GameStatus::InProgress
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BoardConfig, Placement};

    #[test]
    fn test_outcome_in_progress() {
        let board = Board::from_rows(BoardConfig::connect_four(), &[
            ".......",
            ".......",
            ".......",
            ".......",
            ".......",
            "...X...",
        ])
        .unwrap();
        assert_eq!(
            outcome_after(&board, Pos::new(5, 3), Player::First),
            GameStatus::InProgress
        );
    }

    #[test]
    fn test_win_on_last_cell_beats_draw() {
        let config = BoardConfig::new(2, 2, 2, Placement::FreePlacement).unwrap();
        let board = Board::from_rows(config, &["XO", "OX"]).unwrap();
        assert_eq!(
            outcome_after(&board, Pos::new(1, 1), Player::First),
            GameStatus::Won(Player::First)
        );
    }

    #[test]
    fn test_full_board_without_line_is_draw() {
        let config = BoardConfig::new(2, 2, 3, Placement::GravityDrop).unwrap();
        let board = Board::from_rows(config, &["XO", "OX"]).unwrap();
        assert_eq!(outcome_after(&board, Pos::new(0, 0), Player::First), GameStatus::Draw);
        assert!(GameStatus::Draw.is_over());
        assert!(!GameStatus::InProgress.is_over());
    }
}
