//! Canonical game state and the types describing a session
//!
//! There is no separate phase for a reply that is due but not yet submitted:
//! the controller submits the search in the same step that leaves
//! `EvaluatingMove`, so the game goes straight to `AiSearching`.

use serde::{Deserialize, Serialize};

use crate::board::{Board, BoardConfig, Move, Player, Pos};
use crate::error::MoveError;
use crate::rules::{outcome_after, GameStatus};

/// Who sits on each side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    /// Human against the engine
    PvE { human: Player },
    /// Two humans taking turns on one screen
    PvP,
}

impl Default for GameMode {
    fn default() -> Self {
        GameMode::PvE {
            human: Player::First,
        }
    }
}

impl GameMode {
    pub fn is_human(self, player: Player) -> bool {
        match self {
            GameMode::PvE { human } => human == player,
            GameMode::PvP => true,
        }
    }
}

/// Controller phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Fresh game, nothing played yet
    Idle,
    /// Waiting for a human move
    PlayerTurn,
    /// A move is being applied and checked
    EvaluatingMove,
    /// The engine is choosing a reply on the worker
    AiSearching,
    /// Won or drawn; only a reset leaves this phase
    GameOver,
}

/// One applied move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRecord {
    pub mv: Move,
    /// Cell the stone landed on
    pub pos: Pos,
    pub player: Player,
}

/// Board, side to move, and result so far.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub board: Board,
    pub turn: Player,
    pub status: GameStatus,
}

impl GameState {
    pub fn new(config: BoardConfig) -> Self {
        Self {
            board: Board::new(config),
            turn: Player::First,
            status: GameStatus::InProgress,
        }
    }

    /// Apply `mv` for the side to move and update status and turn.
    ///
    /// On error nothing changes.
    pub fn play(&mut self, mv: Move) -> Result<MoveRecord, MoveError> {
        if self.status.is_over() {
            return Err(MoveError::GameOver);
        }
        let player = self.turn;
        let pos = self.board.landing(mv)?;
        self.board.place(pos, player);

        self.status = outcome_after(&self.board, pos, player);
        if !self.status.is_over() {
            self.turn = player.opponent();
        }
        Ok(MoveRecord { mv, pos, player })
    }

    /// Take back `record`, which must be the last move played.
    pub fn unplay(&mut self, record: &MoveRecord) {
        self.board.remove(record.pos);
        self.turn = record.player;
        self.status = GameStatus::InProgress;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let state = GameState::new(BoardConfig::connect_four());
        assert_eq!(state.turn, Player::First);
        assert_eq!(state.status, GameStatus::InProgress);
        assert!(state.board.is_board_empty());
    }

    #[test]
    fn test_play_switches_turn() {
        let mut state = GameState::new(BoardConfig::connect_four());
        let record = state.play(Move::column(3)).unwrap();
        assert_eq!(record.pos, Pos::new(5, 3));
        assert_eq!(record.player, Player::First);
        assert_eq!(state.turn, Player::Second);
    }

    #[test]
    fn test_rejected_move_changes_nothing() {
        let mut state = GameState::new(BoardConfig::gomoku());
        state.play(Move::place(7, 7)).unwrap();
        let before = state.clone();

        assert_eq!(
            state.play(Move::place(7, 7)),
            Err(MoveError::Occupied { row: 7, col: 7 })
        );
        assert_eq!(state.play(Move::column(3)), Err(MoveError::PlacementMismatch));
        assert_eq!(state, before);
    }

    #[test]
    fn test_win_keeps_turn_and_blocks_further_moves() {
        let mut state = GameState::new(BoardConfig::connect_four());
        for col in [0, 1, 0, 1, 0, 1, 0] {
            state.play(Move::column(col)).unwrap();
        }
        assert_eq!(state.status, GameStatus::Won(Player::First));
        assert_eq!(state.turn, Player::First);
        assert_eq!(state.play(Move::column(2)), Err(MoveError::GameOver));
    }

    #[test]
    fn test_unplay_restores_position() {
        let mut state = GameState::new(BoardConfig::connect_four());
        state.play(Move::column(3)).unwrap();
        let before = state.clone();
        let record = state.play(Move::column(3)).unwrap();
        state.unplay(&record);
        assert_eq!(state, before);
    }

    #[test]
    fn test_mode_sides() {
        let pve = GameMode::PvE {
            human: Player::Second,
        };
        assert!(pve.is_human(Player::Second));
        assert!(!pve.is_human(Player::First));
        assert!(GameMode::PvP.is_human(Player::First));
    }
}
