//! Main AI engine combining the search stages
//!
//! The engine picks a move in priority order:
//!
//! 1. **Immediate win**: a move that completes a line right now
//! 2. **Defense**: the cell where the opponent would complete a line next turn
//! 3. **Alpha-Beta**: iterative deepening under the time budget
//!
//! # Example
//!
//! ```
//! use kinrow::board::{Board, BoardConfig, Player};
//! use kinrow::engine::{AIEngine, EngineConfig};
//!
//! let mut engine = AIEngine::with_config(EngineConfig { time_budget_ms: 200, max_depth: 4 });
//! let board = Board::new(BoardConfig::connect_four());
//!
//! let result = engine.get_move_with_stats(&board, Player::First);
//! println!("Best move: {:?}", result.best_move);
//! println!("Search type: {:?}", result.search_type);
//! ```

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::board::{Board, Move, Player};
use crate::eval::PatternScore;
use crate::search::{
    find_winning_move, ordered_candidates, SearchResult, SearchStats, SearchType, Searcher,
};

/// Search limits handed to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Wall-clock budget per move in milliseconds
    pub time_budget_ms: u64,
    /// Deepest iteration attempted
    pub max_depth: u8,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            time_budget_ms: 2000,
            max_depth: 12,
        }
    }
}

/// AI engine for K-in-a-row games.
pub struct AIEngine {
    searcher: Searcher,
    config: EngineConfig,
}

impl AIEngine {
    /// Engine with the default budget (2 s, depth 12).
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            searcher: Searcher::new(),
            config,
        }
    }

    /// Engine whose search aborts once `stop` is raised.
    #[must_use]
    pub fn with_stop_flag(config: EngineConfig, stop: Arc<AtomicBool>) -> Self {
        Self {
            searcher: Searcher::with_stop_flag(stop),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> EngineConfig {
        self.config
    }

    /// Best move for `player`, or `None` when the board is full.
    #[must_use]
    pub fn get_move(&mut self, board: &Board, player: Player) -> Option<Move> {
        self.get_move_with_stats(board, player).best_move
    }

    /// Best move with the stage that found it and search statistics.
    #[must_use]
    pub fn get_move_with_stats(&mut self, board: &Board, player: Player) -> SearchResult {
        let start = Instant::now();
        let candidates = ordered_candidates(board);
        if candidates.is_empty() {
            debug!("no legal moves");
            return SearchResult::no_moves();
        }

        let mut scratch = board.clone();

        // 1. Win on the spot
        if let Some((mv, _)) = find_winning_move(&mut scratch, player, &candidates) {
            let result = quick_result(mv, PatternScore::WIN - 1, SearchType::ImmediateWin, start);
            info!(?mv, "immediate win");
            return result;
        }

        // 2. Block the opponent's immediate win. Both sides land on the same
        // cell for a given move, so the blocking move is the opponent's one.
        if let Some((mv, _)) = find_winning_move(&mut scratch, player.opponent(), &candidates) {
            let result = quick_result(mv, 0, SearchType::Defense, start);
            info!(?mv, "blocking opponent win");
            return result;
        }

        // 3. Regular alpha-beta search
        let result = self.searcher.search_timed(
            board,
            player,
            self.config.max_depth,
            self.config.time_budget_ms,
        );
        info!(
            best_move = ?result.best_move,
            score = result.score,
            depth = result.depth,
            nodes = result.nodes,
            time_ms = result.time_ms,
            first_move_rate = result.stats.first_move_rate(),
            "alpha-beta search finished"
        );
        result
    }
}

impl Default for AIEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn quick_result(mv: Move, score: i32, search_type: SearchType, start: Instant) -> SearchResult {
    SearchResult {
        best_move: Some(mv),
        score,
        depth: 1,
        nodes: 1,
        time_ms: start.elapsed().as_millis() as u64,
        search_type,
        stats: SearchStats::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BoardConfig, Placement, Pos};

    fn fast() -> EngineConfig {
        EngineConfig {
            time_budget_ms: 500,
            max_depth: 4,
        }
    }

    #[test]
    fn test_engine_creation() {
        let engine = AIEngine::new();
        assert_eq!(engine.config().max_depth, 12);
        assert_eq!(engine.config().time_budget_ms, 2000);
    }

    #[test]
    fn test_engine_finds_immediate_win() {
        let mut board = Board::new(BoardConfig::gomoku());
        for c in 0..4 {
            board.place(Pos::new(9, c), Player::First);
        }
        board.place(Pos::new(3, 3), Player::Second);

        let mut engine = AIEngine::with_config(fast());
        let result = engine.get_move_with_stats(&board, Player::First);

        assert_eq!(result.best_move, Some(Move::place(9, 4)));
        assert_eq!(result.search_type, SearchType::ImmediateWin);
    }

    #[test]
    fn test_engine_prefers_win_over_block() {
        let board = Board::from_rows(BoardConfig::connect_four(), &[
            ".......",
            ".......",
            ".......",
            "O......",
            "O......",
            "OXXX...",
        ])
        .unwrap();
        let mut engine = AIEngine::with_config(fast());
        let result = engine.get_move_with_stats(&board, Player::First);
        assert_eq!(result.best_move, Some(Move::column(4)));
        assert_eq!(result.search_type, SearchType::ImmediateWin);
    }

    #[test]
    fn test_engine_blocks_opponent_win() {
        let mut board = Board::new(BoardConfig::gomoku());
        for c in 0..4 {
            board.place(Pos::new(9, c), Player::Second);
        }
        board.place(Pos::new(10, 5), Player::First);

        let mut engine = AIEngine::with_config(fast());
        let result = engine.get_move_with_stats(&board, Player::First);

        assert_eq!(result.best_move, Some(Move::place(9, 4)));
        assert_eq!(result.search_type, SearchType::Defense);
    }

    #[test]
    fn test_engine_blocks_gravity_column() {
        let board = Board::from_rows(BoardConfig::connect_four(), &[
            ".......",
            ".......",
            ".......",
            "...O...",
            "...O.X.",
            "..XO.X.",
        ])
        .unwrap();
        let mut engine = AIEngine::with_config(fast());
        assert_eq!(engine.get_move(&board, Player::First), Some(Move::column(3)));
    }

    #[test]
    fn test_engine_empty_board() {
        let board = Board::new(BoardConfig::gomoku());
        let mut engine = AIEngine::with_config(fast());
        assert_eq!(engine.get_move(&board, Player::First), Some(Move::place(7, 7)));
    }

    #[test]
    fn test_engine_full_board() {
        let config = BoardConfig::new(2, 2, 3, Placement::FreePlacement).unwrap();
        let board = Board::from_rows(config, &["XO", "OX"]).unwrap();
        let mut engine = AIEngine::with_config(fast());
        let result = engine.get_move_with_stats(&board, Player::First);
        assert!(result.best_move.is_none());
        assert_eq!(result.search_type, SearchType::NoMoves);
    }

    #[test]
    fn test_engine_time_reasonable() {
        let mut board = Board::new(BoardConfig::gomoku());
        board.place(Pos::new(7, 7), Player::First);
        board.place(Pos::new(8, 8), Player::Second);
        board.place(Pos::new(7, 8), Player::First);
        board.place(Pos::new(6, 7), Player::Second);

        let mut engine = AIEngine::with_config(EngineConfig {
            time_budget_ms: 200,
            max_depth: 12,
        });
        let result = engine.get_move_with_stats(&board, Player::First);

        assert!(result.best_move.is_some());
        assert!(
            result.time_ms < 1_000,
            "Search took too long: {}ms",
            result.time_ms
        );
    }
}
