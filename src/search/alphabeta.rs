//! Alpha-Beta search with iterative deepening
//!
//! This module implements the core search algorithm for the AI. It uses
//! negamax with alpha-beta pruning, re-run at increasing depth until the time
//! budget runs out.
//!
//! # Features
//!
//! - Iterative deepening: only fully completed depths are ever reported
//! - Time and cancellation checked at every node visit
//! - Immediate-win shortcut before the first iteration
//! - Move ordering by proximity to existing stones
//! - Depth-discounted terminal scores, so faster wins are preferred
//!
//! # Example
//!
//! ```
//! use kinrow::board::{Board, BoardConfig, Player};
//! use kinrow::search::Searcher;
//!
//! let mut searcher = Searcher::new();
//! let board = Board::new(BoardConfig::connect_four());
//!
//! let result = searcher.search(&board, Player::First, 4);
//! assert!(result.best_move.is_some());
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::board::{Board, Move, Player, Pos};
use crate::eval::{evaluate, PatternScore};
use crate::rules::check_win;

use super::movegen::{enumeration_rank, find_winning_move, ordered_candidates};

/// Infinity score for alpha-beta bounds
const INF: i32 = PatternScore::WIN + 1;

/// Hard cap on search depth
pub const MAX_PLY: u8 = 64;

/// Scores at or beyond this magnitude are proven wins or losses
const PROVEN: i32 = PatternScore::WIN - MAX_PLY as i32;

/// Which stage produced a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchType {
    /// A single move completes a line
    ImmediateWin,
    /// Blocks the opponent's immediate win
    Defense,
    /// Regular alpha-beta search result
    AlphaBeta,
    /// Board is full, nothing to play
    NoMoves,
}

/// Search statistics for diagnostics and tuning.
#[derive(Debug, Clone, Default)]
pub struct SearchStats {
    /// Total beta cutoffs (fail-high)
    pub beta_cutoffs: u64,
    /// Beta cutoffs on the first move tried (measures move ordering quality)
    pub first_move_cutoffs: u64,
}

impl SearchStats {
    /// First-move cutoff rate in percent
    pub fn first_move_rate(&self) -> f64 {
        if self.beta_cutoffs == 0 {
            0.0
        } else {
            self.first_move_cutoffs as f64 / self.beta_cutoffs as f64 * 100.0
        }
    }
}

/// Search result containing the best move found and associated statistics.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Best move found; `None` only when the board has no legal move
    pub best_move: Option<Move>,
    /// Score estimate from the side to move's perspective
    pub score: i32,
    /// Deepest fully completed iteration
    pub depth: u8,
    /// Total nodes searched
    pub nodes: u64,
    /// Wall-clock time spent
    pub time_ms: u64,
    /// Stage that produced the move
    pub search_type: SearchType,
    /// Search diagnostics
    pub stats: SearchStats,
}

impl SearchResult {
    /// Result for a board with no legal move
    pub fn no_moves() -> Self {
        Self {
            best_move: None,
            score: 0,
            depth: 0,
            nodes: 0,
            time_ms: 0,
            search_type: SearchType::NoMoves,
            stats: SearchStats::default(),
        }
    }

    /// True when the score is a proven win for the side to move
    pub fn is_winning(&self) -> bool {
        self.score >= PROVEN
    }

    /// True when the score is a proven loss for the side to move
    pub fn is_losing(&self) -> bool {
        self.score <= -PROVEN
    }
}

/// Negamax alpha-beta searcher.
///
/// The optional stop flag is owned by whoever may cancel the search (the
/// worker); the searcher only reads it. Running out of time never touches it.
pub struct Searcher {
    stop: Arc<AtomicBool>,
    nodes: u64,
    deadline: Option<Instant>,
    aborted: bool,
    stats: SearchStats,
}

impl Searcher {
    #[must_use]
    pub fn new() -> Self {
        Self::with_stop_flag(Arc::new(AtomicBool::new(false)))
    }

    /// Searcher that aborts as soon as `stop` is raised.
    #[must_use]
    pub fn with_stop_flag(stop: Arc<AtomicBool>) -> Self {
        Self {
            stop,
            nodes: 0,
            deadline: None,
            aborted: false,
            stats: SearchStats::default(),
        }
    }

    /// Search to `max_depth` with no time limit (deterministic; used by tests).
    #[must_use]
    pub fn search(&mut self, board: &Board, player: Player, max_depth: u8) -> SearchResult {
        self.iterate(board, player, max_depth, None)
    }

    /// Iterative deepening bounded by a wall-clock budget.
    ///
    /// The budget is a soft deadline checked at every node, so the overrun is
    /// at most one node's work. Whatever happens, the move of the last fully
    /// completed depth is returned.
    #[must_use]
    pub fn search_timed(
        &mut self,
        board: &Board,
        player: Player,
        max_depth: u8,
        time_budget_ms: u64,
    ) -> SearchResult {
        let deadline = Instant::now() + Duration::from_millis(time_budget_ms);
        self.iterate(board, player, max_depth, Some(deadline))
    }

    /// Check if search should stop (time limit or stop signal).
    #[inline]
    fn should_stop(&mut self) -> bool {
        if !self.aborted {
            let timed_out = self.deadline.is_some_and(|d| Instant::now() >= d);
            self.aborted = timed_out || self.stop.load(Ordering::Relaxed);
        }
        self.aborted
    }

    fn iterate(
        &mut self,
        board: &Board,
        player: Player,
        max_depth: u8,
        deadline: Option<Instant>,
    ) -> SearchResult {
        let start = Instant::now();
        self.nodes = 0;
        self.deadline = deadline;
        self.aborted = false;
        self.stats = SearchStats::default();

        let candidates = ordered_candidates(board);
        let Some(&(first_move, _)) = candidates.first() else {
            return SearchResult::no_moves();
        };

        let mut work_board = board.clone();
        let elapsed_ms = |start: Instant| start.elapsed().as_millis() as u64;

        if let Some((mv, _)) = find_winning_move(&mut work_board, player, &candidates) {
            return SearchResult {
                best_move: Some(mv),
                score: PatternScore::WIN - 1,
                depth: 1,
                nodes: candidates.len() as u64,
                time_ms: elapsed_ms(start),
                search_type: SearchType::ImmediateWin,
                stats: SearchStats::default(),
            };
        }

        // Fallback if not even depth 1 completes
        let mut best_result = SearchResult {
            best_move: Some(first_move),
            score: 0,
            depth: 0,
            nodes: 0,
            time_ms: 0,
            search_type: SearchType::AlphaBeta,
            stats: SearchStats::default(),
        };

        let empty_cells = board.config().total_cells() - board.stone_count();
        let depth_cap = max_depth.clamp(1, MAX_PLY).min(empty_cells.min(MAX_PLY as usize) as u8);

        for depth in 1..=depth_cap {
            let Some((mv, score)) = self.search_root(&mut work_board, player, depth, &candidates)
            else {
                debug!(depth, nodes = self.nodes, "iteration aborted");
                break;
            };

            best_result.best_move = Some(mv);
            best_result.score = score;
            best_result.depth = depth;
            debug!(depth, score, nodes = self.nodes, ?mv, "depth completed");

            if score.abs() >= PROVEN {
                break;
            }
        }

        best_result.nodes = self.nodes;
        best_result.time_ms = elapsed_ms(start);
        best_result.stats = self.stats.clone();
        best_result
    }

    /// Root-level search.
    ///
    /// Returns `None` if the iteration was cut short. Among equal scores the
    /// move listed first by [`Board::legal_moves`] wins.
    fn search_root(
        &mut self,
        board: &mut Board,
        player: Player,
        depth: u8,
        candidates: &[(Move, Pos)],
    ) -> Option<(Move, i32)> {
        let mut best: Option<(Move, i32, usize)> = None;

        for &(mv, pos) in candidates {
            // Alpha one below the best keeps equal scores exact
            let alpha = best.map_or(-INF, |(_, s, _)| s - 1);
            board.place(pos, player);
            let score = self.alpha_beta(board, player.opponent(), depth - 1, 1, -INF, -alpha, pos);
            board.remove(pos);
            let score = -score?;

            let rank = enumeration_rank(board, pos);
            if best.map_or(true, |(_, s, r)| score > s || (score == s && rank < r)) {
                best = Some((mv, score, rank));
            }
        }

        best.map(|(mv, score, _)| (mv, score))
    }

    /// Recursive alpha-beta search with negamax formulation.
    ///
    /// `player` is the side to move; `last_move` is the opponent's stone just
    /// placed. Returns `None` once time runs out or the stop flag is raised.
    fn alpha_beta(
        &mut self,
        board: &mut Board,
        player: Player,
        depth: u8,
        ply: u8,
        mut alpha: i32,
        beta: i32,
        last_move: Pos,
    ) -> Option<i32> {
        self.nodes += 1;
        if self.should_stop() {
            return None;
        }

        // Terminal: opponent just completed a line
        if check_win(board, Some(last_move), player.opponent()) {
            return Some(-(PatternScore::WIN - i32::from(ply)));
        }
        if board.is_full() {
            return Some(0);
        }
        if depth == 0 {
            return Some(evaluate(board, player));
        }

        let moves = ordered_candidates(board);
        let mut best_score = -INF;

        for (i, &(_, pos)) in moves.iter().enumerate() {
            board.place(pos, player);
            let score = self.alpha_beta(board, player.opponent(), depth - 1, ply + 1, -beta, -alpha, pos);
            board.remove(pos);
            let score = -score?;

            best_score = best_score.max(score);
            alpha = alpha.max(score);
            if alpha >= beta {
                self.stats.beta_cutoffs += 1;
                if i == 0 {
                    self.stats.first_move_cutoffs += 1;
                }
                break;
            }
        }

        Some(best_score)
    }
}

impl Default for Searcher {
    fn default() -> Self {
        Self::new()
    }
}
