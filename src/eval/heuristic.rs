//! Heuristic evaluation function for K-in-a-row positions
//!
//! Every in-bounds window of `win_length` cells on each of the four axes is
//! looked at once. A window still open for one side (no enemy stone inside)
//! is worth [`window_weight`] of the stones already in it; the opponent's open
//! windows count against. Stones nearer the centre get a small bonus.

use crate::board::{Board, Cell, Player};
use crate::rules::AXES;

use super::patterns::{window_weight, PatternScore};

/// Per-side totals gathered in one pass over the board
#[derive(Debug, Default)]
struct WindowScan {
    score: [i64; 2],
    completed: [bool; 2],
}

#[inline]
fn side(player: Player) -> usize {
    match player {
        Player::First => 0,
        Player::Second => 1,
    }
}

/// Evaluate the board from the perspective of `player`.
///
/// Returns a score where:
/// - Positive values favour `player`
/// - `PatternScore::WIN` / `-PatternScore::WIN` mean a completed line for one side
/// - Everything else lies within `±PatternScore::MAX_HEURISTIC`
///
/// `evaluate(board, p) == -evaluate(board, p.opponent())` for every board.
#[must_use]
pub fn evaluate(board: &Board, player: Player) -> i32 {
    let scan = scan_windows(board);
    let me = side(player);
    let opp = 1 - me;

    match (scan.completed[me], scan.completed[opp]) {
        (true, false) => return PatternScore::WIN,
        (false, true) => return -PatternScore::WIN,
        // Not reachable in play; keep the score symmetric anyway
        (true, true) => return 0,
        (false, false) => {}
    }

    let raw = scan.score[me] - scan.score[opp] + center_score(board, player);
    let cap = i64::from(PatternScore::MAX_HEURISTIC);
    raw.clamp(-cap, cap) as i32
}

/// Sum window weights for both sides.
fn scan_windows(board: &Board) -> WindowScan {
    let mut scan = WindowScan::default();
    let k = i32::from(board.win_length());
    let rows = i32::from(board.rows());
    let cols = i32::from(board.cols());

    for &(dr, dc) in &AXES {
        for r in 0..rows {
            for c in 0..cols {
                // Window must fit entirely on the board
                if !board.contains(r + dr * (k - 1), c + dc * (k - 1)) {
                    continue;
                }

                let mut counts = [0u32; 2];
                for i in 0..k {
                    if let Some(Cell::Occupied(p)) = board.cell_at(r + dr * i, c + dc * i) {
                        counts[side(p)] += 1;
                    }
                }

                for s in 0..2 {
                    if counts[1 - s] > 0 {
                        continue;
                    }
                    if counts[s] == k as u32 {
                        scan.completed[s] = true;
                    } else {
                        scan.score[s] += window_weight(counts[s], k as u32);
                    }
                }
            }
        }
    }
    scan
}

/// Centre-control bonus, symmetric between the sides.
fn center_score(board: &Board, player: Player) -> i64 {
    // Doubled coordinates keep the centre exact on even-sized boards
    let rows = i64::from(board.rows()) - 1;
    let cols = i64::from(board.cols()) - 1;
    let max_dist = rows + cols;

    board
        .stones()
        .map(|(pos, owner)| {
            let dist = (2 * i64::from(pos.row) - rows).abs() + (2 * i64::from(pos.col) - cols).abs();
            let bonus = (max_dist - dist) * PatternScore::CENTER_WEIGHT;
            if owner == player {
                bonus
            } else {
                -bonus
            }
        })
        .sum()
}
