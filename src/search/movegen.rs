//! Candidate generation and move ordering for the search
//!
//! Alpha-beta prunes best when strong moves come first. Both topologies rank
//! candidates by how many stones sit within [`CANDIDATE_RADIUS`] of the
//! landing cell; gravity boards also favour central columns. Every legal move
//! stays in the list, and cells far from all stones simply come last.

use crate::board::{Board, Move, Placement, Player, Pos};
use crate::rules::check_win;

/// Chebyshev radius within which neighbouring stones raise a move's rank
pub const CANDIDATE_RADIUS: i32 = 2;

/// Closeness score: nearer stones weigh more (3 for adjacent, 1 at distance 2).
fn proximity(board: &Board, pos: Pos) -> i32 {
    let mut score = 0;
    for dr in -CANDIDATE_RADIUS..=CANDIDATE_RADIUS {
        for dc in -CANDIDATE_RADIUS..=CANDIDATE_RADIUS {
            if dr == 0 && dc == 0 {
                continue;
            }
            let r = i32::from(pos.row) + dr;
            let c = i32::from(pos.col) + dc;
            if board.cell_at(r, c).is_some_and(|cell| !cell.is_empty()) {
                score += CANDIDATE_RADIUS + 1 - dr.abs().max(dc.abs());
            }
        }
    }
    score
}

/// Legal moves in search order, each paired with the cell it lands on.
///
/// Ordering is a stable sort on the legal-move enumeration, so equal scores
/// keep enumeration order and the search stays deterministic.
pub fn ordered_candidates(board: &Board) -> Vec<(Move, Pos)> {
    let mut scored: Vec<(Move, Pos, i32)> = Vec::with_capacity(board.config().total_cells());

    match board.placement() {
        Placement::FreePlacement => {
            if board.is_board_empty() {
                let center = Pos::new(board.rows() / 2, board.cols() / 2);
                return vec![(Move::from(center), center)];
            }
            for mv in board.legal_moves() {
                let Move::Place { row, col } = mv else {
                    continue;
                };
                let pos = Pos::new(row, col);
                scored.push((mv, pos, proximity(board, pos)));
            }
        }
        Placement::GravityDrop => {
            let center = i32::from(board.cols()) - 1;
            for mv in board.legal_moves() {
                let Ok(pos) = board.landing(mv) else {
                    continue;
                };
                // Doubled distance keeps even widths symmetric
                let centrality = center - (2 * i32::from(pos.col) - center).abs();
                scored.push((mv, pos, proximity(board, pos) + 2 * centrality));
            }
        }
    }

    scored.sort_by(|a, b| b.2.cmp(&a.2));
    scored.into_iter().map(|(mv, pos, _)| (mv, pos)).collect()
}

/// Position of the move landing on `pos` in [`Board::legal_moves`] order.
pub fn enumeration_rank(board: &Board, pos: Pos) -> usize {
    match board.placement() {
        Placement::FreePlacement => {
            usize::from(pos.row) * usize::from(board.cols()) + usize::from(pos.col)
        }
        Placement::GravityDrop => usize::from(pos.col),
    }
}

/// First candidate that completes a line for `player` right away.
pub fn find_winning_move(
    board: &mut Board,
    player: Player,
    candidates: &[(Move, Pos)],
) -> Option<(Move, Pos)> {
    candidates.iter().copied().find(|&(_, pos)| {
        board.place(pos, player);
        let wins = check_win(board, Some(pos), player);
        board.remove(pos);
        wins
    })
}
