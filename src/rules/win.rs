//! Win condition checking anchored on the last move
//!
//! Only the cells within `win_length - 1` of the last move can take part in a
//! line through it, so each axis is a fixed window of `2 * win_length - 1`
//! cells clipped to the board. Cost is O(win_length) per axis regardless of
//! board size, which matters because the search calls this at every node.

use crate::board::{Board, Cell, Player, Pos};

/// Direction vectors for line checking (4 axes)
pub const AXES: [(i32, i32); 4] = [
    (0, 1),  // Horizontal
    (1, 0),  // Vertical
    (1, 1),  // Main diagonal
    (1, -1), // Anti-diagonal
];

/// Check whether `player`'s stone at `last_move` completes `win_length` in a row.
///
/// Returns false for `None` (nothing played yet). Windows are clipped at the
/// board edges, never wrapped.
#[inline]
pub fn check_win(board: &Board, last_move: Option<Pos>, player: Player) -> bool {
    let Some(pos) = last_move else {
        return false;
    };
    AXES.iter()
        .any(|&(dr, dc)| axis_has_run(board, pos, dr, dc, player))
}

/// Scan the anchored window on one axis for a full-length run.
///
/// Every length-k sub-window of the 2k-1 window contains the centre, so any run
/// found here passes through `pos`.
#[inline]
fn axis_has_run(board: &Board, pos: Pos, dr: i32, dc: i32, player: Player) -> bool {
    let k = i32::from(board.win_length());
    let target = Cell::Occupied(player);
    let mut run = 0;
    for step in -(k - 1)..=(k - 1) {
        let r = i32::from(pos.row) + dr * step;
        let c = i32::from(pos.col) + dc * step;
        if board.cell_at(r, c) == Some(target) {
            run += 1;
            if run >= k {
                return true;
            }
        } else {
            run = 0;
        }
    }
    false
}

/// Find the full run of `player` stones through `pos` if it wins.
///
/// Used to highlight the line once a game is over; returns the maximal run
/// (overlines included), ordered along the axis.
pub fn winning_line(board: &Board, pos: Pos, player: Player) -> Option<Vec<Pos>> {
    let target = Some(Cell::Occupied(player));
    if board.cell_at(i32::from(pos.row), i32::from(pos.col)) != target {
        return None;
    }

    for &(dr, dc) in &AXES {
        let mut line = vec![pos];

        // Extend in negative direction first
        let mut r = i32::from(pos.row) - dr;
        let mut c = i32::from(pos.col) - dc;
        while board.cell_at(r, c) == target {
            line.insert(0, Pos::new(r as u8, c as u8));
            r -= dr;
            c -= dc;
        }

        // Extend in positive direction
        r = i32::from(pos.row) + dr;
        c = i32::from(pos.col) + dc;
        while board.cell_at(r, c) == target {
            line.push(Pos::new(r as u8, c as u8));
            r += dr;
            c += dc;
        }

        if line.len() >= board.win_length() as usize {
            return Some(line);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::board::{BoardConfig, Placement};

    fn gomoku_with(stones: &[(u8, u8)], player: Player) -> Board {
        let mut board = Board::new(BoardConfig::gomoku());
        for &(r, c) in stones {
            board.place(Pos::new(r, c), player);
        }
        board
    }

    /// Unbounded walk along each axis; independent of the windowed scan.
    fn oracle(board: &Board, pos: Pos, player: Player) -> bool {
        let target = Some(Cell::Occupied(player));
        if board.cell_at(i32::from(pos.row), i32::from(pos.col)) != target {
            return false;
        }
        AXES.iter().any(|&(dr, dc)| {
            let mut count = 1;
            for sign in [-1, 1] {
                let mut r = i32::from(pos.row) + dr * sign;
                let mut c = i32::from(pos.col) + dc * sign;
                while board.cell_at(r, c) == target {
                    count += 1;
                    r += dr * sign;
                    c += dc * sign;
                }
            }
            count >= i32::from(board.win_length())
        })
    }

    #[test]
    fn test_horizontal_five() {
        let board = gomoku_with(&[(7, 7), (7, 8), (7, 9), (7, 10), (7, 11)], Player::First);
        assert!(check_win(&board, Some(Pos::new(7, 11)), Player::First));
        assert!(check_win(&board, Some(Pos::new(7, 9)), Player::First));
        assert!(!check_win(&board, Some(Pos::new(7, 11)), Player::Second));
    }

    #[test]
    fn test_four_is_not_enough() {
        let board = gomoku_with(&[(7, 7), (7, 8), (7, 9), (7, 10)], Player::First);
        assert!(!check_win(&board, Some(Pos::new(7, 10)), Player::First));
    }

    #[test]
    fn test_vertical_and_diagonals() {
        let vertical = gomoku_with(&[(0, 3), (1, 3), (2, 3), (3, 3), (4, 3)], Player::Second);
        assert!(check_win(&vertical, Some(Pos::new(0, 3)), Player::Second));

        let main = gomoku_with(&[(10, 10), (11, 11), (12, 12), (13, 13), (14, 14)], Player::First);
        assert!(check_win(&main, Some(Pos::new(14, 14)), Player::First));

        let anti = gomoku_with(&[(4, 8), (5, 7), (6, 6), (7, 5), (8, 4)], Player::First);
        assert!(check_win(&anti, Some(Pos::new(6, 6)), Player::First));
    }

    #[test]
    fn test_gap_breaks_line() {
        let board = gomoku_with(&[(7, 7), (7, 8), (7, 10), (7, 11), (7, 12)], Player::First);
        assert!(!check_win(&board, Some(Pos::new(7, 10)), Player::First));
    }

    #[test]
    fn test_opponent_stone_breaks_line() {
        let mut board = gomoku_with(&[(7, 7), (7, 8), (7, 10), (7, 11), (7, 12)], Player::First);
        board.place(Pos::new(7, 9), Player::Second);
        assert!(!check_win(&board, Some(Pos::new(7, 12)), Player::First));
        assert!(!check_win(&board, Some(Pos::new(7, 9)), Player::Second));
    }

    #[test]
    fn test_edges_clip() {
        let board = gomoku_with(&[(14, 0), (14, 1), (14, 2), (14, 3), (14, 4)], Player::First);
        assert!(check_win(&board, Some(Pos::new(14, 0)), Player::First));

        // Lines never wrap from the last column to the next row
        let wrap = gomoku_with(&[(3, 12), (3, 13), (3, 14), (4, 0), (4, 1)], Player::First);
        assert!(!check_win(&wrap, Some(Pos::new(3, 14)), Player::First));
        assert!(!check_win(&wrap, Some(Pos::new(4, 0)), Player::First));
    }

    #[test]
    fn test_no_last_move() {
        let board = Board::new(BoardConfig::gomoku());
        assert!(!check_win(&board, None, Player::First));
        assert!(!check_win(&board, Some(Pos::new(7, 7)), Player::First));
    }

    #[test]
    fn test_unreachable_win_length() {
        let config = BoardConfig::new(3, 3, 4, Placement::FreePlacement).unwrap();
        let board = Board::from_rows(config, &["XXX", "XXX", "XXX"]).unwrap();
        for r in 0..3 {
            for c in 0..3 {
                assert!(!check_win(&board, Some(Pos::new(r, c)), Player::First));
            }
        }
    }

    #[test]
    fn test_overline_counts() {
        let board = gomoku_with(&[(2, 2), (2, 3), (2, 4), (2, 5), (2, 6), (2, 7)], Player::First);
        assert!(check_win(&board, Some(Pos::new(2, 4)), Player::First));
        assert_eq!(winning_line(&board, Pos::new(2, 4), Player::First).map(|l| l.len()), Some(6));
    }

    #[test]
    fn test_winning_line_positions() {
        let board = gomoku_with(&[(4, 8), (5, 7), (6, 6), (7, 5), (8, 4)], Player::Second);
        let line = winning_line(&board, Pos::new(6, 6), Player::Second).unwrap();
        assert_eq!(line.first(), Some(&Pos::new(4, 8)));
        assert_eq!(line.last(), Some(&Pos::new(8, 4)));
        assert!(winning_line(&board, Pos::new(6, 6), Player::First).is_none());
    }

    #[test]
    fn test_gravity_vertical_four() {
        let board = Board::from_rows(BoardConfig::connect_four(), &[
            ".......",
            ".......",
            "...X...",
            "...X...",
            "...X...",
            "...X...",
        ])
        .unwrap();
        assert!(check_win(&board, Some(Pos::new(2, 3)), Player::First));
    }

    #[test]
    fn test_matches_oracle_on_random_boards() {
        let mut rng = StdRng::seed_from_u64(42);
        let configs = [
            BoardConfig::gomoku(),
            BoardConfig::connect_four(),
            BoardConfig::new(8, 5, 3, Placement::FreePlacement).unwrap(),
        ];
        for config in configs {
            for _ in 0..300 {
                let mut board = Board::new(config);
                let k = config.win_length as i32;

                // Random noise
                for _ in 0..rng.random_range(0..config.total_cells()) {
                    let pos = Pos::new(
                        rng.random_range(0..config.rows),
                        rng.random_range(0..config.cols),
                    );
                    let player = if rng.random_bool(0.5) { Player::First } else { Player::Second };
                    board.place(pos, player);
                }

                // Half the boards get an injected line for First
                if rng.random_bool(0.5) {
                    let (dr, dc) = AXES[rng.random_range(0..AXES.len())];
                    let r0 = rng.random_range(0..config.rows) as i32;
                    let c0 = rng.random_range(0..config.cols) as i32;
                    let end_r = r0 + dr * (k - 1);
                    let end_c = c0 + dc * (k - 1);
                    if board.contains(end_r, end_c) {
                        for i in 0..k {
                            board.place(
                                Pos::new((r0 + dr * i) as u8, (c0 + dc * i) as u8),
                                Player::First,
                            );
                        }
                    }
                }

                for r in 0..config.rows {
                    for c in 0..config.cols {
                        let pos = Pos::new(r, c);
                        for player in [Player::First, Player::Second] {
                            assert_eq!(
                                check_win(&board, Some(pos), player),
                                oracle(&board, pos, player),
                                "mismatch at {pos:?} for {player:?}\n{board}"
                            );
                        }
                    }
                }
            }
        }
    }
}
