//! Score constants and window weights for position evaluation
//!
//! Any weighting works for the search as long as it stays symmetric and well
//! below the terminal scores; these are tuned for quick tactical play on the
//! two stock boards.

/// Score constants
pub struct PatternScore;

impl PatternScore {
    /// Completed line. Terminal scores in the search are `WIN - ply`.
    pub const WIN: i32 = 1_000_000_000;

    /// Upper bound on any non-terminal evaluation
    pub const MAX_HEURISTIC: i32 = 100_000_000;

    /// Window needing a single stone to complete
    pub const THREAT: i64 = 50_000;

    /// Growth factor between consecutive stone counts in an open window
    pub const GROWTH: i64 = 8;

    /// Centre bonus per stone, scaled by closeness to the middle
    pub const CENTER_WEIGHT: i64 = 2;
}

/// Weight of a window holding `count` stones of one side and none of the other.
///
/// Super-linear in `count`: each extra stone multiplies the value by
/// [`PatternScore::GROWTH`], and a window one stone short of a win is a threat.
/// `count == win_length` is terminal and handled by the caller.
pub fn window_weight(count: u32, win_length: u32) -> i64 {
    if count == 0 {
        return 0;
    }
    if count + 1 >= win_length {
        return PatternScore::THREAT;
    }
    // Capped so long win lengths cannot overflow
    PatternScore::GROWTH
        .saturating_pow(count - 1)
        .min(PatternScore::THREAT / 4)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_grow_super_linearly() {
        let k = 5;
        let w: Vec<i64> = (1..k).map(|n| window_weight(n, k)).collect();
        for pair in w.windows(2) {
            assert!(pair[1] > pair[0] * 2, "weights {w:?}");
        }
        assert_eq!(window_weight(0, k), 0);
    }

    #[test]
    fn test_near_complete_window_is_threat() {
        assert_eq!(window_weight(3, 4), PatternScore::THREAT);
        assert_eq!(window_weight(1, 2), PatternScore::THREAT);
    }

    #[test]
    fn test_long_lines_stay_bounded() {
        for n in 1..40 {
            assert!(window_weight(n, 40) <= PatternScore::THREAT);
        }
    }

    #[test]
    fn test_terminal_dominates_heuristic() {
        let (heuristic, win) = (PatternScore::MAX_HEURISTIC, PatternScore::WIN);
        assert!(heuristic < win / 2);
    }
}
