//! Evaluation module for K-in-a-row positions
//!
//! This module provides static scoring for the search leaves. The evaluation
//! considers:
//! - Open windows of `win_length` cells for each side
//! - Completed lines (terminal scores)
//! - Positional bonuses (center control)

pub mod heuristic;
pub mod patterns;

pub use heuristic::evaluate;
pub use patterns::{window_weight, PatternScore};
