//! Search module for the AI
//!
//! Contains:
//! - Candidate generation and move ordering
//! - Alpha-Beta search with iterative deepening

pub mod alphabeta;
pub mod movegen;

pub use alphabeta::{SearchResult, SearchStats, SearchType, Searcher, MAX_PLY};
pub use movegen::{find_winning_move, ordered_candidates};
