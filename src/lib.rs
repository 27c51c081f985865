//! K-in-a-row game engine
//!
//! Win detection and adversarial search for two-player line-making games
//! under one configurable rule: `win_length` stones of one colour in a row,
//! horizontally, vertically or diagonally. Two board topologies are covered:
//! - Free placement (Gomoku style): 15x15, five in a row, any empty cell
//! - Gravity drop (Connect Four style): 6x7, four in a row, stones fall
//!
//! # Architecture
//!
//! The engine is organized into several modules:
//! - [`board`]: Board model, moves and legal-move enumeration
//! - [`rules`]: Anchored win detection and terminal status
//! - [`eval`]: Static position evaluation
//! - [`search`]: Move ordering and alpha-beta with iterative deepening
//! - [`engine`]: Main AI engine combining the search stages
//! - [`worker`]: Background search thread and its JSON protocol
//! - [`game`]: Turn state machine owning the canonical game state
//! - [`config`]: TOML application configuration
//! - [`ui`]: Desktop front end
//!
//! # Quick Start
//!
//! ```
//! use kinrow::{AIEngine, Board, BoardConfig, EngineConfig, Player, Pos};
//!
//! let mut board = Board::new(BoardConfig::connect_four());
//! let mut engine = AIEngine::with_config(EngineConfig { time_budget_ms: 200, max_depth: 6 });
//!
//! board.place(Pos::new(5, 3), Player::First);
//!
//! // Engine answers as Second
//! if let Some(mv) = engine.get_move(&board, Player::Second) {
//!     board = board.apply(mv, Player::Second).unwrap();
//!     println!("AI plays column {}", mv.col());
//! }
//! ```
//!
//! # Search Priority
//!
//! The AI engine follows this search priority:
//! 1. Immediate winning move (instant)
//! 2. Block the opponent's immediate win
//! 3. Alpha-Beta search under a wall-clock budget

pub mod board;
pub mod config;
pub mod engine;
pub mod error;
pub mod eval;
pub mod game;
pub mod rules;
pub mod search;
pub mod ui;
pub mod worker;

// Re-export commonly used types for convenience
pub use board::{Board, BoardConfig, Cell, Move, Placement, Player, Pos};
pub use config::AppConfig;
pub use engine::{AIEngine, EngineConfig};
pub use error::{ConfigError, MoveError, ProtocolError, WorkerError};
pub use game::{GameController, GameMode, Phase};
pub use rules::{check_win, GameStatus};
pub use search::{SearchResult, SearchType};
pub use worker::{SearchHandle, SearchRequest, SearchWorker};
