//! Error types shared across the engine

use std::path::PathBuf;

/// Reasons a move is rejected.
///
/// Board-level variants come from [`crate::Board::apply`]; the turn-level
/// variants are raised by the game controller before the board is touched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("({row}, {col}) is outside the board")]
    OutOfRange { row: u8, col: u8 },

    #[error("({row}, {col}) is already occupied")]
    Occupied { row: u8, col: u8 },

    #[error("column {col} is outside the board")]
    ColumnOutOfRange { col: u8 },

    #[error("column {col} is full")]
    ColumnFull { col: u8 },

    #[error("move does not match the board's placement rule")]
    PlacementMismatch,

    #[error("not your turn")]
    NotYourTurn,

    #[error("game is over")]
    GameOver,

    #[error("AI is thinking")]
    AiThinking,
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

/// Errors surfaced by the search worker and its handles.
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error("failed to spawn search thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("a search request is already in flight")]
    Busy,

    #[error("search was cancelled")]
    Cancelled,

    #[error("search worker disconnected")]
    Disconnected,
}

/// Errors decoding a wire-format search request.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("malformed message: {0}")]
    Json(#[from] serde_json::Error),

    #[error("board has {actual} rows, expected {expected}")]
    RowCount { expected: usize, actual: usize },

    #[error("row {row} has {actual} cells, expected {expected}")]
    ColumnCount {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("invalid board configuration: {0}")]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_error_display() {
        let err = MoveError::Occupied { row: 7, col: 8 };
        assert_eq!(err.to_string(), "(7, 8) is already occupied");
        assert_eq!(MoveError::ColumnFull { col: 3 }.to_string(), "column 3 is full");
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Validation("win_length must be >= 2".to_string());
        assert_eq!(
            err.to_string(),
            "config validation error: win_length must be >= 2"
        );
    }

    #[test]
    fn test_protocol_error_display() {
        let err = ProtocolError::ColumnCount {
            row: 2,
            expected: 7,
            actual: 6,
        };
        assert_eq!(err.to_string(), "row 2 has 6 cells, expected 7");
    }
}
