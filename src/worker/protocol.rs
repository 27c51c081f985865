//! JSON messages for driving a search across a process boundary
//!
//! ```json
//! {"board": [[null, "X"], ["O", null]], "rows": 2, "cols": 2, "winLength": 2,
//!  "player": "X", "timeBudgetMs": 500, "placement": "free"}
//! ```
//!
//! An optional `maxDepth` caps the search; without it the engine settings of
//! the receiving side apply.
//!
//! The reply is `{"move": {"row": r, "col": c}}`, or `{"move": null}` when the
//! board has no legal move. The reply always names the landing cell, also on
//! gravity boards.

use serde::{Deserialize, Serialize};

use crate::board::{Board, BoardConfig, Placement, Player, Pos};
use crate::engine::EngineConfig;
use crate::error::ProtocolError;

use super::SearchRequest;

/// Incoming search request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequestMessage {
    pub board: Vec<Vec<Option<Player>>>,
    pub rows: u8,
    pub cols: u8,
    pub win_length: u8,
    pub player: Player,
    pub time_budget_ms: u64,
    pub placement: Placement,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<u8>,
}

impl SearchRequestMessage {
    pub fn from_json(json: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Message describing `request`.
    pub fn from_request(request: &SearchRequest) -> Self {
        let config = request.board.config();
        Self {
            board: request.board.to_grid(),
            rows: config.rows,
            cols: config.cols,
            win_length: config.win_length,
            player: request.player,
            time_budget_ms: request.time_budget_ms,
            placement: config.placement,
            max_depth: Some(request.max_depth),
        }
    }

    /// Validate the geometry and build the in-process request.
    pub fn into_request(self) -> Result<SearchRequest, ProtocolError> {
        self.into_request_with(EngineConfig::default())
    }

    /// Like [`into_request`](Self::into_request), with `engine` supplying the
    /// depth cap when the message has none.
    pub fn into_request_with(self, engine: EngineConfig) -> Result<SearchRequest, ProtocolError> {
        let config = BoardConfig::new(self.rows, self.cols, self.win_length, self.placement)?;
        let board = Board::from_grid(config, &self.board)?;
        Ok(SearchRequest {
            board,
            player: self.player,
            time_budget_ms: self.time_budget_ms,
            max_depth: self.max_depth.unwrap_or(engine.max_depth),
        })
    }
}

/// Outgoing search reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponseMessage {
    #[serde(rename = "move")]
    pub best_move: Option<Pos>,
}

impl SearchResponseMessage {
    pub fn from_json(json: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }
}
