//! Game session: canonical state plus the turn state machine

pub mod controller;
pub mod state;

pub use controller::GameController;
pub use state::{GameMode, GameState, MoveRecord, Phase};
