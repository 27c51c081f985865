//! Application configuration loaded from TOML
//!
//! `[game]` picks the board preset (with optional geometry overrides), the
//! mode and the human's side; `[engine]` holds the search limits. Missing
//! sections and fields fall back to their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::board::{BoardConfig, Placement, Player};
use crate::engine::EngineConfig;
use crate::error::ConfigError;
use crate::game::GameMode;

/// Named board geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// 15x15, five in a row, free placement
    #[default]
    Gomoku,
    /// 6x7, four in a row, gravity drop
    ConnectFour,
}

impl Preset {
    pub const fn board_config(self) -> BoardConfig {
        match self {
            Preset::Gomoku => BoardConfig::gomoku(),
            Preset::ConnectFour => BoardConfig::connect_four(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayMode {
    /// Human against the engine
    #[default]
    Pve,
    /// Two humans on one screen
    Pvp,
}

/// `[game]` section: geometry (a preset plus optional overrides) and players.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub preset: Preset,
    pub rows: Option<u8>,
    pub cols: Option<u8>,
    pub win_length: Option<u8>,
    pub placement: Option<Placement>,
    pub mode: PlayMode,
    /// Side the human plays against the engine
    pub human: Player,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            preset: Preset::Gomoku,
            rows: None,
            cols: None,
            win_length: None,
            placement: None,
            mode: PlayMode::Pve,
            human: Player::First,
        }
    }
}

impl GameSettings {
    /// Preset geometry with the explicit overrides applied.
    pub fn board_config(&self) -> Result<BoardConfig, ConfigError> {
        let base = self.preset.board_config();
        BoardConfig::new(
            self.rows.unwrap_or(base.rows),
            self.cols.unwrap_or(base.cols),
            self.win_length.unwrap_or(base.win_length),
            self.placement.unwrap_or(base.placement),
        )
    }

    pub fn game_mode(&self) -> GameMode {
        match self.mode {
            PlayMode::Pve => GameMode::PvE { human: self.human },
            PlayMode::Pvp => GameMode::PvP,
        }
    }
}

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub game: GameSettings,
    pub engine: EngineConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.game.board_config()?;
        if self.engine.time_budget_ms == 0 {
            return Err(ConfigError::Validation(
                "engine.time_budget_ms must be > 0".into(),
            ));
        }
        if self.engine.max_depth == 0 {
            return Err(ConfigError::Validation(
                "engine.max_depth must be > 0".into(),
            ));
        }
        Ok(())
    }
}
