//! K-in-a-row desktop game and search CLI
//!
//! ## Usage
//!
//! - `kinrow` - Open the desktop UI
//! - `kinrow --game connect-four --human o` - Play Connect Four as the second player
//! - `kinrow analyze < request.json` - Search one position given as a JSON request
//!
//! `analyze` searches for the request's `timeBudgetMs` unless `--budget-ms` is
//! given. A request without `maxDepth` uses the configured `max_depth`.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use kinrow::config::{AppConfig, PlayMode, Preset};
use kinrow::ui::KinrowApp;
use kinrow::worker::{SearchRequestMessage, SearchResponseMessage, SearchWorker};
use kinrow::{GameController, Player};

/// K-in-a-row: Gomoku and Connect Four against an alpha-beta engine
#[derive(Parser)]
#[command(name = "kinrow")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(long, default_value = "kinrow.toml")]
    config: PathBuf,

    /// Board preset, overriding the configuration file
    #[arg(long, value_enum)]
    game: Option<Preset>,

    /// Side the human plays against the engine
    #[arg(long, value_enum)]
    human: Option<Side>,

    /// Engine time budget per move in milliseconds
    #[arg(long)]
    budget_ms: Option<u64>,

    /// Two humans on one screen, no engine opponent
    #[arg(long)]
    pvp: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Read a JSON search request on stdin and print the reply
    Analyze,
    /// Open the desktop UI (the default)
    Play,
}

#[derive(Clone, Copy, ValueEnum)]
enum Side {
    X,
    O,
}

impl From<Side> for Player {
    fn from(side: Side) -> Self {
        match side {
            Side::X => Player::First,
            Side::O => Player::Second,
        }
    }
}

impl Cli {
    /// Configuration file with command-line overrides applied.
    fn app_config(&self) -> Result<AppConfig> {
        let mut config = AppConfig::load_or_default(&self.config)
            .with_context(|| format!("loading {}", self.config.display()))?;

        if let Some(preset) = self.game {
            config.game.preset = preset;
            config.game.rows = None;
            config.game.cols = None;
            config.game.win_length = None;
            config.game.placement = None;
        }
        if let Some(side) = self.human {
            config.game.human = side.into();
        }
        if let Some(budget) = self.budget_ms {
            config.engine.time_budget_ms = budget;
        }
        if self.pvp {
            config.game.mode = PlayMode::Pvp;
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.app_config()?;

    match cli.command {
        Some(Commands::Analyze) => analyze(&cli, &config),
        Some(Commands::Play) | None => run_gui(config),
    }
}

fn analyze(cli: &Cli, config: &AppConfig) -> Result<()> {
    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("reading request from stdin")?;

    let mut request = SearchRequestMessage::from_json(&input)?.into_request_with(config.engine)?;
    if cli.budget_ms.is_some() {
        request.time_budget_ms = config.engine.time_budget_ms;
    }
    let board = request.board.clone();

    let mut worker = SearchWorker::spawn()?;
    let result = worker.submit(request)?.wait()?;
    info!(
        search_type = ?result.search_type,
        depth = result.depth,
        nodes = result.nodes,
        time_ms = result.time_ms,
        "analysis finished"
    );

    let best_move = result.best_move.map(|mv| board.landing(mv)).transpose()?;
    println!("{}", SearchResponseMessage { best_move }.to_json()?);
    Ok(())
}

fn run_gui(config: AppConfig) -> Result<()> {
    let board = config.game.board_config()?;
    let game = GameController::new(board, config.game.game_mode(), config.engine)?;
    info!(rows = board.rows, cols = board.cols, win_length = board.win_length, "starting UI");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 750.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("K-in-a-row"),
        ..Default::default()
    };

    eframe::run_native(
        "kinrow",
        options,
        Box::new(move |cc| Ok(Box::new(KinrowApp::new(cc, game)))),
    )
    .map_err(|e| anyhow!("UI error: {e}"))
}
