//! Turn state machine driving one game session
//!
//! The controller owns the canonical [`GameState`] and the session's
//! [`SearchWorker`]. Human moves are validated and applied synchronously; the
//! engine's reply is searched on the worker and picked up by [`poll`], which
//! the UI calls once per frame. While a search is in flight the board is never
//! touched.
//!
//! [`poll`]: GameController::poll

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::board::{Board, BoardConfig, Move, Player, Pos};
use crate::engine::EngineConfig;
use crate::error::{MoveError, WorkerError};
use crate::rules::{winning_line, GameStatus};
use crate::search::SearchResult;
use crate::worker::{SearchHandle, SearchRequest, SearchWorker};

use super::state::{GameMode, GameState, MoveRecord, Phase};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Purpose {
    /// Engine's own move in a game against the human
    Reply,
    /// Suggestion for the side to move in hot-seat play
    Hint,
}

struct PendingSearch {
    handle: SearchHandle,
    purpose: Purpose,
    started: Instant,
}

pub struct GameController {
    state: GameState,
    mode: GameMode,
    engine: EngineConfig,
    phase: Phase,
    worker: SearchWorker,
    pending: Option<PendingSearch>,
    history: Vec<MoveRecord>,
    winning_line: Option<Vec<Pos>>,
    last_ai_result: Option<SearchResult>,
    last_ai_time: Option<Duration>,
    hint: Option<Move>,
    last_error: Option<WorkerError>,
}

impl GameController {
    /// New session with its own search thread.
    pub fn new(
        config: BoardConfig,
        mode: GameMode,
        engine: EngineConfig,
    ) -> Result<Self, WorkerError> {
        Ok(Self {
            state: GameState::new(config),
            mode,
            engine,
            phase: Phase::Idle,
            worker: SearchWorker::spawn()?,
            pending: None,
            history: Vec::new(),
            winning_line: None,
            last_ai_result: None,
            last_ai_time: None,
            hint: None,
            last_error: None,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn board(&self) -> &Board {
        &self.state.board
    }

    pub fn turn(&self) -> Player {
        self.state.turn
    }

    pub fn status(&self) -> GameStatus {
        self.state.status
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn engine_config(&self) -> EngineConfig {
        self.engine
    }

    /// Takes effect from the next search.
    pub fn set_engine_config(&mut self, engine: EngineConfig) {
        self.engine = engine;
    }

    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    pub fn last_move(&self) -> Option<Pos> {
        self.history.last().map(|record| record.pos)
    }

    /// Cells of the completed line once the game is won
    pub fn winning_line(&self) -> Option<&[Pos]> {
        self.winning_line.as_deref()
    }

    pub fn last_ai_result(&self) -> Option<&SearchResult> {
        self.last_ai_result.as_ref()
    }

    /// Wall-clock time of the last completed engine move
    pub fn last_ai_time(&self) -> Option<Duration> {
        self.last_ai_time
    }

    /// Suggested move for the side to move, if a hint was requested
    pub fn hint(&self) -> Option<Move> {
        self.hint
    }

    /// Worker failure that stopped the engine from replying.
    ///
    /// No search is retried until [`reset`](Self::reset) or a new game.
    pub fn last_error(&self) -> Option<&WorkerError> {
        self.last_error.as_ref()
    }

    pub fn is_ai_thinking(&self) -> bool {
        self.phase == Phase::AiSearching
    }

    pub fn is_hint_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|pending| pending.purpose == Purpose::Hint)
    }

    pub fn is_human_turn(&self) -> bool {
        !self.state.status.is_over() && self.mode.is_human(self.state.turn)
    }

    pub fn is_ai_turn(&self) -> bool {
        !self.state.status.is_over() && !self.mode.is_human(self.state.turn)
    }

    /// Time the current search has been running
    pub fn ai_thinking_elapsed(&self) -> Option<Duration> {
        self.pending.as_ref().map(|pending| pending.started.elapsed())
    }

    /// Play a human move.
    ///
    /// On error the state is unchanged. In a game against the engine a legal
    /// move that does not end the game starts the reply search.
    pub fn play(&mut self, mv: Move) -> Result<(), MoveError> {
        match self.phase {
            Phase::GameOver => return Err(MoveError::GameOver),
            Phase::AiSearching => return Err(MoveError::AiThinking),
            _ => {}
        }
        if !self.is_human_turn() {
            return Err(MoveError::NotYourTurn);
        }
        // Validate before touching anything, a pending hint included
        self.state.board.landing(mv)?;

        self.cancel_pending();
        self.hint = None;
        self.phase = Phase::EvaluatingMove;
        let record = self.state.play(mv)?;
        debug!(?record, "human move");
        self.after_move(record);
        Ok(())
    }

    /// Advance the session without blocking.
    ///
    /// Starts the engine's search when it is its turn and picks up finished
    /// results. Returns true when anything visible changed.
    pub fn poll(&mut self) -> bool {
        if let Some(pending) = &self.pending {
            let outcome = pending.handle.try_result();
            return self.handle_outcome(outcome);
        }
        if self.phase != Phase::GameOver && self.is_ai_turn() && self.last_error.is_none() {
            return self.start_search(Purpose::Reply);
        }
        false
    }

    /// Block for at most `timeout` on the outstanding search.
    ///
    /// Starts the engine's search first when it is its turn. Returns true when
    /// a result was applied.
    pub fn wait_for_ai(&mut self, timeout: Duration) -> bool {
        if self.pending.is_none() {
            self.poll();
        }
        let outcome = match &self.pending {
            Some(pending) => pending.handle.wait_timeout(timeout),
            None => return false,
        };
        self.handle_outcome(outcome)
    }

    /// Abandon the game in progress and start over with an empty board.
    pub fn reset(&mut self) {
        self.cancel_pending();
        self.state = GameState::new(*self.state.board.config());
        self.phase = Phase::Idle;
        self.history.clear();
        self.winning_line = None;
        self.last_ai_result = None;
        self.last_ai_time = None;
        self.hint = None;
        if let Some(error) = self.last_error.take() {
            self.restart_worker(error);
        }
        info!(mode = ?self.mode, "new game");
    }

    /// Start over with a different board or mode.
    pub fn new_game(&mut self, config: BoardConfig, mode: GameMode) {
        self.cancel_pending();
        self.state = GameState::new(config);
        self.mode = mode;
        self.reset();
    }

    /// Take back moves up to the previous human turn.
    ///
    /// Against the engine this removes the engine's reply together with the
    /// human move before it. Refused while the engine is searching.
    pub fn undo(&mut self) -> Result<(), MoveError> {
        if self.phase == Phase::AiSearching {
            return Err(MoveError::AiThinking);
        }
        if self.history.is_empty() {
            return Ok(());
        }
        self.cancel_pending();
        self.hint = None;
        self.winning_line = None;

        while let Some(record) = self.history.pop() {
            self.state.unplay(&record);
            if self.mode.is_human(record.player) {
                break;
            }
        }
        self.phase = if self.history.is_empty() {
            Phase::Idle
        } else {
            Phase::PlayerTurn
        };
        debug!(moves = self.history.len(), "undo");
        Ok(())
    }

    /// Ask the engine for a suggestion in hot-seat play.
    ///
    /// The search runs on the worker; the next move cancels it.
    pub fn request_hint(&mut self) -> Result<(), WorkerError> {
        if self.mode != GameMode::PvP || self.state.status.is_over() || self.pending.is_some() {
            return Ok(());
        }
        self.hint = None;
        self.submit(Purpose::Hint)
    }

    fn after_move(&mut self, record: MoveRecord) {
        self.history.push(record);
        match self.state.status {
            GameStatus::InProgress => {
                self.phase = Phase::PlayerTurn;
                if self.is_ai_turn() {
                    self.start_search(Purpose::Reply);
                }
            }
            GameStatus::Won(player) => {
                self.winning_line = winning_line(&self.state.board, record.pos, player);
                self.phase = Phase::GameOver;
                info!(?player, moves = self.history.len(), "game won");
            }
            GameStatus::Draw => {
                self.phase = Phase::GameOver;
                info!(moves = self.history.len(), "game drawn");
            }
        }
    }

    fn start_search(&mut self, purpose: Purpose) -> bool {
        match self.submit(purpose) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "could not start search");
                self.last_error = Some(e);
                true
            }
        }
    }

    /// Replace a dead search thread after a worker failure.
    fn restart_worker(&mut self, error: WorkerError) {
        if !matches!(error, WorkerError::Disconnected) {
            return;
        }
        match SearchWorker::spawn() {
            Ok(worker) => {
                info!("search worker restarted");
                self.worker = worker;
            }
            Err(e) => {
                warn!(error = %e, "could not restart search worker");
                self.last_error = Some(e);
            }
        }
    }

    fn submit(&mut self, purpose: Purpose) -> Result<(), WorkerError> {
        let request = SearchRequest::new(self.state.board.clone(), self.state.turn, self.engine);
        let handle = self.worker.submit(request)?;
        debug!(job = handle.id(), ?purpose, "search started");
        self.pending = Some(PendingSearch {
            handle,
            purpose,
            started: Instant::now(),
        });
        if purpose == Purpose::Reply {
            self.phase = Phase::AiSearching;
        }
        Ok(())
    }

    fn cancel_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.handle.cancel();
        }
    }

    fn handle_outcome(&mut self, outcome: Result<Option<SearchResult>, WorkerError>) -> bool {
        match outcome {
            Ok(None) => false,
            Ok(Some(result)) => {
                let Some(pending) = self.pending.take() else {
                    return false;
                };
                let elapsed = pending.started.elapsed();
                match pending.purpose {
                    Purpose::Reply => self.apply_reply(result, elapsed),
                    Purpose::Hint => {
                        self.hint = result.best_move;
                        self.last_ai_result = Some(result);
                    }
                }
                true
            }
            Err(e) => {
                if let Some(pending) = self.pending.take() {
                    if pending.purpose == Purpose::Reply {
                        self.phase = Phase::PlayerTurn;
                    }
                }
                if !matches!(e, WorkerError::Cancelled) {
                    warn!(error = %e, "search failed");
                    self.last_error = Some(e);
                }
                true
            }
        }
    }

    fn apply_reply(&mut self, result: SearchResult, elapsed: Duration) {
        self.last_ai_time = Some(elapsed);
        let best_move = result.best_move;
        self.last_ai_result = Some(result);

        self.phase = Phase::EvaluatingMove;
        let Some(mv) = best_move else {
            // No legal move left for the engine
            self.state.status = GameStatus::Draw;
            self.phase = Phase::GameOver;
            info!("engine has no move, game drawn");
            return;
        };
        match self.state.play(mv) {
            Ok(record) => {
                info!(?mv, elapsed_ms = elapsed.as_millis() as u64, "engine move");
                self.after_move(record);
            }
            Err(e) => {
                warn!(?mv, error = %e, "engine returned an illegal move");
                self.phase = Phase::PlayerTurn;
            }
        }
    }
}
