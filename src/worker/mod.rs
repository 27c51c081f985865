//! Background search worker
//!
//! The engine runs on a dedicated OS thread so the UI thread never blocks.
//! Requests travel to the thread over an `mpsc` channel by value (the board is
//! an owned copy); each job answers on its own one-shot channel. The only
//! state shared across the thread boundary is a pair of atomic flags per job:
//! `cancel`, raised by the owner, and `finished`, raised by the worker.
//!
//! A cancelled job never delivers a result, even if the search completed
//! before the flag was noticed.

pub mod protocol;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, warn};

use crate::board::{Board, Player};
use crate::engine::{AIEngine, EngineConfig};
use crate::error::WorkerError;
use crate::search::SearchResult;

pub use protocol::{SearchRequestMessage, SearchResponseMessage};

/// Immutable search job: a board snapshot plus the side to move and limits.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub board: Board,
    pub player: Player,
    pub time_budget_ms: u64,
    pub max_depth: u8,
}

impl SearchRequest {
    pub fn new(board: Board, player: Player, engine: EngineConfig) -> Self {
        Self {
            board,
            player,
            time_budget_ms: engine.time_budget_ms,
            max_depth: engine.max_depth,
        }
    }

    fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            time_budget_ms: self.time_budget_ms,
            max_depth: self.max_depth,
        }
    }
}

/// Cancel/finished flag pair shared between a handle and the worker thread.
#[derive(Debug, Clone, Default)]
struct JobTicket {
    cancel: Arc<AtomicBool>,
    finished: Arc<AtomicBool>,
}

impl JobTicket {
    fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }

    fn is_finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }

    fn is_active(&self) -> bool {
        !self.is_cancelled() && !self.is_finished()
    }
}

struct Job {
    id: u64,
    request: SearchRequest,
    ticket: JobTicket,
    reply: Sender<SearchResult>,
}

/// Owner's view of one submitted job.
pub struct SearchHandle {
    id: u64,
    ticket: JobTicket,
    receiver: Receiver<SearchResult>,
}

impl SearchHandle {
    /// Job id, unique per worker
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Ask the worker to stop. Idempotent; any result is discarded.
    pub fn cancel(&self) {
        if !self.ticket.cancel.swap(true, Ordering::SeqCst) {
            debug!(job = self.id, "search cancelled");
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.ticket.is_cancelled()
    }

    /// True once the worker is done with this job, whatever the outcome.
    pub fn is_finished(&self) -> bool {
        self.ticket.is_finished()
    }

    /// Non-blocking poll: `Ok(None)` while the search is still running.
    pub fn try_result(&self) -> Result<Option<SearchResult>, WorkerError> {
        if self.is_cancelled() {
            return Err(WorkerError::Cancelled);
        }
        match self.receiver.try_recv() {
            Ok(result) => Ok(Some(result)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(self.closed()),
        }
    }

    /// Block until the search finishes.
    pub fn wait(self) -> Result<SearchResult, WorkerError> {
        match self.receiver.recv() {
            Ok(result) if !self.is_cancelled() => Ok(result),
            Ok(_) => Err(WorkerError::Cancelled),
            Err(_) => Err(self.closed()),
        }
    }

    /// Block for at most `timeout`; `Ok(None)` when the search is still running.
    pub fn wait_timeout(&self, timeout: Duration) -> Result<Option<SearchResult>, WorkerError> {
        if self.is_cancelled() {
            return Err(WorkerError::Cancelled);
        }
        match self.receiver.recv_timeout(timeout) {
            Ok(_) if self.is_cancelled() => Err(WorkerError::Cancelled),
            Ok(result) => Ok(Some(result)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(self.closed()),
        }
    }

    /// Reply channel closed without a result
    fn closed(&self) -> WorkerError {
        if self.is_cancelled() {
            WorkerError::Cancelled
        } else {
            WorkerError::Disconnected
        }
    }
}

/// One search thread serving one game session.
pub struct SearchWorker {
    jobs: Option<Sender<Job>>,
    thread: Option<JoinHandle<()>>,
    active: Option<JobTicket>,
    next_id: u64,
}

impl SearchWorker {
    /// Spawn the worker thread.
    pub fn spawn() -> Result<Self, WorkerError> {
        let (sender, receiver) = mpsc::channel::<Job>();
        let thread = thread::Builder::new()
            .name("search-worker".into())
            .spawn(move || run(receiver))?;

        Ok(Self {
            jobs: Some(sender),
            thread: Some(thread),
            active: None,
            next_id: 1,
        })
    }

    /// Queue a search. Only one job may be outstanding at a time.
    pub fn submit(&mut self, request: SearchRequest) -> Result<SearchHandle, WorkerError> {
        if self.is_busy() {
            return Err(WorkerError::Busy);
        }
        let jobs = self.jobs.as_ref().ok_or(WorkerError::Disconnected)?;

        let id = self.next_id;
        self.next_id += 1;
        let ticket = JobTicket::default();
        let (reply, receiver) = mpsc::channel();

        debug!(
            job = id,
            player = ?request.player,
            budget_ms = request.time_budget_ms,
            "submitting search"
        );
        jobs.send(Job {
            id,
            request,
            ticket: ticket.clone(),
            reply,
        })
        .map_err(|_| WorkerError::Disconnected)?;

        self.active = Some(ticket.clone());
        Ok(SearchHandle {
            id,
            ticket,
            receiver,
        })
    }

    /// True while the last submitted job is neither finished nor cancelled.
    pub fn is_busy(&self) -> bool {
        self.active.as_ref().is_some_and(JobTicket::is_active)
    }

    /// Cancel whatever job is in flight.
    pub fn cancel_active(&mut self) {
        if let Some(ticket) = self.active.take() {
            ticket.cancel.store(true, Ordering::SeqCst);
        }
    }

    /// Cancel the active job and stop the thread.
    ///
    /// Later submissions fail with [`WorkerError::Disconnected`].
    pub fn shutdown(&mut self) {
        self.cancel_active();
        // Closing the channel ends the thread's receive loop
        self.jobs = None;
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!("search worker panicked");
            }
        }
    }
}

impl Drop for SearchWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run(jobs: Receiver<Job>) {
    debug!("search worker started");
    while let Ok(job) = jobs.recv() {
        let Job {
            id,
            request,
            ticket,
            reply,
        } = job;

        if ticket.is_cancelled() {
            debug!(job = id, "skipping cancelled job");
            ticket.finished.store(true, Ordering::SeqCst);
            continue;
        }

        let mut engine = AIEngine::with_stop_flag(request.engine_config(), ticket.cancel.clone());
        let result = engine.get_move_with_stats(&request.board, request.player);

        // Mark done before replying so a caller woken by the result sees an idle worker
        ticket.finished.store(true, Ordering::SeqCst);
        if ticket.is_cancelled() {
            debug!(job = id, "discarding result of cancelled job");
        } else if reply.send(result).is_err() {
            debug!(job = id, "search handle dropped before result");
        }
    }
    debug!("search worker stopped");
}
