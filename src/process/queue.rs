//! Command Queue
//!
//! Serializes git invocations so that at most one process runs per queue.
//! Commands start in FIFO order and their completion callbacks are invoked in
//! the same order, one at a time.
//!
//! ```text
//!  enqueue ──▶ ┌──────────────── Mutex<QueueState> ───────────────┐
//!              │ pending: [running, waiting, waiting, ...]        │
//!              └──────────────────────────────────────────────────┘
//!                     │ front started                    ▲ pop on finish,
//!                     ▼                                  │ start next
//!              runner task (ProcessRunner::run) ─────────┘
//!                     │ (callback, outcome) sent under the lock
//!                     ▼
//!              dispatcher task: invokes callbacks sequentially
//! ```
//!
//! The lock is only held to inspect or mutate the pending list, never while a
//! process runs or a callback executes, so callbacks may enqueue more work.

use futures::FutureExt;
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::{mpsc, oneshot};
use tracing::Instrument;

use super::runner::{CommandRequest, ProcessOutcome, ProcessRunner};

/// Callback invoked with the outcome of a queued command
pub type CompletionCallback = Box<dyn FnOnce(ProcessOutcome) + Send + 'static>;

/// A command owned by the queue from enqueue until its process finishes
struct QueuedCommand {
    /// Monotonic sequence number, for logging
    seq: u64,
    request: CommandRequest,
    on_complete: CompletionCallback,
}

#[derive(Default)]
struct QueueState {
    /// Front entry is the running command whenever `running` is set
    pending: VecDeque<QueuedCommand>,
    running: bool,
    next_seq: u64,
}

/// A finished command's callback waiting to be invoked
struct Dispatch {
    seq: u64,
    on_complete: CompletionCallback,
    outcome: ProcessOutcome,
}

struct QueueInner {
    state: Mutex<QueueState>,
    runner: Arc<dyn ProcessRunner>,
    dispatch_tx: mpsc::UnboundedSender<Dispatch>,
}

/// FIFO queue running one git process at a time
///
/// Cloning yields another handle to the same queue. Must be created inside a
/// tokio runtime.
#[derive(Clone)]
pub struct CommandQueue {
    inner: Arc<QueueInner>,
}

impl CommandQueue {
    /// Create a queue that runs commands with `runner`
    pub fn new(runner: Arc<dyn ProcessRunner>) -> Self {
        let (dispatch_tx, dispatch_rx) = mpsc::unbounded_channel();
        tokio::spawn(dispatch_loop(dispatch_rx));

        Self {
            inner: Arc::new(QueueInner {
                state: Mutex::new(QueueState::default()),
                runner,
                dispatch_tx,
            }),
        }
    }

    /// Queue `request`; `on_complete` receives its outcome.
    ///
    /// Starts the process immediately if nothing is running. Returns the
    /// command's sequence number.
    pub fn enqueue<F>(&self, request: CommandRequest, on_complete: F) -> u64
    where
        F: FnOnce(ProcessOutcome) + Send + 'static,
    {
        let mut state = self.lock_state();

        let seq = state.next_seq;
        state.next_seq += 1;
        state.pending.push_back(QueuedCommand {
            seq,
            request,
            on_complete: Box::new(on_complete),
        });

        if state.running {
            debug!(
                "Queued command #{} behind {} other(s)",
                seq,
                state.pending.len() - 1
            );
        } else {
            state.running = true;
            self.start_front(&state);
        }

        seq
    }

    /// Queue `request` and wait for its outcome
    pub async fn run(&self, request: CommandRequest) -> ProcessOutcome {
        let command = request.display_command();
        let (tx, rx) = oneshot::channel();
        self.enqueue(request, move |outcome| {
            let _ = tx.send(outcome);
        });

        rx.await.unwrap_or_else(|_| ProcessOutcome::FailedToStart {
            command,
            reason: "command queue shut down".to_string(),
        })
    }

    /// Number of commands queued, including the running one
    pub fn len(&self) -> usize {
        self.lock_state().pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether no command is currently running
    pub fn is_idle(&self) -> bool {
        !self.lock_state().running
    }

    fn lock_state(&self) -> MutexGuard<'_, QueueState> {
        // A panic inside the critical section cannot leave the list half
        // mutated, so a poisoned lock is still usable.
        self.inner
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Spawn the process for the front entry. Caller holds the lock.
    fn start_front(&self, state: &QueueState) {
        let Some(front) = state.pending.front() else {
            return;
        };

        debug!("Starting command #{}: {}", front.seq, front.request);

        let queue = self.clone();
        let runner = Arc::clone(&self.inner.runner);
        let request = front.request.clone();
        let span = debug_span!("git_command", seq = front.seq);
        tokio::spawn(
            async move {
                let command = request.display_command();
                // Every started command reaches `finished`, even if the runner panics
                let outcome = match AssertUnwindSafe(runner.run(request)).catch_unwind().await {
                    Ok(outcome) => outcome,
                    Err(_) => {
                        error!("Runner panicked while running '{}'", command);
                        ProcessOutcome::FailedToStart {
                            command,
                            reason: "runner panicked".to_string(),
                        }
                    }
                };
                queue.finished(outcome);
            }
            .instrument(span),
        );
    }

    /// Called by the runner task when the front entry's process is done
    fn finished(&self, outcome: ProcessOutcome) {
        let mut state = self.lock_state();

        let Some(done) = state.pending.pop_front() else {
            error!("Command finished but the queue is empty");
            state.running = false;
            return;
        };

        if state.pending.is_empty() {
            state.running = false;
        } else {
            self.start_front(&state);
        }

        // Sent under the lock so dispatch order matches pop order
        let dispatch = Dispatch {
            seq: done.seq,
            on_complete: done.on_complete,
            outcome,
        };
        if self.inner.dispatch_tx.send(dispatch).is_err() {
            warn!("Dispatcher gone, dropping completion of command #{}", done.seq);
        }
    }
}

/// Invokes completion callbacks strictly one after another
async fn dispatch_loop(mut dispatch_rx: mpsc::UnboundedReceiver<Dispatch>) {
    while let Some(dispatch) = dispatch_rx.recv().await {
        let seq = dispatch.seq;
        debug!("Delivering completion of command #{}", seq);
        let Dispatch {
            on_complete,
            outcome,
            ..
        } = dispatch;
        if panic::catch_unwind(AssertUnwindSafe(move || on_complete(outcome))).is_err() {
            error!("Completion callback of command #{} panicked", seq);
        }
    }
}
