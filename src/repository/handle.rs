//! Repository handle
//!
//! [`Repository`] is the owner-side view of one working tree. It is meant to
//! be held by a single task (the UI side). Git processes run on tokio tasks;
//! their completions come back through a channel owned by the handle and are
//! applied only when the owner calls [`Repository::next_event`] or
//! [`Repository::poll_events`]. Snapshot and refresh state therefore need no
//! locking.

use futures::future::{BoxFuture, FutureExt};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::config::Config;
use crate::error::Result;
use crate::models::{Category, FileRecord, StatusSnapshot};
use crate::process::{CommandQueue, CommandRequest, GitProcessRunner, ProcessOutcome, ProcessRunner};

use super::binary::BinaryLocator;
use super::events::{EventBus, EventSubscription, ObserverId, RepositoryEvent};
use super::locator::locate_repository_root;
use super::refresh::{RefreshMachine, RefreshState, RefreshStep, Transition};

/// A finished refresh step on its way back to the owning task
struct StepCompletion {
    generation: Uuid,
    step: RefreshStep,
    outcome: ProcessOutcome,
}

/// Handle on a git working tree and its last known status
pub struct Repository {
    id: Uuid,
    root: PathBuf,
    snapshot: StatusSnapshot,
    machine: RefreshMachine,
    /// Identifies the refresh cycle in flight
    generation: Uuid,
    queue: CommandQueue,
    completion_tx: mpsc::UnboundedSender<StepCompletion>,
    completion_rx: mpsc::UnboundedReceiver<StepCompletion>,
    events: EventBus,
}

impl Repository {
    /// Open the repository containing `path`, running git through `runner`.
    ///
    /// The snapshot starts empty; call [`refresh`](Self::refresh) to fill it.
    /// Must be called inside a tokio runtime.
    ///
    /// # Errors
    ///
    /// [`DirectoryNotFound`](crate::Error::DirectoryNotFound) or
    /// [`RepositoryNotFound`](crate::Error::RepositoryNotFound) from the
    /// locator.
    pub fn open(path: &Path, runner: Arc<dyn ProcessRunner>) -> Result<Self> {
        let root = locate_repository_root(path)?;
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();

        let repository = Self {
            id: Uuid::new_v4(),
            root,
            snapshot: StatusSnapshot::empty(),
            machine: RefreshMachine::new(),
            generation: Uuid::nil(),
            queue: CommandQueue::new(runner),
            completion_tx,
            completion_rx,
            events: EventBus::default(),
        };

        info!(
            "Opened repository {} ({})",
            repository.root.display(),
            repository.id
        );
        Ok(repository)
    }

    /// Open with the settings in `config`. git is found through the
    /// process-wide locator unless `git.binary_path` or
    /// `git.extra_search_dirs` ask for a different search.
    /// Starts a refresh right away when `refresh.refresh_on_open` is set.
    pub fn open_with_config(path: &Path, config: &Config) -> Result<Self> {
        let global = BinaryLocator::global();
        let dedicated = config.git.has_locator_overrides() && !global.matches_config(&config.git);
        let locator = if dedicated {
            debug!("Using a dedicated git locator for {}", path.display());
            Arc::new(BinaryLocator::from_config(&config.git))
        } else {
            global
        };
        let runner = GitProcessRunner::new(locator, config.git.command_timeout());
        let mut repository = Self::open(path, Arc::new(runner))?;
        if config.refresh.refresh_on_open {
            repository.refresh();
        }
        Ok(repository)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Root of the working tree (the directory holding `.git`)
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lists from the last successful refresh
    pub fn snapshot(&self) -> &StatusSnapshot {
        &self.snapshot
    }

    pub fn staged(&self) -> &[FileRecord] {
        self.snapshot.staged()
    }

    pub fn unstaged(&self) -> &[FileRecord] {
        self.snapshot.unstaged()
    }

    pub fn unmerged(&self) -> &[FileRecord] {
        self.snapshot.unmerged()
    }

    pub fn untracked(&self) -> &[FileRecord] {
        self.snapshot.untracked()
    }

    pub fn files(&self, category: Category) -> &[FileRecord] {
        self.snapshot.files(category)
    }

    pub fn refresh_state(&self) -> RefreshState {
        self.machine.state()
    }

    pub fn is_refreshing(&self) -> bool {
        !self.machine.is_idle()
    }

    /// Queue shared by the refresh cycle and one-off commands
    pub fn queue(&self) -> &CommandQueue {
        &self.queue
    }

    /// Register a callback invoked with every refresh event.
    ///
    /// Callbacks run on the task that calls `next_event` or `poll_events`.
    pub fn subscribe<F>(&mut self, observer: F) -> ObserverId
    where
        F: FnMut(&RepositoryEvent) + Send + 'static,
    {
        self.events.observe(observer)
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.events.unobserve(id)
    }

    /// Receive refresh events on another task
    pub fn event_subscription(&self) -> EventSubscription {
        self.events.subscribe()
    }

    /// Start a refresh cycle. Returns false, and does nothing, while a cycle
    /// is already running.
    pub fn refresh(&mut self) -> bool {
        let Some(step) = self.machine.start() else {
            debug!("Refresh of {} already in progress", self.root.display());
            return false;
        };

        self.generation = Uuid::new_v4();
        info!("Refreshing {}", self.root.display());
        self.enqueue_step(step);
        true
    }

    /// Wait until the running cycle ends and return its event.
    ///
    /// Returns `None` immediately when no cycle is running.
    pub async fn next_event(&mut self) -> Option<RepositoryEvent> {
        while self.is_refreshing() {
            // The handle keeps a sender alive, so this only ends with a value
            let completion = self.completion_rx.recv().await?;
            if let Some(event) = self.apply(completion) {
                return Some(event);
            }
        }
        None
    }

    /// Apply every completion that has already arrived, without waiting.
    /// Returns the events they produced.
    pub fn poll_events(&mut self) -> Vec<RepositoryEvent> {
        let mut events = Vec::new();
        while let Ok(completion) = self.completion_rx.try_recv() {
            if let Some(event) = self.apply(completion) {
                events.push(event);
            }
        }
        events
    }

    /// Diff of a single file: working tree against the index, or the index
    /// against HEAD when `staged` is set. A path listed as untracked by the
    /// last refresh is diffed against `/dev/null`, so its whole content shows
    /// as added.
    ///
    /// Runs through the same queue as refresh steps. The returned future does
    /// not borrow the handle.
    pub fn file_diff(&self, path: &str, staged: bool) -> BoxFuture<'static, Result<String>> {
        let untracked = !staged && self.snapshot.untracked().iter().any(|r| r.path() == path);
        let args = if untracked {
            vec!["diff", "--no-index", "--", "/dev/null", path]
        } else if staged {
            vec!["diff", "--cached", "--", path]
        } else {
            vec!["diff", "--", path]
        };

        let request = CommandRequest::new(&self.root, args);
        let queue = self.queue.clone();
        async move {
            match queue.run(request).await {
                // --no-index exits 1 when the files differ
                ProcessOutcome::Exited(output) if untracked && output.exit_code == 1 => {
                    Ok(output.stdout_text())
                }
                outcome => Ok(outcome.into_output()?.stdout_text()),
            }
        }
        .boxed()
    }

    fn enqueue_step(&self, step: RefreshStep) {
        let request = CommandRequest::new(&self.root, step.args().iter().copied());
        let completion_tx = self.completion_tx.clone();
        let generation = self.generation;

        self.queue.enqueue(request, move |outcome| {
            let completion = StepCompletion {
                generation,
                step,
                outcome,
            };
            if completion_tx.send(completion).is_err() {
                debug!("Repository closed; discarding {} step result", step);
            }
        });
    }

    /// Feed one completion to the state machine; returns the cycle's event
    /// once it ends
    fn apply(&mut self, completion: StepCompletion) -> Option<RepositoryEvent> {
        if completion.generation != self.generation {
            debug!(
                "Discarding {} step result from an earlier refresh",
                completion.step
            );
            return None;
        }

        let event = match self.machine.on_completion(completion.step, completion.outcome) {
            Transition::Enqueue(next) => {
                self.enqueue_step(next);
                return None;
            }
            Transition::Ignored => return None,
            Transition::Completed(snapshot) => {
                info!(
                    "Refreshed {}: {} staged, {} unstaged, {} unmerged, {} untracked",
                    self.root.display(),
                    snapshot.staged().len(),
                    snapshot.unstaged().len(),
                    snapshot.unmerged().len(),
                    snapshot.untracked().len()
                );
                self.snapshot = snapshot;
                RepositoryEvent::Refreshed
            }
            Transition::Failed(e) => {
                error!("Refresh of {} failed: {}", self.root.display(), e);
                RepositoryEvent::Error {
                    exit_code: e.exit_code(),
                    message: e.event_message(),
                }
            }
        };

        self.events.publish(&event);
        Some(event)
    }
}

impl Drop for Repository {
    fn drop(&mut self) {
        debug!("Closing repository {} ({})", self.root.display(), self.id);
    }
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("id", &self.id)
            .field("root", &self.root)
            .field("state", &self.machine.state())
            .field("files", &self.snapshot.len())
            .finish()
    }
}
