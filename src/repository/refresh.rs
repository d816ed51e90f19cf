//! Refresh state machine
//!
//! A refresh cycle runs three git queries strictly one after another:
//!
//! ```text
//! Idle ─start─▶ AwaitingUnstaged ─ok─▶ AwaitingStaged ─ok─▶ AwaitingUntracked ─ok─▶ Idle
//!                     │                      │                      │            (Completed)
//!                     └──────── failure ─────┴──────────────────────┴──▶ Idle (Failed)
//! ```
//!
//! [`RefreshMachine`] owns the state and the lists being accumulated. It
//! knows nothing about processes or channels: the caller runs the step it
//! asks for and feeds the outcome back through
//! [`RefreshMachine::on_completion`].
//!
//! A path reported as unmerged by either diff is listed only under
//! Unmerged, once, no matter what status the other diff gives it.

use std::fmt;

use crate::error::Error;
use crate::models::{SnapshotBuilder, StatusSnapshot};
use crate::process::ProcessOutcome;

use super::parser::{parse_name_only, parse_name_status};

/// One of the three queries of a refresh cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefreshStep {
    /// `diff --name-status`: working tree against the index
    Unstaged,
    /// `diff --cached --name-status`: index against HEAD
    Staged,
    /// `ls-files --others --exclude-standard`
    Untracked,
}

impl RefreshStep {
    /// git arguments for this step
    pub fn args(&self) -> &'static [&'static str] {
        match self {
            RefreshStep::Unstaged => &["diff", "--name-status"],
            RefreshStep::Staged => &["diff", "--cached", "--name-status"],
            RefreshStep::Untracked => &["ls-files", "--others", "--exclude-standard"],
        }
    }
}

impl fmt::Display for RefreshStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RefreshStep::Unstaged => "unstaged",
            RefreshStep::Staged => "staged",
            RefreshStep::Untracked => "untracked",
        };
        f.write_str(name)
    }
}

/// Where the current cycle stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshState {
    #[default]
    Idle,
    AwaitingUnstaged,
    AwaitingStaged,
    AwaitingUntracked,
}

impl RefreshState {
    /// Step whose completion this state is waiting for
    pub fn awaited_step(&self) -> Option<RefreshStep> {
        match self {
            RefreshState::Idle => None,
            RefreshState::AwaitingUnstaged => Some(RefreshStep::Unstaged),
            RefreshState::AwaitingStaged => Some(RefreshStep::Staged),
            RefreshState::AwaitingUntracked => Some(RefreshStep::Untracked),
        }
    }
}

/// What the caller has to do after feeding a completion
#[derive(Debug)]
pub enum Transition {
    /// Run this step next
    Enqueue(RefreshStep),
    /// The cycle finished; replace the visible lists with this snapshot
    Completed(StatusSnapshot),
    /// The cycle was abandoned; keep the visible lists as they are
    Failed(Error),
    /// The completion was not the one being waited for
    Ignored,
}

/// Three-step refresh cycle
#[derive(Debug, Default)]
pub struct RefreshMachine {
    state: RefreshState,
    pending: Option<SnapshotBuilder>,
}

impl RefreshMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> RefreshState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == RefreshState::Idle
    }

    /// Begin a cycle. Returns the first step to run, or `None` when a cycle
    /// is already in flight.
    pub fn start(&mut self) -> Option<RefreshStep> {
        if !self.is_idle() {
            return None;
        }
        self.state = RefreshState::AwaitingUnstaged;
        self.pending = Some(SnapshotBuilder::default());
        Some(RefreshStep::Unstaged)
    }

    /// Feed the outcome of `step` and advance the cycle
    pub fn on_completion(&mut self, step: RefreshStep, outcome: ProcessOutcome) -> Transition {
        if self.state.awaited_step() != Some(step) {
            debug!(
                "Ignoring {} completion while in state {:?}",
                step, self.state
            );
            return Transition::Ignored;
        }

        let output = match outcome.into_output() {
            Ok(output) => output,
            Err(e) => {
                warn!("Refresh step {} failed: {}", step, e);
                self.reset();
                return Transition::Failed(e);
            }
        };

        let Some(pending) = self.pending.as_mut() else {
            self.reset();
            return Transition::Failed(Error::Other(
                "refresh state lost its pending lists".to_string(),
            ));
        };

        let stdout = output.stdout_text();
        match step {
            RefreshStep::Unstaged => {
                for record in parse_name_status(&stdout) {
                    if record.is_unmerged() {
                        pending.unmerged.insert(record);
                    } else {
                        pending.unstaged.insert(record);
                    }
                }
                self.state = RefreshState::AwaitingStaged;
                Transition::Enqueue(RefreshStep::Staged)
            }
            RefreshStep::Staged => {
                for record in parse_name_status(&stdout) {
                    if record.is_unmerged() {
                        // Kept only if the unstaged diff did not report it
                        pending.unmerged.insert(record);
                    } else if !pending.unmerged.contains(record.path()) {
                        pending.staged.insert(record);
                    }
                }
                self.state = RefreshState::AwaitingUntracked;
                Transition::Enqueue(RefreshStep::Untracked)
            }
            RefreshStep::Untracked => {
                for record in parse_name_only(&stdout) {
                    pending.untracked.insert(record);
                }
                let snapshot = self
                    .pending
                    .take()
                    .map(SnapshotBuilder::build)
                    .unwrap_or_default();
                self.state = RefreshState::Idle;
                Transition::Completed(snapshot)
            }
        }
    }

    fn reset(&mut self) {
        self.state = RefreshState::Idle;
        self.pending = None;
    }
}
