//! Test Utilities and Mocks
//!
//! A scripted [`ProcessRunner`] that answers git invocations from fixtures,
//! plus helpers for building repository directories.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

use gitview::process::{CommandRequest, ProcessOutcome, ProcessOutput, ProcessRunner};

/// Canned answer for one argument list
#[derive(Debug, Clone)]
pub struct Fixture {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub delay: Duration,
    pub fail_to_start: bool,
}

impl Fixture {
    pub fn ok(stdout: &str) -> Self {
        Self {
            exit_code: 0,
            stdout: stdout.to_string(),
            stderr: String::new(),
            delay: Duration::ZERO,
            fail_to_start: false,
        }
    }

    pub fn failed(exit_code: i32, stderr: &str) -> Self {
        Self {
            exit_code,
            stderr: stderr.to_string(),
            ..Self::ok("")
        }
    }

    pub fn not_started() -> Self {
        Self {
            fail_to_start: true,
            ..Self::ok("")
        }
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Runner that replays fixtures keyed by the joined argument list
#[derive(Default)]
pub struct ScriptedRunner {
    fixtures: Mutex<HashMap<String, Fixture>>,
    calls: Mutex<Vec<String>>,
    running: AtomicUsize,
    max_running: AtomicUsize,
}

impl ScriptedRunner {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Runner preloaded with answers for the three refresh queries
    pub fn with_status(unstaged: &str, staged: &str, untracked: &str) -> Arc<Self> {
        let runner = Self::new();
        runner.script("diff --name-status", Fixture::ok(unstaged));
        runner.script("diff --cached --name-status", Fixture::ok(staged));
        runner.script("ls-files --others --exclude-standard", Fixture::ok(untracked));
        runner
    }

    /// Answer `args` (space separated) with `fixture` from now on
    pub fn script(&self, args: &str, fixture: Fixture) {
        self.fixtures
            .lock()
            .unwrap()
            .insert(args.to_string(), fixture);
    }

    /// Argument lists in the order they were run
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Highest number of processes observed running at once
    pub fn max_concurrency(&self) -> usize {
        self.max_running.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProcessRunner for ScriptedRunner {
    async fn run(&self, request: CommandRequest) -> ProcessOutcome {
        let key = request.args.join(" ");
        self.calls.lock().unwrap().push(key.clone());

        let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_running.fetch_max(now, Ordering::SeqCst);

        let fixture = self
            .fixtures
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .unwrap_or_else(|| Fixture::failed(128, &format!("unscripted command: {}", key)));

        if !fixture.delay.is_zero() {
            tokio::time::sleep(fixture.delay).await;
        }
        self.running.fetch_sub(1, Ordering::SeqCst);

        if fixture.fail_to_start {
            return ProcessOutcome::FailedToStart {
                command: request.display_command(),
                reason: "Cannot find git executable".to_string(),
            };
        }

        ProcessOutcome::Exited(ProcessOutput {
            exit_code: fixture.exit_code,
            stdout: fixture.stdout.into_bytes(),
            stderr: fixture.stderr.into_bytes(),
        })
    }
}

/// Temporary directory with a `.git` directory in it
pub fn repo_dir() -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join(".git")).unwrap();
    temp
}

pub fn make_dirs(base: &Path, relative: &str) -> std::path::PathBuf {
    let dir = base.join(relative);
    fs::create_dir_all(&dir).unwrap();
    dir
}
