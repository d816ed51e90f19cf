//! Process Runner
//!
//! Launches one git command with a working directory and captures its exit
//! code and output streams. The runner never interprets what it captures.

use async_trait::async_trait;
use std::fmt;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use tokio::process::Command;

use crate::error::Error;
use crate::repository::binary::BinaryLocator;

/// One git invocation: arguments plus the directory to run them in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    /// Working directory for the child process
    pub working_dir: PathBuf,
    /// Arguments passed to git (without the binary itself)
    pub args: Vec<String>,
}

impl CommandRequest {
    pub fn new<I, S>(working_dir: impl Into<PathBuf>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            working_dir: working_dir.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Command line as shown in logs and error messages
    pub fn display_command(&self) -> String {
        format!("git {}", self.args.join(" "))
    }
}

impl fmt::Display for CommandRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_command())
    }
}

/// Everything captured from a process that ran to completion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code, `-1` when the process was terminated by a signal
    pub exit_code: i32,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).to_string()
    }

    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).to_string()
    }
}

/// The single completion notification produced for each run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// The process ran and exited, successfully or not
    Exited(ProcessOutput),
    /// The process could not be started at all
    FailedToStart { command: String, reason: String },
    /// The watchdog killed the process
    TimedOut { command: String, after: Duration },
}

impl ProcessOutcome {
    /// Output of a successful run, or the error describing why there is none
    pub fn into_output(self) -> crate::error::Result<ProcessOutput> {
        match self {
            ProcessOutcome::Exited(output) if output.success() => Ok(output),
            ProcessOutcome::Exited(output) => Err(Error::CommandFailed {
                exit_code: output.exit_code,
                stderr: output.stderr_text().trim_end().to_string(),
            }),
            ProcessOutcome::FailedToStart { command, reason } => {
                Err(Error::ProcessStartFailed { command, reason })
            }
            ProcessOutcome::TimedOut { command, after } => Err(Error::CommandTimeout {
                command,
                duration: after,
            }),
        }
    }
}

/// Something that can execute a `CommandRequest`
///
/// `GitProcessRunner` is the production implementation; tests substitute a
/// scripted runner to control output and timing.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    async fn run(&self, request: CommandRequest) -> ProcessOutcome;
}

/// Runs requests against the real git executable
pub struct GitProcessRunner {
    locator: Arc<BinaryLocator>,
    timeout: Option<Duration>,
}

impl GitProcessRunner {
    pub fn new(locator: Arc<BinaryLocator>, timeout: Option<Duration>) -> Self {
        Self { locator, timeout }
    }
}

#[async_trait]
impl ProcessRunner for GitProcessRunner {
    async fn run(&self, request: CommandRequest) -> ProcessOutcome {
        let command = request.display_command();

        let binary = match self.locator.resolve() {
            Ok(binary) => binary,
            Err(e) => {
                error!("Cannot run '{}': {}", command, e);
                return ProcessOutcome::FailedToStart {
                    command,
                    reason: e.to_string(),
                };
            }
        };

        let child = Command::new(&binary)
            .args(&request.args)
            .current_dir(&request.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn();

        let child = match child {
            Ok(child) => child,
            Err(e) => {
                error!("Failed to spawn '{}': {}", command, e);
                return ProcessOutcome::FailedToStart {
                    command,
                    reason: e.to_string(),
                };
            }
        };

        debug!("Started '{}' in {}", command, request.working_dir.display());

        let waited = match self.timeout {
            // Dropping the future on timeout drops the child, which kills it
            Some(limit) => match tokio::time::timeout(limit, child.wait_with_output()).await {
                Ok(result) => result,
                Err(_) => {
                    warn!("'{}' timed out after {:?}, killed", command, limit);
                    return ProcessOutcome::TimedOut {
                        command,
                        after: limit,
                    };
                }
            },
            None => child.wait_with_output().await,
        };

        match waited {
            Ok(output) => {
                let exit_code = output.status.code().unwrap_or(-1);
                debug!("'{}' exited with code {}", command, exit_code);
                ProcessOutcome::Exited(ProcessOutput {
                    exit_code,
                    stdout: output.stdout,
                    stderr: output.stderr,
                })
            }
            Err(e) => ProcessOutcome::FailedToStart {
                command,
                reason: e.to_string(),
            },
        }
    }
}
