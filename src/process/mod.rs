//! git process execution
//!
//! This module runs the external git executable: [`runner`] launches a
//! single process and captures its output, [`queue`] serializes invocations
//! so only one process runs per repository at a time.

pub mod queue;
pub mod runner;

// Re-exports for convenience
pub use queue::{CommandQueue, CompletionCallback};
pub use runner::{CommandRequest, GitProcessRunner, ProcessOutcome, ProcessOutput, ProcessRunner};
