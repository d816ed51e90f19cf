//! Core data models for gitview
//!
//! This module contains the domain entities shared between the parser,
//! the refresh state machine and the display layer.

pub mod file_record;
pub mod status_snapshot;

// Re-exports for convenience
pub use file_record::{FileRecord, FileStatus};
pub use status_snapshot::{Category, StatusSnapshot};
pub(crate) use status_snapshot::SnapshotBuilder;
