//! Working-tree status
//!
//! - [`locator`] finds the repository root above a directory
//! - [`binary`] resolves the git executable once per process
//! - [`parser`] turns git output into [`FileRecord`](crate::models::FileRecord)s
//! - [`refresh`] is the three-step refresh state machine
//! - [`handle`] ties them together in [`Repository`]
//! - [`events`] carries refresh outcomes to observers

pub mod binary;
pub mod events;
pub mod handle;
pub mod locator;
pub mod parser;
pub mod refresh;

// Re-exports for convenience
pub use binary::{BinaryLocator, GIT_TOOL};
pub use events::{EventBus, EventSubscription, ObserverId, RepositoryEvent};
pub use handle::Repository;
pub use locator::{locate_repository_root, REPOSITORY_MARKER};
pub use parser::{parse_name_only, parse_name_status};
pub use refresh::{RefreshMachine, RefreshState, RefreshStep, Transition};
