//! gitview - working-tree status for git repositories
//!
//! This library finds the git repository around a directory, runs the three
//! git queries that describe its working tree, and exposes the result as four
//! file lists: staged, unstaged, unmerged and untracked.
//!
//! ## Module Organization
//!
//! - [`repository`] - Repository locator, git binary lookup, status parser,
//!   refresh state machine and the [`Repository`] handle
//! - [`process`] - git process runner and the per-repository command queue
//! - [`models`] - [`FileRecord`], [`FileStatus`], [`StatusSnapshot`]
//! - [`config`] - Configuration loading and validation
//! - [`platform`] - Unix/Windows executable and path conventions
//! - [`mod@error`] - Error types and Result aliases
//!
//! ## Quick Start
//!
//! ```no_run
//! use gitview::{init, Repository, RepositoryEvent};
//! use std::path::Path;
//!
//! # async fn run() -> gitview::Result<()> {
//! let config = init()?;
//! let mut repository = Repository::open_with_config(Path::new("."), &config)?;
//! repository.refresh();
//!
//! if let Some(RepositoryEvent::Refreshed) = repository.next_event().await {
//!     for record in repository.unstaged() {
//!         println!("{}", record);
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! A [`Repository`] is owned by one task. git runs on tokio tasks, one
//! process at a time per repository, and completions are handed back to the
//! owner through a channel. The owner applies them with
//! [`Repository::next_event`] (async) or [`Repository::poll_events`]
//! (frame-driven UIs); observers registered with [`Repository::subscribe`]
//! run at that point. Each refresh cycle ends with exactly one
//! [`RepositoryEvent`].

#[macro_use]
extern crate tracing;

pub mod config;
pub mod error;
pub mod models;
pub mod platform;
pub mod process;
pub mod repository;

// Re-exports for core functionality
pub use config::{Config, GitConfig, RefreshConfig};
pub use error::{Error, Result};
pub use models::{Category, FileRecord, FileStatus, StatusSnapshot};
pub use process::{CommandQueue, CommandRequest, GitProcessRunner, ProcessOutcome, ProcessRunner};
pub use repository::{
    locate_repository_root, BinaryLocator, ObserverId, Repository, RepositoryEvent,
};

// Convenience re-exports for common types
pub use config::loader::ConfigLoader;

/// The current version of gitview from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The application name from Cargo.toml
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Load configuration from the default locations and install the
/// process-wide git locator.
///
/// Falls back to defaults when no configuration can be loaded.
pub fn init() -> Result<Config> {
    info!("Initializing {} v{}", NAME, VERSION);

    let config = match ConfigLoader::load() {
        Ok(config) => config,
        Err(e) => {
            warn!("Failed to load configuration: {}. Using defaults", e);
            Config::default()
        }
    };

    install_locator(&config);
    Ok(config)
}

/// Like [`init`], with an explicit configuration file.
///
/// # Errors
///
/// Fails if the file is missing, unreadable or invalid; there is no fallback
/// to defaults.
pub fn init_with_config(config_path: &std::path::Path) -> Result<Config> {
    info!(
        "Initializing {} v{} with config: {}",
        NAME,
        VERSION,
        config_path.display()
    );

    if !config_path.exists() {
        return Err(Error::ConfigLoadFailed {
            path: config_path.to_path_buf(),
            reason: "Configuration file does not exist".to_string(),
        });
    }

    let config = ConfigLoader::load_from_file(config_path)?;
    install_locator(&config);
    Ok(config)
}

fn install_locator(config: &Config) {
    let locator = BinaryLocator::install_global(BinaryLocator::from_config(&config.git));
    // Resolve eagerly so a missing git shows up in the log at startup
    if let Err(e) = locator.resolve() {
        warn!("{}", e);
    }
}

/// User-facing description of an error that stopped the program, with hints
pub fn handle_startup_error(error: &Error) -> String {
    match error {
        Error::DirectoryNotFound { path } => {
            format!(
                "Directory Error: '{}' does not exist or is not a directory",
                path.display()
            )
        }
        Error::RepositoryNotFound { path } => {
            format!(
                "Repository Error: '{}' is not inside a git repository\n\nTry:\n• Run `git init` to create one\n• Pass the path of a repository",
                path.display()
            )
        }
        Error::BinaryNotFound { name } => {
            format!(
                "Setup Error: Cannot find {} executable\n\nTry:\n• Install git\n• Add it to PATH\n• Set git.binary_path in the configuration",
                name
            )
        }
        Error::ConfigLoadFailed { path, reason } => {
            format!(
                "Configuration Error: Failed to load config from '{}': {}\n\nTry:\n• Check configuration file syntax\n• Ensure file permissions are correct\n• Use default configuration",
                path.display(),
                reason
            )
        }
        Error::ConfigParseFailed { format, reason } => {
            format!(
                "Configuration Error: Failed to parse {} config: {}\n\nTry:\n• Check configuration file syntax\n• Ensure file is valid {}",
                format, reason, format
            )
        }
        Error::ConfigValidationFailed { field, reason } => {
            format!(
                "Configuration Error: Validation failed for '{}': {}\n\nTry:\n• Check configuration value\n• Use default configuration",
                field, reason
            )
        }
        Error::ConfigNotFound => {
            "Configuration Error: Config file not found\n\nTry:\n• Create a configuration file\n• Use default configuration".to_string()
        }
        Error::Io(err) => {
            format!(
                "I/O Error: {}\n\nTry:\n• Check file permissions\n• Ensure required directories exist",
                err
            )
        }
        _ => {
            format!(
                "Unexpected Error: {}\n\nPlease report this issue with debug logs enabled",
                error
            )
        }
    }
}
