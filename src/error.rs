//! Error types and Result aliases for gitview

use std::path::PathBuf;
use std::time::Duration;

/// Result type alias for gitview operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for gitview
#[derive(Debug, thiserror::Error)]
pub enum Error {
    // === Repository setup errors ===
    /// The directory handed to `Repository::open` does not exist
    #[error("Directory '{}' does not exist", .path.display())]
    DirectoryNotFound { path: PathBuf },

    /// No ancestor of the directory contains a `.git` directory
    #[error("No git repository found at '{}' or any of its parents", .path.display())]
    RepositoryNotFound { path: PathBuf },

    // === Command errors ===
    /// The git executable could not be resolved
    #[error("Cannot find {name} executable")]
    BinaryNotFound { name: String },

    /// Spawning the git process failed
    #[error("Failed to start '{command}': {reason}")]
    ProcessStartFailed { command: String, reason: String },

    /// git exited with a non-zero status
    #[error("git exited with code {exit_code}: {stderr}")]
    CommandFailed { exit_code: i32, stderr: String },

    /// git did not finish within the configured timeout
    #[error("Command '{command}' timed out after {duration:?}")]
    CommandTimeout { command: String, duration: Duration },

    // === Configuration errors ===
    /// Failed to load configuration file
    #[error("Failed to load config from '{}': {reason}", .path.display())]
    ConfigLoadFailed { path: PathBuf, reason: String },

    /// Configuration file not found
    #[error("Configuration file not found")]
    ConfigNotFound,

    /// Configuration validation failed
    #[error("Configuration validation failed for '{field}': {reason}")]
    ConfigValidationFailed { field: String, reason: String },

    /// Failed to serialize configuration
    #[error("Failed to serialize config as {format}: {reason}")]
    ConfigSerializationFailed { format: String, reason: String },

    /// Failed to parse configuration
    #[error("Failed to parse {format} config: {reason}")]
    ConfigParseFailed { format: String, reason: String },

    // === I/O and serialization errors ===
    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// TOML parsing errors
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    // === Generic fallback (use sparingly) ===
    /// Generic errors (for cases not yet categorized)
    #[error("Error: {0}")]
    Other(String),
}

impl Error {
    /// Exit code reported alongside this error on the `Error` event.
    ///
    /// Only `CommandFailed` carries a real process exit code; everything else
    /// maps to `-1`.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::CommandFailed { exit_code, .. } => *exit_code,
            _ => -1,
        }
    }

    /// Message reported alongside this error on the `Error` event.
    ///
    /// For a failed command this is the captured error stream, verbatim
    /// apart from trailing whitespace.
    pub fn event_message(&self) -> String {
        match self {
            Error::CommandFailed { stderr, .. } => stderr.clone(),
            other => other.to_string(),
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}

impl From<String> for Error {
    fn from(err: String) -> Self {
        Error::Other(err)
    }
}

impl From<&str> for Error {
    fn from(err: &str) -> Self {
        Error::Other(err.to_string())
    }
}
