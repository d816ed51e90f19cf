//! Platform-specific operation traits
//!
//! These traits define the interface for platform-specific operations,
//! allowing for clean abstraction and easier testing.

use crate::error::Result;
use std::path::{Path, PathBuf};

/// Platform-specific filesystem operations
pub trait FilesystemOps: Send + Sync {
    /// Check if a file is executable
    fn is_executable(&self, path: &Path) -> bool;

    /// File name of an executable tool on this platform (`git` or `git.exe`)
    fn executable_name(&self, tool: &str) -> String;

    /// Well-known install directories searched after `PATH`
    fn fallback_dirs(&self) -> Vec<PathBuf>;
}

/// Platform-specific path operations
pub trait PathOps: Send + Sync {
    /// Per-application configuration directory (`<config dir>/<app>`)
    fn app_config_dir(&self, app: &str) -> Result<PathBuf>;

    /// Home directory, where dotfile configuration lives
    fn home_dir(&self) -> Option<PathBuf>;
}
