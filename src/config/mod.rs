//! Configuration management for gitview
//!
//! Settings that control how the git executable is found and driven.
//! Everything has a sensible default; a configuration file is optional.

pub mod loader;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for gitview
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// git executable configuration
    pub git: GitConfig,

    /// Refresh behaviour
    pub refresh: RefreshConfig,
}

/// How the git executable is located and run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitConfig {
    /// Explicit path to the git executable, skipping the search
    pub binary_path: Option<PathBuf>,

    /// Directories searched after `PATH` and the built-in fallbacks
    pub extra_search_dirs: Vec<PathBuf>,

    /// Seconds before a hung git process is killed (0 disables the watchdog)
    pub command_timeout_secs: u64,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            binary_path: None,
            extra_search_dirs: Vec::new(),
            command_timeout_secs: 60,
        }
    }
}

impl GitConfig {
    /// True when the git search differs from the default one
    pub fn has_locator_overrides(&self) -> bool {
        self.binary_path.is_some() || !self.extra_search_dirs.is_empty()
    }

    /// Watchdog timeout, `None` when disabled
    pub fn command_timeout(&self) -> Option<Duration> {
        match self.command_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

/// Refresh behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    /// Start a refresh cycle as soon as a repository is opened
    pub refresh_on_open: bool,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            refresh_on_open: true,
        }
    }
}
