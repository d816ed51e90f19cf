//! Binary Locator
//!
//! Resolves the path of the git executable once and caches it for the rest
//! of the run. The cache only changes through [`BinaryLocator::invalidate`].

use once_cell::sync::OnceCell;
use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::config::GitConfig;
use crate::error::{Error, Result};
use crate::platform::Platform;

/// Name of the external tool
pub const GIT_TOOL: &str = "git";

static GLOBAL: OnceCell<Arc<BinaryLocator>> = OnceCell::new();

/// Finds and caches the git executable
#[derive(Debug)]
pub struct BinaryLocator {
    tool: String,
    /// Fixed path that bypasses the search
    explicit: Option<PathBuf>,
    /// Searched after `PATH` and the platform fallbacks
    extra_dirs: Vec<PathBuf>,
    /// Replaces the `PATH` environment variable when set
    path_var: Option<OsString>,
    resolved: RwLock<OnceCell<PathBuf>>,
}

impl BinaryLocator {
    /// Locator that searches `PATH` and the platform fallbacks for `tool`
    pub fn new(tool: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            explicit: None,
            extra_dirs: Vec::new(),
            path_var: None,
            resolved: RwLock::new(OnceCell::new()),
        }
    }

    /// Locator that always resolves to `path` (as long as it is executable)
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            explicit: Some(path.into()),
            ..Self::new(GIT_TOOL)
        }
    }

    /// Locator configured from the `[git]` section
    pub fn from_config(config: &GitConfig) -> Self {
        Self {
            explicit: config.binary_path.clone(),
            extra_dirs: config.extra_search_dirs.clone(),
            ..Self::new(GIT_TOOL)
        }
    }

    /// Search these directories after the platform fallbacks
    pub fn with_extra_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.extra_dirs = dirs;
        self
    }

    /// Use `value` instead of the process's `PATH`
    pub fn with_path_var(mut self, value: impl Into<OsString>) -> Self {
        self.path_var = Some(value.into());
        self
    }

    /// Install the process-wide locator. The first installed locator wins;
    /// returns the one in effect.
    pub fn install_global(locator: BinaryLocator) -> Arc<BinaryLocator> {
        let candidate = Arc::new(locator);
        let installed = Arc::clone(GLOBAL.get_or_init(|| Arc::clone(&candidate)));
        if Arc::ptr_eq(&installed, &candidate) {
            debug!("Process-wide git locator: {:?}", installed.explicit);
        } else if !installed.same_search(&candidate) {
            warn!(
                "A process-wide {} locator is already installed ({:?}); ignoring {:?}",
                installed.tool, installed.explicit, candidate.explicit
            );
        }
        installed
    }

    /// The process-wide locator, searching for `git` unless another locator
    /// was installed first
    pub fn global() -> Arc<BinaryLocator> {
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(BinaryLocator::new(GIT_TOOL))))
    }

    /// True when both locators would run the same search
    pub fn same_search(&self, other: &BinaryLocator) -> bool {
        self.tool == other.tool
            && self.explicit == other.explicit
            && self.extra_dirs == other.extra_dirs
            && self.path_var == other.path_var
    }

    /// True when `from_config(config)` would run the same search
    pub fn matches_config(&self, config: &GitConfig) -> bool {
        self.same_search(&Self::from_config(config))
    }

    /// Path of the executable, searched on first call and cached afterwards.
    ///
    /// Concurrent first calls are serialized by the cell; only one search
    /// runs.
    pub fn resolve(&self) -> Result<PathBuf> {
        let cell = self
            .resolved
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        cell.get_or_try_init(|| self.search()).cloned()
    }

    /// Cached path, without searching
    pub fn cached(&self) -> Option<PathBuf> {
        self.resolved
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get()
            .cloned()
    }

    /// Forget the cached path; the next `resolve` searches again
    pub fn invalidate(&self) {
        let mut cell = self
            .resolved
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if cell.take().is_some() {
            debug!("Invalidated cached {} path", self.tool);
        }
    }

    fn search(&self) -> Result<PathBuf> {
        let fs = Platform::filesystem();

        if let Some(explicit) = &self.explicit {
            if fs.is_executable(explicit) {
                info!("Using configured {} at {}", self.tool, explicit.display());
                return Ok(absolute(explicit));
            }
            error!(
                "Configured {} path {} is not an executable file",
                self.tool,
                explicit.display()
            );
            return Err(self.not_found());
        }

        let binary_name = fs.executable_name(&self.tool);
        let found = self
            .candidate_dirs(fs.fallback_dirs())
            .into_iter()
            .map(|dir| dir.join(&binary_name))
            .find(|candidate| fs.is_executable(candidate));

        match found {
            Some(path) => {
                let path = absolute(&path);
                info!("Found {} at {}", self.tool, path.display());
                Ok(path)
            }
            None => {
                error!("Cannot find {} executable", self.tool);
                Err(self.not_found())
            }
        }
    }

    /// `PATH` entries, then fallbacks not already listed, then extra dirs
    fn candidate_dirs(&self, fallbacks: Vec<PathBuf>) -> Vec<PathBuf> {
        let path_var = self.path_var.clone().or_else(|| env::var_os("PATH"));
        let mut dirs: Vec<PathBuf> = path_var
            .map(|value| env::split_paths(&value).collect())
            .unwrap_or_default();

        for dir in fallbacks.into_iter().chain(self.extra_dirs.iter().cloned()) {
            if !dirs.contains(&dir) {
                dirs.push(dir);
            }
        }

        dirs.retain(|dir| !dir.as_os_str().is_empty());
        dirs
    }

    fn not_found(&self) -> Error {
        Error::BinaryNotFound {
            name: self.tool.clone(),
        }
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
