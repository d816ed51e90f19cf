//! Repository Locator
//!
//! Finds the repository root by walking up from a starting directory until
//! one contains a `.git` directory.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Directory that marks a repository root
pub const REPOSITORY_MARKER: &str = ".git";

/// Find the closest ancestor of `start` (including `start` itself) that
/// contains a `.git` directory.
///
/// `start` may be relative; it is resolved against the current directory.
///
/// # Errors
///
/// - [`Error::DirectoryNotFound`] if `start` does not exist or is not a
///   directory
/// - [`Error::RepositoryNotFound`] if the filesystem root is reached without
///   finding the marker
pub fn locate_repository_root(start: &Path) -> Result<PathBuf> {
    let start_dir = fs::canonicalize(start)
        .ok()
        .filter(|dir| dir.is_dir())
        .ok_or_else(|| Error::DirectoryNotFound {
            path: start.to_path_buf(),
        })?;

    // `ancestors` ends once the parent of a directory is itself
    for dir in start_dir.ancestors() {
        if dir.join(REPOSITORY_MARKER).is_dir() {
            debug!("Repository root for {} is {}", start.display(), dir.display());
            return Ok(dir.to_path_buf());
        }
    }

    Err(Error::RepositoryNotFound {
        path: start.to_path_buf(),
    })
}
