//! File Record Model
//!
//! A single path reported by git together with how it changed. Records are
//! produced by the status parser and never modified afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a path changed, as reported by a single git status-code character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum FileStatus {
    Added,
    Modified,
    Deleted,
    Copied,
    Renamed,
    /// Path has unresolved merge conflicts
    Unmerged,
    /// File type changed (regular file, symlink, submodule)
    TypeChanged,
    Untracked,
    /// Pairing broken by git's rename/copy detection
    Broken,
    /// Any status code not listed above
    #[default]
    Unknown,
}

impl FileStatus {
    /// Map a status-code character to its status
    pub fn from_code(code: char) -> Self {
        match code {
            'A' => FileStatus::Added,
            'M' => FileStatus::Modified,
            'D' => FileStatus::Deleted,
            'C' => FileStatus::Copied,
            'R' => FileStatus::Renamed,
            'U' => FileStatus::Unmerged,
            'T' => FileStatus::TypeChanged,
            'N' => FileStatus::Untracked,
            'B' => FileStatus::Broken,
            _ => FileStatus::Unknown,
        }
    }

    /// Short human label, used by text front-ends
    pub fn label(&self) -> &'static str {
        match self {
            FileStatus::Added => "new file",
            FileStatus::Modified => "modified",
            FileStatus::Deleted => "deleted",
            FileStatus::Copied => "copied",
            FileStatus::Renamed => "renamed",
            FileStatus::Unmerged => "unmerged",
            FileStatus::TypeChanged => "typechange",
            FileStatus::Untracked => "untracked",
            FileStatus::Broken => "broken",
            FileStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A path paired with its status
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileRecord {
    path: String,
    status: FileStatus,
}

impl FileRecord {
    pub fn new(path: impl Into<String>, status: FileStatus) -> Self {
        Self {
            path: path.into(),
            status,
        }
    }

    /// Path relative to the repository root, exactly as git printed it
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn status(&self) -> FileStatus {
        self.status
    }

    pub fn is_unmerged(&self) -> bool {
        self.status == FileStatus::Unmerged
    }
}

impl fmt::Display for FileRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<11} {}", format!("{}:", self.status), self.path)
    }
}
