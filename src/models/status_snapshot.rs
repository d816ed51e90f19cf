//! Status Snapshot Model
//!
//! The four categorized file lists produced by one complete refresh cycle.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::models::FileRecord;

/// Which list a file record belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Changes recorded in the index
    Staged,
    /// Changes in the working tree that are not in the index
    Unstaged,
    /// Paths with merge conflicts
    Unmerged,
    /// Files git does not track and does not ignore
    Untracked,
}

impl Category {
    /// All categories in display order
    pub const ALL: [Category; 4] = [
        Category::Staged,
        Category::Unstaged,
        Category::Unmerged,
        Category::Untracked,
    ];

    /// Heading shown above the category in a tree view
    pub fn heading(&self) -> &'static str {
        match self {
            Category::Staged => "Selected to commit",
            Category::Unstaged => "Not to commit",
            Category::Unmerged => "Unmerged files",
            Category::Untracked => "Untracked files",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.heading())
    }
}

/// Categorized working-tree status of a repository
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    staged: Vec<FileRecord>,
    unstaged: Vec<FileRecord>,
    unmerged: Vec<FileRecord>,
    untracked: Vec<FileRecord>,
    /// When the snapshot was completed (None for the empty initial snapshot)
    refreshed_at: Option<DateTime<Local>>,
}

impl StatusSnapshot {
    /// Empty snapshot, used before the first refresh completes
    pub fn empty() -> Self {
        Self {
            staged: Vec::new(),
            unstaged: Vec::new(),
            unmerged: Vec::new(),
            untracked: Vec::new(),
            refreshed_at: None,
        }
    }

    pub fn files(&self, category: Category) -> &[FileRecord] {
        match category {
            Category::Staged => &self.staged,
            Category::Unstaged => &self.unstaged,
            Category::Unmerged => &self.unmerged,
            Category::Untracked => &self.untracked,
        }
    }

    pub fn staged(&self) -> &[FileRecord] {
        &self.staged
    }

    pub fn unstaged(&self) -> &[FileRecord] {
        &self.unstaged
    }

    pub fn unmerged(&self) -> &[FileRecord] {
        &self.unmerged
    }

    pub fn untracked(&self) -> &[FileRecord] {
        &self.untracked
    }

    pub fn refreshed_at(&self) -> Option<DateTime<Local>> {
        self.refreshed_at
    }

    /// Total number of records across all categories
    pub fn len(&self) -> usize {
        Category::ALL.iter().map(|c| self.files(*c).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Categories that currently hold at least one record, in display order
    pub fn non_empty_categories(&self) -> impl Iterator<Item = Category> + '_ {
        Category::ALL
            .into_iter()
            .filter(move |c| !self.files(*c).is_empty())
    }
}

impl Default for StatusSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

/// Ordered list that keeps at most one record per path
#[derive(Debug, Default)]
pub(crate) struct CategoryList {
    records: Vec<FileRecord>,
    seen: HashSet<String>,
}

impl CategoryList {
    /// Append `record` unless a record for the same path is already present.
    /// Returns whether the record was added.
    pub(crate) fn insert(&mut self, record: FileRecord) -> bool {
        if !self.seen.insert(record.path().to_string()) {
            return false;
        }
        self.records.push(record);
        true
    }

    pub(crate) fn contains(&self, path: &str) -> bool {
        self.seen.contains(path)
    }

    pub(crate) fn into_records(self) -> Vec<FileRecord> {
        self.records
    }
}

/// Accumulates the four lists during a refresh cycle
#[derive(Debug, Default)]
pub(crate) struct SnapshotBuilder {
    pub(crate) staged: CategoryList,
    pub(crate) unstaged: CategoryList,
    pub(crate) unmerged: CategoryList,
    pub(crate) untracked: CategoryList,
}

impl SnapshotBuilder {
    pub(crate) fn build(self) -> StatusSnapshot {
        let unmerged = self.unmerged;
        // Unmerged always wins over any other category.
        let unstaged = self
            .unstaged
            .into_records()
            .into_iter()
            .filter(|r| !unmerged.contains(r.path()))
            .collect();
        let staged = self
            .staged
            .into_records()
            .into_iter()
            .filter(|r| !unmerged.contains(r.path()))
            .collect();

        StatusSnapshot {
            staged,
            unstaged,
            unmerged: unmerged.into_records(),
            untracked: self.untracked.into_records(),
            refreshed_at: Some(Local::now()),
        }
    }
}
