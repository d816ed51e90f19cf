//! Status Parser
//!
//! Turns the machine-readable output of git status queries into
//! [`FileRecord`]s.
//!
//! `diff --name-status` prints one `<code><TAB><path>` line per file;
//! `ls-files --others` prints bare paths. Lines that do not follow the format
//! are skipped rather than reported.

use crate::models::{FileRecord, FileStatus};

/// Parse `<code><TAB><path>` lines.
///
/// Empty lines are ignored. Lines shorter than three characters, or whose
/// second character is not a tab, are skipped.
pub fn parse_name_status(raw: &str) -> Vec<FileRecord> {
    raw.split('\n')
        .filter(|line| !line.is_empty())
        .filter_map(parse_status_line)
        .collect()
}

/// Parse bare path lines; every path is reported as untracked.
pub fn parse_name_only(raw: &str) -> Vec<FileRecord> {
    raw.split('\n')
        .filter(|line| !line.is_empty())
        .map(|path| FileRecord::new(path, FileStatus::Untracked))
        .collect()
}

fn parse_status_line(line: &str) -> Option<FileRecord> {
    let mut chars = line.chars();
    let code = chars.next()?;
    let separator = chars.next();
    let path = chars.as_str();

    if separator != Some('\t') || path.is_empty() {
        trace!("Skipping malformed status line: {:?}", line);
        return None;
    }

    Some(FileRecord::new(path, FileStatus::from_code(code)))
}
