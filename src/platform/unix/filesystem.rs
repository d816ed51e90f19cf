//! Unix filesystem operations

use crate::platform::traits::FilesystemOps;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Install locations used by MacPorts and the git OS X installer, plus the
/// usual local prefix for source builds
const FALLBACK_DIRS: &[&str] = &["/opt/local/bin", "/usr/local/git/bin", "/usr/local/bin"];

pub struct UnixFilesystem;

impl UnixFilesystem {
    pub fn new() -> Self {
        Self
    }
}

impl FilesystemOps for UnixFilesystem {
    fn is_executable(&self, path: &Path) -> bool {
        if let Ok(metadata) = path.metadata() {
            if metadata.is_file() {
                // Check if file has executable permissions
                let permissions = metadata.permissions();
                return (permissions.mode() & 0o111) != 0;
            }
        }
        false
    }

    fn executable_name(&self, tool: &str) -> String {
        tool.to_string()
    }

    fn fallback_dirs(&self) -> Vec<PathBuf> {
        FALLBACK_DIRS.iter().map(PathBuf::from).collect()
    }
}
