//! Windows filesystem operations

use crate::platform::traits::FilesystemOps;
use std::path::{Path, PathBuf};

const FALLBACK_DIRS: &[&str] = &["C:\\Program Files\\Git\\bin", "C:\\Program Files\\Git\\cmd"];

pub struct WindowsFilesystem;

impl WindowsFilesystem {
    pub fn new() -> Self {
        Self
    }
}

impl FilesystemOps for WindowsFilesystem {
    fn is_executable(&self, path: &Path) -> bool {
        if !path.is_file() {
            return false;
        }
        // On Windows, check for common executable extensions
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            matches!(ext.to_lowercase().as_str(), "exe" | "bat" | "cmd" | "com")
        } else {
            false
        }
    }

    fn executable_name(&self, tool: &str) -> String {
        format!("{}.exe", tool)
    }

    fn fallback_dirs(&self) -> Vec<PathBuf> {
        FALLBACK_DIRS.iter().map(PathBuf::from).collect()
    }
}
