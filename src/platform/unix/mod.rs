//! Unix-specific platform implementations

mod filesystem;
mod paths;

pub use filesystem::UnixFilesystem;
pub use paths::UnixPaths;
