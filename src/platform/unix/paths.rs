//! Unix path operations

use crate::error::{Error, Result};
use crate::platform::traits::PathOps;
use std::env;
use std::path::PathBuf;

pub struct UnixPaths;

impl UnixPaths {
    pub fn new() -> Self {
        Self
    }

    /// `$XDG_CONFIG_HOME` counts only when it is an absolute path
    fn xdg_config_home() -> Option<PathBuf> {
        env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .filter(|dir| dir.is_absolute())
    }
}

impl PathOps for UnixPaths {
    fn app_config_dir(&self, app: &str) -> Result<PathBuf> {
        Self::xdg_config_home()
            .or_else(dirs::config_dir)
            .or_else(|| self.home_dir().map(|home| home.join(".config")))
            .map(|base| base.join(app))
            .ok_or_else(|| {
                Error::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "Could not determine config directory",
                ))
            })
    }

    fn home_dir(&self) -> Option<PathBuf> {
        dirs::home_dir()
    }
}
