//! Unified path management for reverie files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/reverie/           # Config directory (platform config dir)
//! ├── config.toml              # Client configuration
//! └── identity.toml            # Persisted client identity
//!
//! ~/.local/share/reverie/      # Data directory
//! └── logs/                    # Application logs
//!     └── reverie.log.YYYY-MM-DD
//! ```
//!
//! A base directory can be injected to keep tests away from the real home.

use reverie_core::ReverieError;
use std::path::PathBuf;

const APP_DIR: &str = "reverie";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// The platform directory could not be determined.
    PlatformDirNotFound(&'static str),
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::PlatformDirNotFound(kind) => {
                write!(f, "Cannot find platform {} directory", kind)
            }
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for ReverieError {
    fn from(err: PathError) -> Self {
        ReverieError::config(err.to_string())
    }
}

/// Resolves every file location used by the client.
#[derive(Debug, Clone, Default)]
pub struct ReveriePaths {
    base: Option<PathBuf>,
}

impl ReveriePaths {
    /// `None` uses the platform directories; `Some(dir)` roots everything at `dir`.
    pub fn new(base: Option<PathBuf>) -> Self {
        Self { base }
    }

    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or(PathError::PlatformDirNotFound("config")),
        }
    }

    pub fn data_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.clone()),
            None => dirs::data_local_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or(PathError::PlatformDirNotFound("data")),
        }
    }

    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    pub fn identity_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("identity.toml"))
    }

    pub fn log_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.data_dir()?.join("logs"))
    }
}
