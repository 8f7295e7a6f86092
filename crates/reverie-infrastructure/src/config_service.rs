//! Client configuration service.
//!
//! Reads `config.toml` and layers environment overrides on top.
//!
//! Priority: environment variables > config.toml > built-in defaults

use crate::paths::ReveriePaths;
use crate::storage::AtomicTomlFile;
use reverie_core::Result;
use reverie_core::config::ClientConfig;
use std::path::PathBuf;

pub const ENV_API_URL: &str = "REVERIE_API_URL";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "REVERIE_REQUEST_TIMEOUT_SECS";

pub struct ConfigService {
    file: AtomicTomlFile<ClientConfig>,
}

impl ConfigService {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: AtomicTomlFile::new(path),
        }
    }

    /// Uses the platform location from [`ReveriePaths`].
    pub fn new_default() -> Result<Self> {
        Ok(Self::new(ReveriePaths::new(None).config_file()?))
    }

    /// Loads the configuration with environment overrides applied.
    ///
    /// A missing file yields the defaults. A malformed file is an error.
    pub fn load(&self) -> Result<ClientConfig> {
        let mut config = match self.file.load()? {
            Some(config) => config,
            None => {
                tracing::debug!("No config at {:?}, using defaults", self.file.path());
                ClientConfig::default()
            }
        };
        apply_env_overrides(&mut config, |key| std::env::var(key).ok());
        Ok(config)
    }

    /// Writes `config` as-is (no environment overrides are persisted).
    pub fn save(&self, config: &ClientConfig) -> Result<()> {
        self.file.save(config)
    }
}

/// Applies overrides from `lookup` (normally the process environment).
pub fn apply_env_overrides<F>(config: &mut ClientConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_API_URL).filter(|url| !url.trim().is_empty()) {
        config.api_url = url;
    }

    if let Some(raw) = lookup(ENV_REQUEST_TIMEOUT_SECS) {
        match raw.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => config.request_timeout_secs = secs,
            _ => tracing::warn!(
                "Ignoring invalid {}={:?}, keeping {}s",
                ENV_REQUEST_TIMEOUT_SECS,
                raw,
                config.request_timeout_secs
            ),
        }
    }
}
