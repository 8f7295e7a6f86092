//! Wires configuration, identity and the HTTP gateway into a journal.

use crate::journal::DreamJournal;
use crate::logging::init_tracing;
use anyhow::{Context, Result, anyhow};
use reverie_core::config::ClientConfig;
use reverie_infrastructure::{ConfigService, FileIdentityProvider, ReveriePaths};
use reverie_interaction::HttpDreamGateway;
use std::sync::Arc;
use tracing_appender::non_blocking::WorkerGuard;

/// Everything a front end needs after startup.
pub struct AppContext {
    pub config: ClientConfig,
    pub journal: Arc<DreamJournal>,
    /// Keeps the file log writer alive.
    pub log_guard: Option<WorkerGuard>,
}

/// Loads `config.toml` (defaults when missing) with environment overrides.
pub fn load_config(paths: &ReveriePaths) -> Result<ClientConfig> {
    let config_file = paths
        .config_file()
        .map_err(|e| anyhow!("Failed to resolve config path: {}", e))?;
    ConfigService::new(config_file)
        .load()
        .context("Failed to load client config")
}

/// Resolves the identity and builds a journal talking to `config.api_url`.
pub fn build_journal(paths: &ReveriePaths, config: &ClientConfig) -> Result<DreamJournal> {
    let identity_file = paths
        .identity_file()
        .map_err(|e| anyhow!("Failed to resolve identity path: {}", e))?;
    let identity_provider = FileIdentityProvider::new(identity_file);

    let gateway = HttpDreamGateway::from_config(config).context("Failed to create HTTP gateway")?;
    tracing::info!("[Bootstrap] Dream service at {}", gateway.base_url());

    Ok(DreamJournal::with_provider(
        &identity_provider,
        Arc::new(gateway),
    ))
}

/// Full startup: config, logging, identity, gateway.
///
/// File logging goes to the configured directory, or to the platform log
/// directory when none is set.
pub fn bootstrap(paths: &ReveriePaths) -> Result<AppContext> {
    let config = load_config(paths)?;

    let mut logging = config.logging.clone();
    if logging.directory.is_none() {
        let log_dir = paths
            .log_dir()
            .map_err(|e| anyhow!("Failed to resolve log directory: {}", e))?;
        logging.directory = Some(log_dir.to_string_lossy().to_string());
    }
    let log_guard = init_tracing(&logging)?;
    tracing::info!("[Bootstrap] Configuration loaded");

    let journal = build_journal(paths, &config)?;
    tracing::info!("[Bootstrap] Ready as {}", journal.identity());

    Ok(AppContext {
        config,
        journal: Arc::new(journal),
        log_guard,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use reverie_core::view::View;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_build_journal_persists_identity() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ReveriePaths::new(Some(temp_dir.path().to_path_buf()));
        let config = ClientConfig::default();

        let first = build_journal(&paths, &config).unwrap();
        let second = build_journal(&paths, &config).unwrap();

        assert!(first.identity().as_str().starts_with("user_"));
        assert_eq!(first.identity(), second.identity());
        assert!(paths.identity_file().unwrap().exists());
        assert_eq!(first.view().await, View::New);
    }

    #[test]
    fn test_build_journal_rejects_bad_url() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ReveriePaths::new(Some(temp_dir.path().to_path_buf()));
        let config = ClientConfig {
            api_url: "::not a url::".to_string(),
            ..ClientConfig::default()
        };

        assert!(build_journal(&paths, &config).is_err());
    }
}
