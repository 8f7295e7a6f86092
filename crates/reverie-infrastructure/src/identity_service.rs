//! File-backed identity provider.
//!
//! Persists the client identity in `identity.toml`. The value is resolved
//! once per process and cached; persistence failures degrade to an
//! in-memory identity instead of failing.

use crate::paths::ReveriePaths;
use crate::storage::AtomicTomlFile;
use reverie_core::identity::{Identity, IdentityProvider};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::OnceLock;

/// On-disk shape of `identity.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct IdentityRecord {
    identity: Option<Identity>,
}

impl IdentityRecord {
    fn usable(&self) -> Option<&Identity> {
        self.identity.as_ref().filter(|identity| !identity.is_blank())
    }
}

/// Identity provider that stores the identity in a TOML file.
///
/// # Example
///
/// ```no_run
/// use reverie_core::IdentityProvider;
/// use reverie_infrastructure::FileIdentityProvider;
///
/// let provider = FileIdentityProvider::new_default().expect("config dir");
/// let identity = provider.get_or_create_identity();
/// println!("Dreams are stored under {}", identity);
/// ```
pub struct FileIdentityProvider {
    file: AtomicTomlFile<IdentityRecord>,
    cached: OnceLock<Identity>,
}

impl FileIdentityProvider {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: AtomicTomlFile::new(path),
            cached: OnceLock::new(),
        }
    }

    /// Uses the platform location from [`ReveriePaths`].
    pub fn new_default() -> reverie_core::Result<Self> {
        let path = ReveriePaths::new(None).identity_file()?;
        Ok(Self::new(path))
    }

    fn resolve(&self) -> Identity {
        match self.file.load() {
            Ok(Some(record)) => {
                if let Some(identity) = record.usable() {
                    tracing::debug!("Loaded identity from {:?}", self.file.path());
                    return identity.clone();
                }
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("Failed to read identity file: {}", e),
        }

        let generated = Identity::generate();
        let mut resolved = generated.clone();

        // Re-check under the lock: another process may have created it meanwhile.
        let result = self.file.update(IdentityRecord::default(), |record| {
            match record.usable() {
                Some(existing) => resolved = existing.clone(),
                None => record.identity = Some(generated.clone()),
            }
            Ok(())
        });

        match result {
            Ok(()) => tracing::info!("Using identity {}", resolved),
            Err(e) => {
                tracing::warn!(
                    "Failed to persist identity, keeping it in memory for this run: {}",
                    e
                );
                resolved = generated;
            }
        }

        resolved
    }
}

impl IdentityProvider for FileIdentityProvider {
    fn get_or_create_identity(&self) -> Identity {
        self.cached.get_or_init(|| self.resolve()).clone()
    }
}
