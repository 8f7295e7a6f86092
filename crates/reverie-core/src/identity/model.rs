//! Identity domain model.

use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix of every generated identity.
pub const IDENTITY_PREFIX: &str = "user_";

/// Number of random characters after the prefix.
pub const IDENTITY_SUFFIX_LEN: usize = 9;

/// Opaque client identifier used as the partition key for all dream queries.
///
/// Generated once per installation and never regenerated after it has been
/// persisted. Read-only after initialization, so clones can be handed to
/// every component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    /// Wraps an existing identifier, e.g. one read back from storage.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Synthesizes a fresh identifier: `user_` plus lowercase alphanumerics.
    pub fn generate() -> Self {
        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(IDENTITY_SUFFIX_LEN)
            .map(|b| (b as char).to_ascii_lowercase())
            .collect();
        Self(format!("{}{}", IDENTITY_PREFIX, suffix))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the stored value is usable as an identity.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
