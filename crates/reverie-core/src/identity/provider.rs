//! Identity provider trait.

use super::model::Identity;

/// Produces and persists the stable client identifier.
///
/// There is no error path: when persistence is unavailable an implementation
/// must still hand back a usable identifier for the lifetime of the process.
/// Every other component receives the resulting [`Identity`] as a parameter
/// and never reads storage itself.
pub trait IdentityProvider: Send + Sync {
    /// Returns the persisted identity, creating and persisting one on first use.
    fn get_or_create_identity(&self) -> Identity;
}

/// Provider that always returns a fixed identity.
///
/// Useful for tests and for hosts that manage identity themselves.
#[derive(Debug, Clone)]
pub struct StaticIdentityProvider {
    identity: Identity,
}

impl StaticIdentityProvider {
    pub fn new(identity: Identity) -> Self {
        Self { identity }
    }
}

impl IdentityProvider for StaticIdentityProvider {
    fn get_or_create_identity(&self) -> Identity {
        self.identity.clone()
    }
}
