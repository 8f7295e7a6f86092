//! Identity domain module.
//!
//! - `model`: the opaque per-installation identifier (`Identity`)
//! - `provider`: the `IdentityProvider` trait and an in-memory implementation
//!
//! The file-backed provider lives in `reverie-infrastructure`.

mod model;
mod provider;

// Re-export public API
pub use model::{IDENTITY_PREFIX, IDENTITY_SUFFIX_LEN, Identity};
pub use provider::{IdentityProvider, StaticIdentityProvider};
