//! Domain model and client-side state components for the Reverie dream journal.
//!
//! The crate holds no I/O. Everything remote goes through [`DreamGateway`],
//! everything persisted goes through [`IdentityProvider`].

pub mod chat;
pub mod config;
pub mod draft;
pub mod dream;
pub mod error;
pub mod gateway;
pub mod identity;
pub mod sequence;
pub mod timestamp;
pub mod view;

// Re-export common types
pub use error::{ReverieError, Result};
pub use gateway::DreamGateway;
pub use identity::{Identity, IdentityProvider};

#[cfg(test)]
pub(crate) mod testing;
