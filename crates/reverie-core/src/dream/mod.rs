//! Dream domain module.
//!
//! # Module Structure
//!
//! - `emotion`: the closed set of emotion tags (`Emotion`)
//! - `model`: dream records and the create request (`Dream`, `Symbol`, `NewDream`)
//! - `pattern`: cross-dream pattern result (`PatternAnalysis`)
//! - `deletion`: confirmation gate for irreversible deletes
//! - `store`: the client-side dream state (`DreamStore`)

mod deletion;
mod emotion;
mod model;
mod pattern;
mod store;


// Re-export public API
pub use deletion::{ConfirmedDeletion, DeletionRequest};
pub use emotion::Emotion;
pub use model::{Dream, DreamId, NewDream, REQUIRED_FIELDS_MESSAGE, Symbol};
pub use pattern::PatternAnalysis;
pub use store::DreamStore;
