//! Application layer: wires the dream journal components together.
//!
//! [`DreamJournal`] is the single entry point a renderer talks to. It owns the
//! store, chat session, draft and view controller, fires entry loads, and
//! routes failures into the last-error slot.

pub mod bootstrap;
pub mod journal;
pub mod logging;
pub mod snapshot;

pub use bootstrap::{AppContext, bootstrap};
pub use journal::DreamJournal;
pub use snapshot::JournalSnapshot;
