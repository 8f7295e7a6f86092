//! Chat domain module.
//!
//! Follow-up conversation anchored to one dream's interpretation.
//!
//! - `model`: message types (`ChatMessage`, `ChatRole`)
//! - `manager`: per-dream history and single-flight send (`ChatSessionManager`)

mod manager;
mod model;

// Re-export public API
pub use manager::{ChatSessionManager, EMPTY_MESSAGE};
pub use model::{ChatMessage, ChatRole, MessageId};
