//! Navigation state machine.
//!
//! - `controller`: views, navigation events, entry effects and the
//!   last-error slot (`ViewController`)

mod controller;

// Re-export public API
pub use controller::{EntryEffect, Navigation, Operation, Tab, View, ViewController};
