use reverie_core::chat::ChatMessage;
use reverie_core::draft::Draft;
use reverie_core::dream::{Dream, PatternAnalysis};
use reverie_core::view::View;
use serde::Serialize;

/// Everything a renderer needs to draw one frame of the journal.
///
/// A plain copy: holding it does not block the journal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JournalSnapshot {
    pub view: View,
    pub chat_open: bool,
    pub last_error: Option<String>,
    pub draft: Draft,
    pub dreams: Vec<Dream>,
    pub selected_dream: Option<Dream>,
    pub patterns: Option<PatternAnalysis>,
    pub chat_messages: Vec<ChatMessage>,
    pub chat_input: String,
    /// A store request (list, patterns, create, delete, refresh) is running.
    pub is_loading: bool,
    /// A chat message for the shown dream is awaiting its reply.
    pub is_sending: bool,
}

impl JournalSnapshot {
    /// Interpretation of the dream shown in the `result` view.
    pub fn shown_interpretation(&self) -> Option<&str> {
        let shown = self.view.dream_id()?;
        self.selected_dream
            .as_ref()
            .filter(|dream| dream.id == shown)
            .and_then(Dream::interpretation_text)
    }
}
