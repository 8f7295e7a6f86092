//! The in-progress "new dream" form.
//!
//! Pure local state. Validation happens when the draft is submitted through
//! the dream store, not here.

use crate::dream::Emotion;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Unsaved dream form contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    pub title: String,
    pub description: String,
    pub emotions: BTreeSet<Emotion>,
}

impl Draft {
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.description.is_empty() && self.emotions.is_empty()
    }
}

/// Holds the draft while the `new` view is in use.
#[derive(Debug, Default)]
pub struct DraftManager {
    draft: Draft,
}

impl DraftManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.draft.title = title.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.draft.description = description.into();
    }

    /// Adds the emotion if absent, removes it if present.
    pub fn toggle_emotion(&mut self, emotion: Emotion) {
        if !self.draft.emotions.remove(&emotion) {
            self.draft.emotions.insert(emotion);
        }
    }

    pub fn clear(&mut self) {
        self.draft = Draft::default();
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }
}
