//! Confirmation gate for dream deletion.
//!
//! Deletion is irreversible, so [`DreamStore::delete_dream`](super::DreamStore::delete_dream)
//! only accepts a [`ConfirmedDeletion`], and the only way to get one is to
//! confirm a [`DeletionRequest`].

use super::model::DreamId;

/// A deletion the user has asked for but not yet confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a deletion request does nothing until confirmed"]
pub struct DeletionRequest {
    dream_id: DreamId,
}

impl DeletionRequest {
    pub fn new(dream_id: DreamId) -> Self {
        Self { dream_id }
    }

    pub fn dream_id(&self) -> DreamId {
        self.dream_id
    }

    /// The user accepted the prompt.
    pub fn confirm(self) -> ConfirmedDeletion {
        ConfirmedDeletion {
            dream_id: self.dream_id,
        }
    }
}

/// A deletion the user has explicitly confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmedDeletion {
    dream_id: DreamId,
}

impl ConfirmedDeletion {
    pub fn dream_id(&self) -> DreamId {
        self.dream_id
    }
}
