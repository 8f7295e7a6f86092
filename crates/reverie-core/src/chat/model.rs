//! Chat message types.

use crate::dream::DreamId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Server-assigned message identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub i64);

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// A single message in a dream's chat thread.
///
/// Order is assigned by the service; the client keeps it exactly as returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: MessageId,
    pub dream_id: DreamId,
    pub role: ChatRole,
    pub content: String,
    #[serde(rename = "created_at", alias = "timestamp", with = "crate::timestamp")]
    pub timestamp: DateTime<Utc>,
}
