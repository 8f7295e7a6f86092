//! Remote gateway trait.
//!
//! The single seam every component calls through to reach the dream service.
//! Implementations are transport only: they map exchanges to requests,
//! non-success responses to [`ReverieError::RemoteUnavailable`] and
//! undecodable bodies to [`ReverieError::Serialization`]. Deciding what a
//! failure means for the user is left to the stores.
//!
//! [`ReverieError::RemoteUnavailable`]: crate::error::ReverieError::RemoteUnavailable
//! [`ReverieError::Serialization`]: crate::error::ReverieError::Serialization

use async_trait::async_trait;

use crate::chat::ChatMessage;
use crate::dream::{Dream, DreamId, NewDream, PatternAnalysis};
use crate::error::Result;
use crate::identity::Identity;

#[async_trait]
pub trait DreamGateway: Send + Sync {
    /// Lists all dreams for an identity, newest first as ordered by the service.
    async fn list_dreams(&self, identity: &Identity) -> Result<Vec<Dream>>;

    /// Fetches a single dream owned by `identity`.
    async fn get_dream(&self, identity: &Identity, dream_id: DreamId) -> Result<Dream>;

    /// Submits a dream for interpretation and returns the stored record.
    async fn create_dream(&self, request: &NewDream) -> Result<Dream>;

    async fn delete_dream(&self, dream_id: DreamId) -> Result<()>;

    /// Cross-dream pattern analysis for an identity.
    async fn pattern_analysis(&self, identity: &Identity) -> Result<PatternAnalysis>;

    /// Chat history for a dream in server order.
    async fn chat_history(&self, dream_id: DreamId) -> Result<Vec<ChatMessage>>;

    /// Sends a follow-up question. The reply is read back through
    /// [`chat_history`](Self::chat_history).
    async fn send_chat_message(&self, dream_id: DreamId, message: &str) -> Result<()>;

    /// Liveness probe of the service.
    async fn health(&self) -> Result<()>;
}
