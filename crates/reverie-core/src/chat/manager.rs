use super::model::ChatMessage;
use crate::dream::DreamId;
use crate::error::{ReverieError, Result};
use crate::gateway::DreamGateway;
use crate::sequence::{AppliedSequence, RequestSequencer};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Message shown when a blank chat message is submitted.
pub const EMPTY_MESSAGE: &str = "Message cannot be empty";

/// Holds the chat thread of the dream currently open in the chat panel.
///
/// `ChatSessionManager` is responsible for:
/// - Loading the history of the active dream (wholesale replacement)
/// - Sending follow-up messages, at most one in flight per dream
/// - Owning the chat input buffer
///
/// The held history is always exactly what the service returned last. No
/// message is appended locally before the service confirms it; after a send
/// the whole thread is fetched again so the assistant reply arrives in the
/// same refresh.
pub struct ChatSessionManager {
    gateway: Arc<dyn DreamGateway>,
    state: Mutex<ChatState>,
    history_requests: RequestSequencer,
}

#[derive(Default)]
struct ChatState {
    active_dream: Option<DreamId>,
    messages: Vec<ChatMessage>,
    input: String,
    sending: HashSet<DreamId>,
    history_applied: AppliedSequence,
}

/// Marks a dream as having a send in flight until dropped.
struct SendSlot<'a> {
    state: &'a Mutex<ChatState>,
    dream_id: DreamId,
}

impl Drop for SendSlot<'_> {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.sending.remove(&self.dream_id);
    }
}

impl ChatSessionManager {
    pub fn new(gateway: Arc<dyn DreamGateway>) -> Self {
        Self {
            gateway,
            state: Mutex::new(ChatState::default()),
            history_requests: RequestSequencer::new(),
        }
    }

    fn state(&self) -> MutexGuard<'_, ChatState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Makes `dream_id` the active chat dream and loads its history.
    ///
    /// Switching to another dream drops the previous thread immediately; it
    /// is fetched again if that dream is reopened.
    ///
    /// # Errors
    ///
    /// `RemoteUnavailable` if the history cannot be fetched. The dream stays
    /// active with whatever history was held (empty after a switch).
    pub async fn open_chat(&self, dream_id: DreamId) -> Result<Vec<ChatMessage>> {
        {
            let mut state = self.state();
            if state.active_dream != Some(dream_id) {
                tracing::debug!("Switching chat to dream {}", dream_id);
                state.active_dream = Some(dream_id);
                state.messages.clear();
                state
                    .history_applied
                    .supersede(self.history_requests.last_issued());
            }
        }

        self.fetch_history(dream_id).await
    }

    /// Closes the chat panel and forgets the held thread.
    pub fn close_chat(&self) {
        let mut state = self.state();
        state.active_dream = None;
        state.messages.clear();
        state
            .history_applied
            .supersede(self.history_requests.last_issued());
    }

    /// Sends a follow-up question about `dream_id`.
    ///
    /// The input buffer is cleared as soon as the send starts, whatever the
    /// outcome. A failed send does not restore it.
    ///
    /// # Errors
    ///
    /// - `Validation` if `text` is blank; nothing is sent and the buffer is kept.
    /// - `Busy` if a send for this dream is still pending; the pending send
    ///   is not affected.
    /// - `RemoteUnavailable` if the service rejects the message.
    pub async fn send_message(&self, dream_id: DreamId, text: &str) -> Result<()> {
        if text.trim().is_empty() {
            return Err(ReverieError::validation(EMPTY_MESSAGE));
        }

        let _slot = {
            let mut state = self.state();
            if !state.sending.insert(dream_id) {
                tracing::debug!("Rejected concurrent send for dream {}", dream_id);
                return Err(ReverieError::busy(dream_id.0));
            }
            state.input.clear();
            SendSlot {
                state: &self.state,
                dream_id,
            }
        };

        if let Err(e) = self.gateway.send_chat_message(dream_id, text).await {
            tracing::warn!("Failed to send chat message for dream {}: {}", dream_id, e);
            return Err(e.into_remote());
        }

        // The send itself succeeded; a failed refresh only leaves the old thread visible.
        if let Err(e) = self.fetch_history(dream_id).await {
            tracing::warn!("Failed to refresh chat history for dream {}: {}", dream_id, e);
        }

        Ok(())
    }

    /// Sends the current contents of the input buffer.
    pub async fn send_input(&self, dream_id: DreamId) -> Result<()> {
        let text = self.input();
        self.send_message(dream_id, &text).await
    }

    async fn fetch_history(&self, dream_id: DreamId) -> Result<Vec<ChatMessage>> {
        let ticket = self.history_requests.issue();

        let messages = self
            .gateway
            .chat_history(dream_id)
            .await
            .map_err(ReverieError::into_remote)?;

        let mut state = self.state();
        if state.active_dream == Some(dream_id) && state.history_applied.try_advance(ticket) {
            state.messages = messages.clone();
            tracing::debug!("Applied chat history for dream {} ({} messages)", dream_id, messages.len());
        } else {
            tracing::debug!("Discarded stale chat history for dream {}", dream_id);
        }

        Ok(messages)
    }

    // ============================================================================
    // Input buffer and accessors
    // ============================================================================

    pub fn set_input(&self, text: impl Into<String>) {
        self.state().input = text.into();
    }

    pub fn input(&self) -> String {
        self.state().input.clone()
    }

    pub fn active_dream(&self) -> Option<DreamId> {
        self.state().active_dream
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.state().messages.clone()
    }

    pub fn is_sending(&self, dream_id: DreamId) -> bool {
        self.state().sending.contains(&dream_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::{ChatRole, MessageId};
    use crate::testing::{Gate, MockGateway};
    use chrono::Utc;

    fn message(id: i64, dream_id: i64, role: ChatRole, content: &str) -> ChatMessage {
        ChatMessage {
            id: MessageId(id),
            dream_id: DreamId(dream_id),
            role,
            content: content.to_string(),
            timestamp: Utc::now(),
        }
    }

    fn contents(messages: &[ChatMessage]) -> Vec<String> {
        messages.iter().map(|m| m.content.clone()).collect()
    }

    #[tokio::test]
    async fn test_open_chat_keeps_server_order() {
        let gateway = MockGateway::new();
        gateway.set_history(
            DreamId(1),
            vec![
                message(9, 1, ChatRole::User, "first"),
                message(3, 1, ChatRole::Assistant, "second"),
                message(3, 1, ChatRole::Assistant, "second"),
            ],
        );
        let manager = ChatSessionManager::new(gateway.clone());

        let history = manager.open_chat(DreamId(1)).await.unwrap();

        assert_eq!(contents(&history), vec!["first", "second", "second"]);
        assert_eq!(manager.messages(), history);
        assert_eq!(manager.active_dream(), Some(DreamId(1)));
    }

    #[tokio::test]
    async fn test_switching_dream_discards_history() {
        let gateway = MockGateway::new();
        gateway.set_history(DreamId(1), vec![message(1, 1, ChatRole::User, "one")]);
        let manager = ChatSessionManager::new(gateway.clone());
        manager.open_chat(DreamId(1)).await.unwrap();

        gateway.fail("chat_history");
        let err = manager.open_chat(DreamId(2)).await.unwrap_err();

        assert!(err.is_remote_unavailable());
        assert_eq!(manager.active_dream(), Some(DreamId(2)));
        assert!(manager.messages().is_empty());
    }

    #[tokio::test]
    async fn test_late_history_for_previous_dream_is_discarded() {
        let gateway = MockGateway::new();
        gateway.set_history(DreamId(2), vec![message(5, 2, ChatRole::User, "two")]);
        let gate = Gate::new();
        gateway.slow_history(gate.clone(), vec![message(1, 1, ChatRole::User, "one")]);
        let manager = Arc::new(ChatSessionManager::new(gateway.clone()));

        let slow_manager = manager.clone();
        let slow = tokio::spawn(async move { slow_manager.open_chat(DreamId(1)).await });
        gate.started.notified().await;

        manager.open_chat(DreamId(2)).await.unwrap();
        gate.release.notify_one();
        slow.await.unwrap().unwrap();

        assert_eq!(contents(&manager.messages()), vec!["two"]);
    }

    #[tokio::test]
    async fn test_send_refetches_history_with_reply() {
        let gateway = MockGateway::new();
        let manager = ChatSessionManager::new(gateway.clone());
        manager.open_chat(DreamId(1)).await.unwrap();
        manager.set_input("Why mountains?");

        manager.send_input(DreamId(1)).await.unwrap();

        assert_eq!(manager.input(), "");
        let roles: Vec<ChatRole> = manager.messages().iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![ChatRole::User, ChatRole::Assistant]);
        assert_eq!(manager.messages()[0].content, "Why mountains?");
        assert!(!manager.is_sending(DreamId(1)));
    }

    #[tokio::test]
    async fn test_send_failure_keeps_input_cleared() {
        let gateway = MockGateway::new();
        gateway.set_history(DreamId(1), vec![message(1, 1, ChatRole::User, "earlier")]);
        let manager = ChatSessionManager::new(gateway.clone());
        manager.open_chat(DreamId(1)).await.unwrap();
        manager.set_input("Lost question");
        gateway.fail("send_chat_message");

        let err = manager.send_input(DreamId(1)).await.unwrap_err();

        assert!(err.is_remote_unavailable());
        assert_eq!(manager.input(), "");
        assert_eq!(contents(&manager.messages()), vec!["earlier"]);
        assert!(!manager.is_sending(DreamId(1)));
    }

    #[tokio::test]
    async fn test_send_succeeds_when_refresh_fails() {
        let gateway = MockGateway::new();
        let manager = ChatSessionManager::new(gateway.clone());
        manager.open_chat(DreamId(1)).await.unwrap();
        gateway.fail("chat_history");

        manager.send_message(DreamId(1), "Still delivered").await.unwrap();

        assert_eq!(gateway.sent(), vec![(DreamId(1), "Still delivered".to_string())]);
        assert!(manager.messages().is_empty());
    }

    #[tokio::test]
    async fn test_second_send_while_pending_is_busy() {
        let gateway = MockGateway::new();
        let gate = Gate::new();
        gateway.gate_sends(gate.clone());
        let manager = Arc::new(ChatSessionManager::new(gateway.clone()));
        manager.open_chat(DreamId(1)).await.unwrap();

        let pending_manager = manager.clone();
        let pending =
            tokio::spawn(async move { pending_manager.send_message(DreamId(1), "first").await });
        gate.started.notified().await;
        assert!(manager.is_sending(DreamId(1)));

        manager.set_input("second");
        let err = manager.send_input(DreamId(1)).await.unwrap_err();
        assert!(err.is_busy());
        assert_eq!(manager.input(), "second");

        gate.release.notify_one();
        pending.await.unwrap().unwrap();

        assert_eq!(gateway.sent(), vec![(DreamId(1), "first".to_string())]);
        assert_eq!(manager.messages()[0].content, "first");
    }

    #[tokio::test]
    async fn test_single_flight_is_per_dream() {
        let gateway = MockGateway::new();
        let gate = Gate::new();
        gateway.gate_sends(gate.clone());
        let manager = Arc::new(ChatSessionManager::new(gateway.clone()));

        let pending_manager = manager.clone();
        let pending =
            tokio::spawn(async move { pending_manager.send_message(DreamId(1), "first").await });
        gate.started.notified().await;

        manager.send_message(DreamId(2), "other dream").await.unwrap();

        gate.release.notify_one();
        pending.await.unwrap().unwrap();
        assert_eq!(gateway.sent().len(), 2);
    }

    #[tokio::test]
    async fn test_blank_message_is_rejected_locally() {
        let gateway = MockGateway::new();
        let manager = ChatSessionManager::new(gateway.clone());
        manager.set_input("   ");

        let err = manager.send_input(DreamId(1)).await.unwrap_err();

        assert!(err.is_validation());
        assert_eq!(manager.input(), "   ");
        assert!(gateway.sent().is_empty());
    }

    #[tokio::test]
    async fn test_close_chat() {
        let gateway = MockGateway::new();
        gateway.set_history(DreamId(1), vec![message(1, 1, ChatRole::User, "one")]);
        let manager = ChatSessionManager::new(gateway.clone());
        manager.open_chat(DreamId(1)).await.unwrap();

        manager.close_chat();

        assert!(manager.active_dream().is_none());
        assert!(manager.messages().is_empty());
    }
}
