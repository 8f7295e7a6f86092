//! DreamJournal - the orchestrator a renderer drives.
//!
//! Composes the dream store, chat session, draft and view controller around
//! one identity. Every user intent goes through a method here; the method
//! calls the component, feeds the outcome to the view controller and runs
//! whatever entry load the transition asks for.

use crate::snapshot::JournalSnapshot;
use reverie_core::chat::{ChatMessage, ChatSessionManager};
use reverie_core::draft::{Draft, DraftManager};
use reverie_core::dream::{
    ConfirmedDeletion, DeletionRequest, Dream, DreamId, DreamStore, Emotion, PatternAnalysis,
};
use reverie_core::view::{EntryEffect, Navigation, Operation, Tab, View, ViewController};
use reverie_core::{DreamGateway, Identity, IdentityProvider, ReverieError, Result};
use std::sync::Arc;
use tokio::sync::RwLock;

/// View model of the dream journal client.
///
/// Errors from user-triggered operations are both returned and written to
/// the last-error slot; a success of any reporting operation clears the slot.
/// Chat-history load failures are only logged.
pub struct DreamJournal {
    identity: Identity,
    gateway: Arc<dyn DreamGateway>,
    store: DreamStore,
    chat: ChatSessionManager,
    draft: RwLock<DraftManager>,
    controller: RwLock<ViewController>,
}

impl DreamJournal {
    pub fn new(identity: Identity, gateway: Arc<dyn DreamGateway>) -> Self {
        tracing::info!("Dream journal opened for {}", identity);
        Self {
            identity,
            store: DreamStore::new(gateway.clone()),
            chat: ChatSessionManager::new(gateway.clone()),
            gateway,
            draft: RwLock::new(DraftManager::new()),
            controller: RwLock::new(ViewController::new()),
        }
    }

    /// Resolves the identity once through `provider`.
    pub fn with_provider(provider: &dyn IdentityProvider, gateway: Arc<dyn DreamGateway>) -> Self {
        Self::new(provider.get_or_create_identity(), gateway)
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn store(&self) -> &DreamStore {
        &self.store
    }

    pub fn chat(&self) -> &ChatSessionManager {
        &self.chat
    }

    // ============================================================================
    // Navigation
    // ============================================================================

    pub async fn view(&self) -> View {
        self.controller.read().await.view()
    }

    pub async fn select_tab(&self, tab: Tab) {
        self.navigate(Navigation::Tab(tab)).await;
    }

    /// Shows a dream picked from the journal list.
    pub async fn open_dream(&self, dream: Dream) {
        let dream_id = dream.id;
        self.store.select_dream(dream);
        self.navigate(Navigation::DreamOpened(dream_id)).await;
    }

    /// Opens the chat panel for the dream shown in `result`.
    pub async fn open_chat(&self) {
        self.navigate(Navigation::OpenChat).await;
    }

    pub async fn close_chat(&self) {
        self.navigate(Navigation::CloseChat).await;
    }

    async fn navigate(&self, event: Navigation) {
        let (effect, chat_open) = {
            let mut controller = self.controller.write().await;
            let effect = controller.apply(event);
            (effect, controller.is_chat_open())
        };

        if !chat_open && self.chat.active_dream().is_some() {
            self.chat.close_chat();
        }

        if let Some(effect) = effect {
            self.run_effect(effect).await;
        }
    }

    async fn run_effect(&self, effect: EntryEffect) {
        tracing::debug!("Running entry effect {:?}", effect);
        match effect {
            EntryEffect::LoadDreams => {
                let result = self.store.load_dreams(&self.identity).await;
                let _ = self.record(Operation::LoadDreams, result).await;
            }
            EntryEffect::LoadPatterns => {
                let result = self.store.load_patterns(&self.identity).await;
                let _ = self.record(Operation::LoadPatterns, result).await;
            }
            EntryEffect::LoadChat(dream_id) => {
                if let Err(e) = self.chat.open_chat(dream_id).await {
                    tracing::warn!("Failed to load chat history for dream {}: {}", dream_id, e);
                }
            }
        }
    }

    /// Routes an outcome into the last-error slot and passes it through.
    async fn record<T>(&self, operation: Operation, result: Result<T>) -> Result<T> {
        let mut controller = self.controller.write().await;
        match &result {
            Ok(_) => controller.clear_error(),
            Err(e) => controller.report(operation, e),
        }
        result
    }

    pub async fn dismiss_error(&self) {
        self.controller.write().await.dismiss_error();
    }

    pub async fn last_error(&self) -> Option<String> {
        self.controller.read().await.last_error().map(str::to_string)
    }

    // ============================================================================
    // Draft
    // ============================================================================

    pub async fn set_title(&self, title: impl Into<String>) {
        self.draft.write().await.set_title(title);
    }

    pub async fn set_description(&self, description: impl Into<String>) {
        self.draft.write().await.set_description(description);
    }

    pub async fn toggle_emotion(&self, emotion: Emotion) {
        self.draft.write().await.toggle_emotion(emotion);
    }

    pub async fn draft(&self) -> Draft {
        self.draft.read().await.draft().clone()
    }

    /// Submits the draft for interpretation.
    ///
    /// On success the draft is cleared and the view moves to the result of
    /// the new dream. On failure the draft is kept so the user can retry.
    pub async fn submit_draft(&self) -> Result<Dream> {
        let draft = self.draft().await;
        let result = self
            .store
            .create_dream(
                &self.identity,
                &draft.title,
                &draft.description,
                &draft.emotions,
            )
            .await;
        let dream = self.record(Operation::CreateDream, result).await?;

        self.draft.write().await.clear();
        self.navigate(Navigation::DreamCreated(dream.id)).await;
        Ok(dream)
    }

    // ============================================================================
    // Dreams
    // ============================================================================

    /// First step of deleting a dream. Nothing is removed until the returned
    /// request is confirmed and passed to [`Self::confirm_delete`].
    pub fn request_delete(&self, dream_id: DreamId) -> DeletionRequest {
        DeletionRequest::new(dream_id)
    }

    /// Deletes a confirmed dream.
    ///
    /// If the dream was selected the selection is dropped and a `result`
    /// view of it falls back to the journal, which reloads the list.
    pub async fn confirm_delete(&self, deletion: ConfirmedDeletion) -> Result<()> {
        let dream_id = deletion.dream_id();
        let result = self.store.delete_dream(deletion).await;
        self.record(Operation::DeleteDream, result).await?;

        if self.store.selected_id() == Some(dream_id) {
            self.store.clear_selection();
        }
        self.navigate(Navigation::DreamDeleted(dream_id)).await;
        Ok(())
    }

    pub async fn reload_dreams(&self) -> Result<Vec<Dream>> {
        let result = self.store.load_dreams(&self.identity).await;
        self.record(Operation::LoadDreams, result).await
    }

    pub async fn reload_patterns(&self) -> Result<PatternAnalysis> {
        let result = self.store.load_patterns(&self.identity).await;
        self.record(Operation::LoadPatterns, result).await
    }

    pub async fn refresh_selected_dream(&self) -> Result<Option<Dream>> {
        let result = self.store.refresh_selected(&self.identity).await;
        self.record(Operation::RefreshDream, result).await
    }

    // ============================================================================
    // Chat
    // ============================================================================

    pub fn set_chat_input(&self, text: impl Into<String>) {
        self.chat.set_input(text);
    }

    /// Sends the chat input for the dream whose chat panel is open.
    pub async fn send_chat(&self) -> Result<()> {
        let result = match self.chat.active_dream() {
            Some(dream_id) => self.chat.send_input(dream_id).await,
            None => Err(ReverieError::validation("Open a dream's chat first")),
        };
        self.record(Operation::SendMessage, result).await
    }

    pub fn chat_messages(&self) -> Vec<ChatMessage> {
        self.chat.messages()
    }

    // ============================================================================
    // Service
    // ============================================================================

    pub async fn check_service(&self) -> Result<()> {
        let result = self
            .gateway
            .health()
            .await
            .map_err(ReverieError::into_remote);
        self.record(Operation::CheckService, result).await
    }

    /// Copies the visible state for a renderer.
    pub async fn snapshot(&self) -> JournalSnapshot {
        let (view, chat_open, last_error) = {
            let controller = self.controller.read().await;
            (
                controller.view(),
                controller.is_chat_open(),
                controller.last_error().map(str::to_string),
            )
        };
        let draft = self.draft().await;
        let is_sending = view
            .dream_id()
            .is_some_and(|dream_id| self.chat.is_sending(dream_id));

        JournalSnapshot {
            view,
            chat_open,
            last_error,
            draft,
            dreams: self.store.dreams(),
            selected_dream: self.store.selected_dream(),
            patterns: self.store.patterns(),
            chat_messages: self.chat.messages(),
            chat_input: self.chat.input(),
            is_loading: self.store.is_loading(),
            is_sending,
        }
    }
}
