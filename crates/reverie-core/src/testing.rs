//! In-memory gateway used by the unit tests of this crate.

use crate::chat::{ChatMessage, ChatRole, MessageId};
use crate::dream::{Dream, DreamId, NewDream, PatternAnalysis};
use crate::error::{ReverieError, Result};
use crate::gateway::DreamGateway;
use crate::identity::Identity;
use chrono::Utc;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

pub(crate) fn identity() -> Identity {
    Identity::new("user_test00001")
}

pub(crate) fn dream(id: i64, title: &str) -> Dream {
    Dream {
        id: DreamId(id),
        user_id: identity(),
        title: title.to_string(),
        description: format!("{} description", title),
        emotions: BTreeSet::new(),
        created_at: Utc::now(),
        interpretation: Some(format!("{} interpretation", title)),
        symbols: Vec::new(),
    }
}

/// Lets a test hold a mock call open until it decides to release it.
#[derive(Default)]
pub(crate) struct Gate {
    pub started: Notify,
    pub release: Notify,
}

impl Gate {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    async fn pass(&self) {
        self.started.notify_one();
        self.release.notified().await;
    }
}

#[derive(Default)]
pub(crate) struct MockGateway {
    dreams: Mutex<Vec<Dream>>,
    chat: Mutex<HashMap<DreamId, Vec<ChatMessage>>>,
    calls: Mutex<Vec<String>>,
    failing: Mutex<HashSet<&'static str>>,
    create_response: Mutex<Option<Result<Dream>>>,
    slow_list: Mutex<Option<(Arc<Gate>, Vec<Dream>)>>,
    slow_history: Mutex<Option<(Arc<Gate>, Vec<ChatMessage>)>>,
    slow_patterns: Mutex<Option<(Arc<Gate>, PatternAnalysis)>>,
    slow_get: Mutex<Option<(Arc<Gate>, Dream)>>,
    send_gate: Mutex<Option<Arc<Gate>>>,
    sent: Mutex<Vec<(DreamId, String)>>,
    next_id: AtomicI64,
}

impl MockGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            next_id: AtomicI64::new(100),
            ..Default::default()
        })
    }

    pub fn with_dreams(dreams: Vec<Dream>) -> Arc<Self> {
        let gateway = Self::new();
        *gateway.dreams.lock().unwrap() = dreams;
        gateway
    }

    pub fn set_dreams(&self, dreams: Vec<Dream>) {
        *self.dreams.lock().unwrap() = dreams;
    }

    pub fn set_history(&self, dream_id: DreamId, messages: Vec<ChatMessage>) {
        self.chat.lock().unwrap().insert(dream_id, messages);
    }

    pub fn fail(&self, operation: &'static str) {
        self.failing.lock().unwrap().insert(operation);
    }

    pub fn recover(&self, operation: &'static str) {
        self.failing.lock().unwrap().remove(operation);
    }

    pub fn respond_to_create(&self, response: Result<Dream>) {
        *self.create_response.lock().unwrap() = Some(response);
    }

    pub fn slow_list(&self, gate: Arc<Gate>, dreams: Vec<Dream>) {
        *self.slow_list.lock().unwrap() = Some((gate, dreams));
    }

    pub fn slow_history(&self, gate: Arc<Gate>, messages: Vec<ChatMessage>) {
        *self.slow_history.lock().unwrap() = Some((gate, messages));
    }

    pub fn slow_patterns(&self, gate: Arc<Gate>, patterns: PatternAnalysis) {
        *self.slow_patterns.lock().unwrap() = Some((gate, patterns));
    }

    pub fn slow_get(&self, gate: Arc<Gate>, dream: Dream) {
        *self.slow_get.lock().unwrap() = Some((gate, dream));
    }

    pub fn gate_sends(&self, gate: Arc<Gate>) {
        *self.send_gate.lock().unwrap() = Some(gate);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn sent(&self) -> Vec<(DreamId, String)> {
        self.sent.lock().unwrap().clone()
    }

    fn record(&self, operation: &'static str) -> Result<()> {
        self.calls.lock().unwrap().push(operation.to_string());
        if self.failing.lock().unwrap().contains(operation) {
            return Err(ReverieError::remote(format!("{} failed: 503", operation)));
        }
        Ok(())
    }

    fn message(&self, dream_id: DreamId, role: ChatRole, content: &str) -> ChatMessage {
        ChatMessage {
            id: MessageId(self.next_id.fetch_add(1, Ordering::SeqCst)),
            dream_id,
            role,
            content: content.to_string(),
            timestamp: Utc::now(),
        }
    }
}

#[async_trait::async_trait]
impl DreamGateway for MockGateway {
    async fn list_dreams(&self, _identity: &Identity) -> Result<Vec<Dream>> {
        self.record("list_dreams")?;
        let slow = self.slow_list.lock().unwrap().take();
        if let Some((gate, dreams)) = slow {
            gate.pass().await;
            return Ok(dreams);
        }
        Ok(self.dreams.lock().unwrap().clone())
    }

    async fn get_dream(&self, _identity: &Identity, dream_id: DreamId) -> Result<Dream> {
        self.record("get_dream")?;
        let slow = self.slow_get.lock().unwrap().take();
        if let Some((gate, dream)) = slow {
            gate.pass().await;
            return Ok(dream);
        }
        self.dreams
            .lock()
            .unwrap()
            .iter()
            .find(|dream| dream.id == dream_id)
            .cloned()
            .ok_or_else(|| ReverieError::remote("404 Not Found: Dream not found"))
    }

    async fn create_dream(&self, request: &NewDream) -> Result<Dream> {
        self.record("create_dream")?;
        if let Some(response) = self.create_response.lock().unwrap().take() {
            return response;
        }

        let dream = Dream {
            id: DreamId(self.next_id.fetch_add(1, Ordering::SeqCst)),
            user_id: request.user_id().clone(),
            title: request.title().to_string(),
            description: request.description().to_string(),
            emotions: request.emotions().clone(),
            created_at: Utc::now(),
            interpretation: Some(format!("Interpretation of {}", request.title())),
            symbols: Vec::new(),
        };
        self.dreams.lock().unwrap().insert(0, dream.clone());
        Ok(dream)
    }

    async fn delete_dream(&self, dream_id: DreamId) -> Result<()> {
        self.record("delete_dream")?;
        let mut dreams = self.dreams.lock().unwrap();
        let before = dreams.len();
        dreams.retain(|dream| dream.id != dream_id);
        if dreams.len() == before {
            return Err(ReverieError::remote("404 Not Found: Dream not found"));
        }
        Ok(())
    }

    async fn pattern_analysis(&self, _identity: &Identity) -> Result<PatternAnalysis> {
        self.record("pattern_analysis")?;
        let slow = self.slow_patterns.lock().unwrap().take();
        if let Some((gate, patterns)) = slow {
            gate.pass().await;
            return Ok(patterns);
        }
        let count = self.dreams.lock().unwrap().len();
        if count < 2 {
            return Ok(PatternAnalysis::InsufficientData {
                message: "Need at least 2 dreams to identify patterns".to_string(),
                dreams_count: Some(count),
            });
        }
        Ok(PatternAnalysis::Analysis {
            pattern_analysis: format!("Patterns across {} dreams", count),
            dreams_analyzed: Some(count),
        })
    }

    async fn chat_history(&self, dream_id: DreamId) -> Result<Vec<ChatMessage>> {
        self.record("chat_history")?;
        let slow = self.slow_history.lock().unwrap().take();
        if let Some((gate, messages)) = slow {
            gate.pass().await;
            return Ok(messages);
        }
        Ok(self
            .chat
            .lock()
            .unwrap()
            .get(&dream_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn send_chat_message(&self, dream_id: DreamId, message: &str) -> Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((dream_id, message.to_string()));
        let gate = self.send_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.pass().await;
        }
        self.record("send_chat_message")?;

        let user = self.message(dream_id, ChatRole::User, message);
        let reply = self.message(dream_id, ChatRole::Assistant, &format!("About '{}'", message));
        let mut chat = self.chat.lock().unwrap();
        let thread = chat.entry(dream_id).or_default();
        thread.push(user);
        thread.push(reply);
        Ok(())
    }

    async fn health(&self) -> Result<()> {
        self.record("health")
    }
}
