use super::deletion::ConfirmedDeletion;
use super::emotion::Emotion;
use super::model::{Dream, DreamId, NewDream};
use super::pattern::PatternAnalysis;
use crate::error::{ReverieError, Result};
use crate::gateway::DreamGateway;
use crate::identity::Identity;
use crate::sequence::{AppliedSequence, RequestSequencer};
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Client-side view of the user's dreams.
///
/// `DreamStore` owns:
/// - the dream list for the current identity
/// - the currently selected dream
/// - the latest pattern analysis
///
/// List, pattern and selection loads are last-write-wins per request
/// sequence: a response is applied only if no newer request of the same
/// kind has already been applied.
pub struct DreamStore {
    gateway: Arc<dyn DreamGateway>,
    state: Mutex<DreamStoreState>,
    list_requests: RequestSequencer,
    pattern_requests: RequestSequencer,
    selection_requests: RequestSequencer,
    in_flight: AtomicUsize,
}

#[derive(Default)]
struct DreamStoreState {
    dreams: Vec<Dream>,
    selected: Option<Dream>,
    patterns: Option<PatternAnalysis>,
    list_applied: AppliedSequence,
    patterns_applied: AppliedSequence,
    selection_applied: AppliedSequence,
}

/// Counts a request as in flight until dropped.
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn start(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl DreamStore {
    pub fn new(gateway: Arc<dyn DreamGateway>) -> Self {
        Self {
            gateway,
            state: Mutex::new(DreamStoreState::default()),
            list_requests: RequestSequencer::new(),
            pattern_requests: RequestSequencer::new(),
            selection_requests: RequestSequencer::new(),
            in_flight: AtomicUsize::new(0),
        }
    }

    fn state(&self) -> MutexGuard<'_, DreamStoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ============================================================================
    // Remote operations
    // ============================================================================

    /// Loads the dream list and replaces the held list wholesale.
    ///
    /// # Errors
    ///
    /// `RemoteUnavailable` on transport failure, non-success status or an
    /// undecodable body. The held list is left untouched.
    pub async fn load_dreams(&self, identity: &Identity) -> Result<Vec<Dream>> {
        let _in_flight = InFlight::start(&self.in_flight);
        let ticket = self.list_requests.issue();
        tracing::debug!("Loading dreams for {} (request {})", identity, ticket.value());

        let dreams = self
            .gateway
            .list_dreams(identity)
            .await
            .map_err(ReverieError::into_remote)?;

        let mut state = self.state();
        if state.list_applied.try_advance(ticket) {
            state.dreams = dreams.clone();
            tracing::debug!("Applied dream list ({} dreams)", dreams.len());
        } else {
            tracing::debug!("Discarded stale dream list (request {})", ticket.value());
        }

        Ok(dreams)
    }

    /// Loads the pattern analysis and replaces the held result wholesale.
    pub async fn load_patterns(&self, identity: &Identity) -> Result<PatternAnalysis> {
        let _in_flight = InFlight::start(&self.in_flight);
        let ticket = self.pattern_requests.issue();
        tracing::debug!("Loading patterns for {} (request {})", identity, ticket.value());

        let patterns = self
            .gateway
            .pattern_analysis(identity)
            .await
            .map_err(ReverieError::into_remote)?;

        let mut state = self.state();
        if state.patterns_applied.try_advance(ticket) {
            state.patterns = Some(patterns.clone());
        } else {
            tracing::debug!("Discarded stale pattern result (request {})", ticket.value());
        }

        Ok(patterns)
    }

    /// Submits a new dream for interpretation.
    ///
    /// On success the returned dream becomes the selected dream. Clearing the
    /// draft is the caller's job.
    ///
    /// # Errors
    ///
    /// - `Validation` if title or description is blank; nothing is sent.
    /// - `RemoteUnavailable` on transport failure or non-success status.
    /// - `Interpretation` if the service answers without the interpretation
    ///   or with a body missing required fields.
    pub async fn create_dream(
        &self,
        identity: &Identity,
        title: &str,
        description: &str,
        emotions: &BTreeSet<Emotion>,
    ) -> Result<Dream> {
        let request = NewDream::new(identity, title, description, emotions)?;

        let _in_flight = InFlight::start(&self.in_flight);
        tracing::info!("Submitting dream '{}' for interpretation", request.title());

        let dream = self
            .gateway
            .create_dream(&request)
            .await
            .map_err(ReverieError::into_interpretation)?;

        if dream.interpretation_text().is_none() {
            tracing::warn!("Dream {} returned without interpretation", dream.id);
            return Err(ReverieError::interpretation(format!(
                "dream {} has no interpretation",
                dream.id
            )));
        }

        self.set_selection(Some(dream.clone()));
        tracing::info!("Dream {} interpreted ({} symbols)", dream.id, dream.symbols.len());
        Ok(dream)
    }

    /// Deletes a confirmed dream and drops it from the held list.
    ///
    /// The selection is not touched even if it points at the deleted dream;
    /// the caller decides what to show instead.
    ///
    /// # Errors
    ///
    /// `RemoteUnavailable` if the service rejects the delete (including an
    /// unknown id). The held list is left untouched.
    pub async fn delete_dream(&self, deletion: ConfirmedDeletion) -> Result<()> {
        let dream_id = deletion.dream_id();
        let _in_flight = InFlight::start(&self.in_flight);
        tracing::info!("Deleting dream {}", dream_id);

        self.gateway
            .delete_dream(dream_id)
            .await
            .map_err(ReverieError::into_remote)?;

        let mut state = self.state();
        state.dreams.retain(|dream| dream.id != dream_id);
        // A list load issued before the delete may still contain the dream.
        state.list_applied.supersede(self.list_requests.last_issued());
        Ok(())
    }

    /// Re-reads the selected dream from the service.
    ///
    /// Returns `Ok(None)` when nothing is selected. The refreshed record is
    /// applied only if the same dream is still selected.
    pub async fn refresh_selected(&self, identity: &Identity) -> Result<Option<Dream>> {
        let Some(dream_id) = self.selected_id() else {
            return Ok(None);
        };

        let _in_flight = InFlight::start(&self.in_flight);
        let ticket = self.selection_requests.issue();

        let dream = self
            .gateway
            .get_dream(identity, dream_id)
            .await
            .map_err(ReverieError::into_remote)?;

        let mut state = self.state();
        let still_selected = state.selected.as_ref().map(|d| d.id) == Some(dream_id);
        if still_selected && state.selection_applied.try_advance(ticket) {
            state.selected = Some(dream.clone());
        } else {
            tracing::debug!("Discarded stale refresh of dream {}", dream_id);
        }

        Ok(Some(dream))
    }

    // ============================================================================
    // Local operations
    // ============================================================================

    /// Selects a dream, e.g. from the journal list. No remote effect.
    pub fn select_dream(&self, dream: Dream) {
        self.set_selection(Some(dream));
    }

    pub fn clear_selection(&self) {
        self.set_selection(None);
    }

    fn set_selection(&self, dream: Option<Dream>) {
        let mut state = self.state();
        state.selected = dream;
        state
            .selection_applied
            .supersede(self.selection_requests.last_issued());
    }

    // ============================================================================
    // Accessors
    // ============================================================================

    pub fn dreams(&self) -> Vec<Dream> {
        self.state().dreams.clone()
    }

    pub fn find(&self, dream_id: DreamId) -> Option<Dream> {
        self.state()
            .dreams
            .iter()
            .find(|dream| dream.id == dream_id)
            .cloned()
    }

    pub fn selected_dream(&self) -> Option<Dream> {
        self.state().selected.clone()
    }

    pub fn selected_id(&self) -> Option<DreamId> {
        self.state().selected.as_ref().map(|dream| dream.id)
    }

    pub fn patterns(&self) -> Option<PatternAnalysis> {
        self.state().patterns.clone()
    }

    /// Whether any store request is in flight.
    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }
}
