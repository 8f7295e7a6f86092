use crate::dream::DreamId;
use crate::error::ReverieError;
use serde::{Deserialize, Serialize};

/// Tabs the user can pick directly. `result` is not a tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    New,
    Journal,
    Patterns,
}

/// The named views of the client.
///
/// `Result` carries the dream it shows, so a result view without a selected
/// dream cannot be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "view", content = "dream_id")]
pub enum View {
    New,
    Result(DreamId),
    Journal,
    Patterns,
}

impl View {
    pub fn name(&self) -> &'static str {
        match self {
            View::New => "new",
            View::Result(_) => "result",
            View::Journal => "journal",
            View::Patterns => "patterns",
        }
    }

    /// The dream shown by a result view.
    pub fn dream_id(&self) -> Option<DreamId> {
        match self {
            View::Result(dream_id) => Some(*dream_id),
            _ => None,
        }
    }
}

impl From<Tab> for View {
    fn from(tab: Tab) -> Self {
        match tab {
            Tab::New => View::New,
            Tab::Journal => View::Journal,
            Tab::Patterns => View::Patterns,
        }
    }
}

/// Navigation triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// The user picked a tab.
    Tab(Tab),
    /// A submitted dream came back interpreted.
    DreamCreated(DreamId),
    /// The user clicked a journal row.
    DreamOpened(DreamId),
    /// A dream was deleted.
    DreamDeleted(DreamId),
    OpenChat,
    CloseChat,
}

/// Data load that fires when a view (or the chat panel) is entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryEffect {
    LoadDreams,
    LoadPatterns,
    LoadChat(DreamId),
}

/// Operations whose failures end up in the last-error slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    LoadDreams,
    LoadPatterns,
    CreateDream,
    DeleteDream,
    RefreshDream,
    SendMessage,
    CheckService,
}

impl Operation {
    /// Message shown when the service fails this operation.
    pub fn failure_message(self) -> &'static str {
        match self {
            Operation::LoadDreams => "Failed to load dreams",
            Operation::LoadPatterns => "Failed to load patterns",
            Operation::CreateDream => "Failed to analyze dream. Please try again.",
            Operation::DeleteDream => "Failed to delete dream",
            Operation::RefreshDream => "Failed to load dream",
            Operation::SendMessage => "Failed to send message",
            Operation::CheckService => "Dream service is unavailable",
        }
    }
}

/// Finite state machine over the named views.
///
/// Owns only navigation state (current view, chat panel flag) and the
/// last-error slot, which overlays whatever view is current.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewController {
    view: View,
    chat_open: bool,
    last_error: Option<String>,
}

impl Default for ViewController {
    fn default() -> Self {
        Self {
            view: View::New,
            chat_open: false,
            last_error: None,
        }
    }
}

impl ViewController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn is_chat_open(&self) -> bool {
        self.chat_open
    }

    /// Applies a navigation event and returns the load to fire, if any.
    ///
    /// Transition table:
    ///
    /// | from        | event              | to          | effect       |
    /// |-------------|--------------------|-------------|--------------|
    /// | any         | `Tab(t)`, t ≠ here | `t`         | entry effect |
    /// | any         | `Tab(t)`, t = here | unchanged   | none         |
    /// | any         | `DreamCreated(d)`  | `result(d)` | none         |
    /// | any         | `DreamOpened(d)`   | `result(d)` | none         |
    /// | `result(d)` | `DreamDeleted(d)`  | `journal`   | load dreams  |
    /// | `result(d)` | `OpenChat`         | chat open   | load chat(d) |
    /// | `result(_)` | `CloseChat`        | chat closed | none         |
    ///
    /// Anything else is ignored. Leaving `result` closes the chat panel.
    pub fn apply(&mut self, event: Navigation) -> Option<EntryEffect> {
        let next = match (self.view, event) {
            (current, Navigation::Tab(tab)) => {
                let target = View::from(tab);
                if current == target {
                    return None;
                }
                target
            }
            (_, Navigation::DreamCreated(dream_id)) => View::Result(dream_id),
            (_, Navigation::DreamOpened(dream_id)) => View::Result(dream_id),
            (View::Result(shown), Navigation::DreamDeleted(deleted)) if shown == deleted => {
                View::Journal
            }
            (View::Result(dream_id), Navigation::OpenChat) => {
                if self.chat_open {
                    return None;
                }
                self.chat_open = true;
                return Some(EntryEffect::LoadChat(dream_id));
            }
            (View::Result(_), Navigation::CloseChat) => {
                self.chat_open = false;
                return None;
            }
            (current, ignored) => {
                tracing::debug!("Ignored {:?} in view '{}'", ignored, current.name());
                return None;
            }
        };

        tracing::debug!("View '{}' -> '{}'", self.view.name(), next.name());
        self.view = next;
        self.chat_open = false;
        Self::entry_effect(next)
    }

    fn entry_effect(view: View) -> Option<EntryEffect> {
        match view {
            View::Journal => Some(EntryEffect::LoadDreams),
            View::Patterns => Some(EntryEffect::LoadPatterns),
            View::New | View::Result(_) => None,
        }
    }

    // ============================================================================
    // Last-error slot
    // ============================================================================

    /// Surfaces `error` as the single human-readable last error.
    pub fn report(&mut self, operation: Operation, error: &ReverieError) {
        let message = error.user_message(operation.failure_message());
        tracing::warn!("{:?} failed: {}", operation, error);
        self.last_error = Some(message);
    }

    /// Clears the slot after a successful operation.
    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    /// The user closed the error banner.
    pub fn dismiss_error(&mut self) {
        self.last_error = None;
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let controller = ViewController::new();
        assert_eq!(controller.view(), View::New);
        assert!(!controller.is_chat_open());
        assert!(controller.last_error().is_none());
    }

    #[test]
    fn test_entering_journal_loads_dreams() {
        let mut controller = ViewController::new();
        assert_eq!(
            controller.apply(Navigation::Tab(Tab::Journal)),
            Some(EntryEffect::LoadDreams)
        );
        assert_eq!(controller.view(), View::Journal);
    }

    #[test]
    fn test_entering_patterns_loads_patterns() {
        let mut controller = ViewController::new();
        assert_eq!(
            controller.apply(Navigation::Tab(Tab::Patterns)),
            Some(EntryEffect::LoadPatterns)
        );
    }

    #[test]
    fn test_reselecting_current_tab_is_noop() {
        let mut controller = ViewController::new();
        controller.apply(Navigation::Tab(Tab::Journal));
        assert_eq!(controller.apply(Navigation::Tab(Tab::Journal)), None);
        assert_eq!(controller.apply(Navigation::Tab(Tab::New)), None);
        assert_eq!(controller.view(), View::New);
    }

    #[test]
    fn test_created_dream_moves_new_to_result() {
        let mut controller = ViewController::new();
        assert_eq!(controller.apply(Navigation::DreamCreated(DreamId(3))), None);
        assert_eq!(controller.view(), View::Result(DreamId(3)));
    }

    #[test]
    fn test_created_dream_shown_after_tab_switch() {
        let mut controller = ViewController::new();
        controller.apply(Navigation::Tab(Tab::Patterns));
        assert_eq!(controller.apply(Navigation::DreamCreated(DreamId(3))), None);
        assert_eq!(controller.view(), View::Result(DreamId(3)));
    }

    #[test]
    fn test_journal_row_opens_result() {
        let mut controller = ViewController::new();
        controller.apply(Navigation::Tab(Tab::Journal));
        controller.apply(Navigation::DreamOpened(DreamId(8)));
        assert_eq!(controller.view().dream_id(), Some(DreamId(8)));
    }

    #[test]
    fn test_deleting_shown_dream_returns_to_journal() {
        let mut controller = ViewController::new();
        controller.apply(Navigation::DreamOpened(DreamId(8)));

        assert_eq!(controller.apply(Navigation::DreamDeleted(DreamId(9))), None);
        assert_eq!(controller.view(), View::Result(DreamId(8)));

        assert_eq!(
            controller.apply(Navigation::DreamDeleted(DreamId(8))),
            Some(EntryEffect::LoadDreams)
        );
        assert_eq!(controller.view(), View::Journal);
    }

    #[test]
    fn test_chat_panel_only_in_result() {
        let mut controller = ViewController::new();
        assert_eq!(controller.apply(Navigation::OpenChat), None);
        assert!(!controller.is_chat_open());

        controller.apply(Navigation::DreamOpened(DreamId(2)));
        assert_eq!(
            controller.apply(Navigation::OpenChat),
            Some(EntryEffect::LoadChat(DreamId(2)))
        );
        assert!(controller.is_chat_open());
        assert_eq!(controller.apply(Navigation::OpenChat), None);

        controller.apply(Navigation::CloseChat);
        assert!(!controller.is_chat_open());
    }

    #[test]
    fn test_leaving_result_closes_chat() {
        let mut controller = ViewController::new();
        controller.apply(Navigation::DreamOpened(DreamId(2)));
        controller.apply(Navigation::OpenChat);

        controller.apply(Navigation::Tab(Tab::Journal));
        assert!(!controller.is_chat_open());
    }

    #[test]
    fn test_error_slot() {
        let mut controller = ViewController::new();
        controller.report(Operation::LoadDreams, &ReverieError::remote("503"));
        assert_eq!(controller.last_error(), Some("Failed to load dreams"));

        // The slot overlays navigation.
        controller.apply(Navigation::Tab(Tab::Patterns));
        assert_eq!(controller.last_error(), Some("Failed to load dreams"));

        controller.dismiss_error();
        assert!(controller.last_error().is_none());

        controller.report(
            Operation::CreateDream,
            &ReverieError::validation("Please fill in all required fields"),
        );
        assert_eq!(controller.last_error(), Some("Please fill in all required fields"));
        controller.clear_error();
        assert!(controller.last_error().is_none());
    }

    #[test]
    fn test_view_serialization() {
        let json = serde_json::to_value(View::Result(DreamId(4))).unwrap();
        assert_eq!(json, serde_json::json!({"view": "result", "dream_id": 4}));
    }
}
