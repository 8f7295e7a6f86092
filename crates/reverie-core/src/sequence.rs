//! Request sequencing for last-write-wins state.
//!
//! Every load that replaces visible state is tagged with a ticket from a
//! [`RequestSequencer`]. The owning component keeps an [`AppliedSequence`]
//! next to the state it guards and applies a response only when its ticket
//! is newer than the one already applied. Older responses are dropped, never
//! aborted.

use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic ticket identifying one issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Issues strictly increasing tickets. Safe to share across tasks.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    last_issued: AtomicU64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues the next ticket. The first ticket is `1`.
    pub fn issue(&self) -> RequestTicket {
        RequestTicket(self.last_issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// The most recently issued ticket, if any.
    pub fn last_issued(&self) -> Option<RequestTicket> {
        match self.last_issued.load(Ordering::SeqCst) {
            0 => None,
            n => Some(RequestTicket(n)),
        }
    }
}

/// Newest ticket whose response has been applied to a piece of state.
///
/// Lives inside the same lock as the state it guards.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AppliedSequence(u64);

impl AppliedSequence {
    /// Records `ticket` as applied if it is newer than the current one.
    ///
    /// Returns `false` when the response is stale and must be discarded.
    pub fn try_advance(&mut self, ticket: RequestTicket) -> bool {
        if ticket.0 > self.0 {
            self.0 = ticket.0;
            true
        } else {
            false
        }
    }

    /// Marks everything issued up to `ticket` as superseded.
    ///
    /// Used when state is replaced by a local action (e.g. switching the
    /// active chat dream) so in-flight loads for the old state are dropped.
    pub fn supersede(&mut self, ticket: Option<RequestTicket>) {
        if let Some(ticket) = ticket {
            self.0 = self.0.max(ticket.0);
        }
    }
}
