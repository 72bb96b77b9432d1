//! Refresh sequencing for the in-memory collection.
//!
//! Every refetch takes a ticket. Responses are applied only when their ticket
//! is newer than the last one applied, so a slow response to an early refetch
//! can never overwrite the result of a later one.

use serde::Serialize;

/// Freshness of the locally held collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheState {
    /// Never loaded, invalidated by a mutation, or the last refetch failed.
    Stale,
    /// At least one refetch newer than the applied data is in flight.
    Refreshing,
    /// The applied data comes from the newest refetch issued.
    Fresh,
}

/// Identifies one refetch. Obtained from [`RefreshTracker::begin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefreshTicket(u64);

impl RefreshTicket {
    pub fn seq(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct RefreshTracker {
    issued: u64,
    applied: u64,
    state: CacheState,
}

impl Default for RefreshTracker {
    fn default() -> Self {
        Self {
            issued: 0,
            applied: 0,
            state: CacheState::Stale,
        }
    }
}

impl RefreshTracker {
    pub fn state(&self) -> CacheState {
        self.state
    }

    /// Sequence number of the newest applied response, 0 if none.
    pub fn applied_seq(&self) -> u64 {
        self.applied
    }

    pub fn begin(&mut self) -> RefreshTicket {
        self.issued += 1;
        self.state = CacheState::Refreshing;
        RefreshTicket(self.issued)
    }

    /// Whether a response for `ticket` may still be applied.
    pub fn accepts(&self, ticket: RefreshTicket) -> bool {
        ticket.0 > self.applied
    }

    /// Records that the response for `ticket` was applied.
    pub fn complete(&mut self, ticket: RefreshTicket) {
        self.applied = ticket.0;
        self.state = if ticket.0 == self.issued {
            CacheState::Fresh
        } else {
            CacheState::Refreshing
        };
    }

    /// Records that the refetch for `ticket` failed.
    pub fn fail(&mut self, ticket: RefreshTicket) {
        if ticket.0 == self.issued {
            self.state = CacheState::Stale;
        }
    }

    /// Marks the data out of date after a successful mutation.
    pub fn invalidate(&mut self) {
        if self.state == CacheState::Fresh {
            self.state = CacheState::Stale;
        }
    }
}
