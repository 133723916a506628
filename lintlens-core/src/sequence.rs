//! Ordering of overlapping fetches so that stale responses never replace
//! newer ones.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// Ticket handed to a request when it is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    /// Sequence number of the request.
    pub fn sequence(self) -> u64 {
        self.0
    }
}

/// Issues increasing tickets and tells whether a ticket is still the latest.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: AtomicU64,
}

impl RequestSequencer {
    /// A sequencer that has issued nothing yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next ticket.
    pub fn issue(&self) -> RequestTicket {
        RequestTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether no newer ticket has been issued since `ticket`.
    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Sequence number of the most recent ticket, zero before the first.
    pub fn latest(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }
}

/// Holds the value produced by the most recently issued request.
///
/// A response is committed only while its ticket is the latest; responses to
/// superseded requests are dropped.
#[derive(Debug)]
pub struct LatestSlot<T> {
    sequencer: RequestSequencer,
    value: RwLock<Option<(RequestTicket, Arc<T>)>>,
}

impl<T> Default for LatestSlot<T> {
    fn default() -> Self {
        Self {
            sequencer: RequestSequencer::new(),
            value: RwLock::new(None),
        }
    }
}

impl<T> LatestSlot<T> {
    /// An empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new request.
    pub fn begin(&self) -> RequestTicket {
        self.sequencer.issue()
    }

    /// Store `value` if `ticket` is still the latest request.
    ///
    /// Returns whether the value was stored.
    pub fn commit(&self, ticket: RequestTicket, value: T) -> bool {
        let mut slot = self.value.write().unwrap_or_else(PoisonError::into_inner);
        if !self.sequencer.is_current(ticket) {
            log::debug!(
                "discarding stale response #{} (latest #{})",
                ticket.sequence(),
                self.sequencer.latest()
            );
            return false;
        }
        if slot.as_ref().is_some_and(|(stored, _)| *stored > ticket) {
            return false;
        }
        *slot = Some((ticket, Arc::new(value)));
        true
    }

    /// The last committed value.
    pub fn current(&self) -> Option<Arc<T>> {
        self.value
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|(_, value)| Arc::clone(value))
    }

    /// Ticket of the last committed value.
    pub fn current_ticket(&self) -> Option<RequestTicket> {
        self.value
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|(ticket, _)| *ticket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn tickets_increase_and_only_the_latest_is_current() {
        let sequencer = RequestSequencer::new();
        assert_eq!(sequencer.latest(), 0);
        let first = sequencer.issue();
        let second = sequencer.issue();
        assert!(second > first);
        assert!(!sequencer.is_current(first));
        assert!(sequencer.is_current(second));
    }

    #[test]
    fn stale_responses_are_discarded() {
        let slot = LatestSlot::new();
        let slow = slot.begin();
        let fast = slot.begin();

        assert!(slot.commit(fast, "new"));
        assert!(!slot.commit(slow, "old"));
        assert_eq!(slot.current().as_deref(), Some(&"new"));
        assert_eq!(slot.current_ticket(), Some(fast));
    }

    #[test]
    fn a_newer_request_blocks_an_in_flight_commit() {
        let slot: LatestSlot<u32> = LatestSlot::new();
        let first = slot.begin();
        let _second = slot.begin();
        assert!(!slot.commit(first, 1));
        assert!(slot.current().is_none());
    }

    #[test]
    fn concurrent_commits_keep_the_latest_ticket() {
        let slot = Arc::new(LatestSlot::new());
        let tickets: Vec<RequestTicket> = (0..8).map(|_| slot.begin()).collect();
        let last = *tickets.last().expect("ticket");
        let handles: Vec<_> = tickets
            .into_iter()
            .map(|ticket| {
                let slot = Arc::clone(&slot);
                thread::spawn(move || slot.commit(ticket, ticket.sequence()))
            })
            .collect();
        let committed = handles
            .into_iter()
            .map(|handle| handle.join().expect("join"))
            .filter(|stored| *stored)
            .count();
        assert_eq!(committed, 1);
        assert_eq!(slot.current_ticket(), Some(last));
        assert_eq!(slot.current().as_deref(), Some(&last.sequence()));
    }
}
