// In-memory presence state table
// Current status, recent event history, and last-known display names for all
// tracked contacts, behind a single reader/writer lock.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::models::{PresenceStatus, StatusEvent};

/// Maximum in-memory events retained per identifier.
///
/// The in-memory history only feeds live range derivation; full history is
/// durably available from the status history store.
pub const MAX_HISTORY_EVENTS: usize = 256;

#[derive(Default)]
struct StateInner {
    statuses: HashMap<String, PresenceStatus>,
    histories: HashMap<String, Vec<StatusEvent>>,
    names: HashMap<String, String>,
}

/// Point-in-time view of one contact, taken under the table's read lock.
#[derive(Debug, Clone)]
pub struct ContactSnapshot {
    pub status: Option<PresenceStatus>,
    /// Oldest first.
    pub history: Vec<StatusEvent>,
    pub name: String,
}

/// Concurrently-accessed table of live presence state.
///
/// One `RwLock` guards the whole table: the ingestion loop takes exclusive
/// access for the duration of a single event's mutation, queries take shared
/// access. The lock is never held across I/O; durable log writes happen
/// after it is released. Constructed once at startup and shared by
/// reference.
#[derive(Default)]
pub struct PresenceStateTable {
    inner: RwLock<StateInner>,
}

impl PresenceStateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the current status for an identifier, unconditionally.
    /// Last write wins; out-of-order arrivals are not reconciled.
    pub fn set_status(&self, identifier: &str, status: PresenceStatus) {
        let mut inner = self.inner.write().unwrap();
        inner.statuses.insert(identifier.to_string(), status);
    }

    pub fn current_status(&self, identifier: &str) -> Option<PresenceStatus> {
        let inner = self.inner.read().unwrap();
        inner.statuses.get(identifier).copied()
    }

    /// Append one event to an identifier's in-memory history, dropping the
    /// oldest entry once `MAX_HISTORY_EVENTS` is reached.
    pub fn append_history(&self, identifier: &str, event: StatusEvent) {
        let mut inner = self.inner.write().unwrap();
        push_bounded(
            inner.histories.entry(identifier.to_string()).or_default(),
            event,
        );
    }

    /// The recorded history for one identifier, oldest first.
    pub fn history(&self, identifier: &str) -> Vec<StatusEvent> {
        let inner = self.inner.read().unwrap();
        inner.histories.get(identifier).cloned().unwrap_or_default()
    }

    /// Record a display name learned from the contact directory. An empty
    /// string is legal and means "no name".
    pub fn set_display_name(&self, identifier: &str, name: &str) {
        let mut inner = self.inner.write().unwrap();
        inner.names.insert(identifier.to_string(), name.to_string());
    }

    pub fn display_name(&self, identifier: &str) -> Option<String> {
        let inner = self.inner.read().unwrap();
        inner
            .names
            .get(identifier)
            .filter(|name| !name.is_empty())
            .cloned()
    }

    /// Apply one ingested event under a single exclusive acquisition:
    /// overwrite the current status, append to the bounded history, and look
    /// up the last-known display name for the durable log write that follows
    /// outside the lock. Returns that name, if any.
    pub fn record_event(&self, identifier: &str, event: StatusEvent) -> Option<String> {
        let mut inner = self.inner.write().unwrap();
        inner
            .statuses
            .insert(identifier.to_string(), event.status);
        push_bounded(
            inner.histories.entry(identifier.to_string()).or_default(),
            event,
        );
        inner
            .names
            .get(identifier)
            .filter(|name| !name.is_empty())
            .cloned()
    }

    /// Point-in-time consistent view of every contact with recorded
    /// activity, taken under one shared acquisition.
    pub fn snapshot(&self) -> HashMap<String, ContactSnapshot> {
        let inner = self.inner.read().unwrap();
        inner
            .histories
            .iter()
            .map(|(identifier, history)| {
                let snapshot = ContactSnapshot {
                    status: inner.statuses.get(identifier).copied(),
                    history: history.clone(),
                    name: inner.names.get(identifier).cloned().unwrap_or_default(),
                };
                (identifier.clone(), snapshot)
            })
            .collect()
    }
}

fn push_bounded(history: &mut Vec<StatusEvent>, event: StatusEvent) {
    history.push(event);
    if history.len() > MAX_HISTORY_EVENTS {
        history.remove(0);
    }
}
