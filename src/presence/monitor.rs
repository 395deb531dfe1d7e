// Presence event ingestion
// Receives inbound events from the transport layer and fans each one into
// the state table and the durable history log.

use std::sync::Arc;

use chrono::Utc;
use log::{debug, error, info};
use tokio::sync::mpsc;

use crate::models::{PresenceStatus, StatusEvent};
use crate::presence::state::PresenceStateTable;
use crate::storage::StatusHistoryStore;

/// Capacity of the inbound event channel handed to the transport layer.
const EVENT_CHANNEL_CAPACITY: usize = 100;

/// Events delivered by the transport layer.
///
/// A closed sum type dispatched by explicit match. Presence is the only
/// kind today; new kinds get new variants rather than runtime inspection.
#[derive(Debug, Clone)]
pub enum InboundEvent {
    Presence {
        identifier: String,
        unavailable: bool,
    },
}

/// The ingestion side of the presence engine.
///
/// `handle_event` is safe to invoke concurrently for the same or different
/// identifiers; the state table's lock makes concurrent delivery safe even
/// though events for one contact normally arrive from a single source.
pub struct PresenceMonitor {
    state: Arc<PresenceStateTable>,
    store: StatusHistoryStore,
}

impl PresenceMonitor {
    pub fn new(state: Arc<PresenceStateTable>, store: StatusHistoryStore) -> Self {
        Self { state, store }
    }

    /// Create the inbound event channel. The sender half is the capability
    /// handed to the transport layer; the receiver half feeds [`run`].
    ///
    /// [`run`]: PresenceMonitor::run
    pub fn channel() -> (mpsc::Sender<InboundEvent>, mpsc::Receiver<InboundEvent>) {
        mpsc::channel(EVENT_CHANNEL_CAPACITY)
    }

    /// Ingest one inbound event.
    ///
    /// Presence events are stamped with the receipt time (never a source
    /// supplied timestamp), applied to the state table under its write lock,
    /// then appended to the durable log outside any lock. A failed append is
    /// logged and dropped: live state is already current and is never rolled
    /// back or blocked on persistence.
    pub fn handle_event(&self, event: InboundEvent) {
        match event {
            InboundEvent::Presence {
                identifier,
                unavailable,
            } => {
                let status = if unavailable {
                    PresenceStatus::Offline
                } else {
                    PresenceStatus::Online
                };
                let event = StatusEvent {
                    status,
                    timestamp: Utc::now(),
                };
                let name = self.state.record_event(&identifier, event);
                debug!("Presence update: {} is now {}", identifier, status);

                if let Err(e) = self.store.append(&identifier, name.as_deref(), status) {
                    error!("Failed to persist status for {}: {}", identifier, e);
                }
            }
        }
    }

    /// Run the ingestion loop until every sender is dropped.
    pub async fn run(self, mut events: mpsc::Receiver<InboundEvent>) {
        info!("Presence ingestion loop started");
        while let Some(event) = events.recv().await {
            self.handle_event(event);
        }
        info!("Presence ingestion loop stopped: event source closed");
    }
}
