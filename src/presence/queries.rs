// Read-only query operations for the presentation layer
// Live statuses with derived online ranges come from the state table;
// restart-surviving history comes from the durable log.

use chrono::{DateTime, Utc};

use crate::models::{ContactStatusUpdate, StatusEvent};
use crate::presence::ranges::compute_online_ranges;
use crate::presence::state::PresenceStateTable;
use crate::storage::{StatusHistoryStore, StorageError, DEFAULT_RECENT_LIMIT};

/// Current status and derived online ranges for every contact with recorded
/// activity, sorted by identifier.
///
/// Takes one consistent snapshot of the state table, then derives ranges per
/// contact from the in-memory history. `is_online` reflects the last event
/// in that history.
pub fn list_current_statuses(
    state: &PresenceStateTable,
    now: DateTime<Utc>,
) -> Vec<ContactStatusUpdate> {
    let mut updates: Vec<ContactStatusUpdate> = state
        .snapshot()
        .into_iter()
        .map(|(identifier, contact)| {
            let online_ranges = compute_online_ranges(&contact.history, now);
            let is_online = contact
                .history
                .last()
                .map(|event| event.status.is_online())
                .unwrap_or(false);
            ContactStatusUpdate {
                identifier,
                name: contact.name,
                current_status: contact.status,
                online_ranges,
                is_online,
            }
        })
        .collect();

    updates.sort_by(|a, b| a.identifier.cmp(&b.identifier));
    updates
}

/// Persisted status history for one identifier, newest first, capped at
/// [`DEFAULT_RECENT_LIMIT`] rows.
pub fn persisted_history(
    store: &StatusHistoryStore,
    identifier: &str,
) -> Result<Vec<StatusEvent>, StorageError> {
    let records = store.recent(identifier, DEFAULT_RECENT_LIMIT)?;
    Ok(records
        .into_iter()
        .map(|record| StatusEvent {
            status: record.status,
            timestamp: record.timestamp,
        })
        .collect())
}
