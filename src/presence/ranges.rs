// Online interval reconstruction
// Derives the sequence of online ranges for one contact from its ordered
// status event history.

use chrono::{DateTime, Utc};

use crate::models::{OnlineRange, PresenceStatus, StatusEvent};

/// Compute the online intervals for a chronologically ordered event history.
///
/// `events` must be oldest first; callers holding newest-first rows (the
/// order the durable log returns) reverse before calling. An `Online` event
/// opens a range, the next `Offline` closes it. Duplicate same-status events
/// and a leading `Offline` are no-ops. A range still open after the last
/// event ends at `now`; taking `now` as an argument keeps the function pure,
/// so the same inputs always produce the same ranges.
pub fn compute_online_ranges(events: &[StatusEvent], now: DateTime<Utc>) -> Vec<OnlineRange> {
    let mut ranges = Vec::new();
    let mut open_start: Option<DateTime<Utc>> = None;

    for event in events {
        match event.status {
            PresenceStatus::Online => {
                if open_start.is_none() {
                    open_start = Some(event.timestamp);
                }
            }
            PresenceStatus::Offline => {
                if let Some(start) = open_start.take() {
                    ranges.push(OnlineRange {
                        start,
                        end: event.timestamp,
                    });
                }
            }
        }
    }

    // Still online: the in-progress period runs to the computation time.
    if let Some(start) = open_start {
        ranges.push(OnlineRange { start, end: now });
    }

    ranges
}
