// Presence tracking module
// This directory holds the live side of the engine: the shared state table,
// the ingestion loop feeding it, interval reconstruction, and the read-only
// query operations built on both.

pub mod monitor;
pub mod queries;
pub mod ranges;
pub mod state;

// Re-export the types collaborators actually hold.
pub use monitor::{InboundEvent, PresenceMonitor};
pub use ranges::compute_online_ranges;
pub use state::{ContactSnapshot, PresenceStateTable, MAX_HISTORY_EVENTS};
