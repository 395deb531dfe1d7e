// Re-export needed modules for testing
pub mod models;
pub mod presence;
pub mod storage;

// Re-export main types for convenience
pub use models::*;
pub use presence::{InboundEvent, PresenceMonitor, PresenceStateTable};
pub use storage::StatusHistoryStore;
