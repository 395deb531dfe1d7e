use anyhow::anyhow;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Online/offline state of a tracked contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PresenceStatus {
    Online,
    Offline,
}

impl PresenceStatus {
    pub fn is_online(&self) -> bool {
        matches!(self, PresenceStatus::Online)
    }

    /// The exact string stored in the durable history log.
    pub fn as_str(&self) -> &'static str {
        match self {
            PresenceStatus::Online => "Online",
            PresenceStatus::Offline => "Offline",
        }
    }
}

impl std::fmt::Display for PresenceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PresenceStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Online" => Ok(PresenceStatus::Online),
            "Offline" => Ok(PresenceStatus::Offline),
            other => Err(anyhow!("unknown presence status: {}", other)),
        }
    }
}

/// One observed status transition, stamped at receipt time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusEvent {
    pub status: PresenceStatus,
    pub timestamp: DateTime<Utc>,
}

/// An interval during which a contact was continuously online.
///
/// Always derived from the event history on read, never stored. Ranges for
/// one contact are non-overlapping and strictly increasing in `start`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OnlineRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// One durable row from the status history log.
#[derive(Debug, Clone, Serialize)]
pub struct PersistedRecord {
    pub id: i64,
    pub identifier: String,
    pub name: Option<String>,
    pub status: PresenceStatus,
    pub timestamp: DateTime<Utc>,
}

/// Everything the presentation layer needs for one contact: the latest
/// status plus the online intervals derived from recent activity.
#[derive(Debug, Clone, Serialize)]
pub struct ContactStatusUpdate {
    pub identifier: String,
    pub name: String,
    pub current_status: Option<PresenceStatus>,
    pub online_ranges: Vec<OnlineRange>,
    pub is_online: bool,
}
