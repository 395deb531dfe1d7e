// Durable status history log
// Append-only SQLite record of every status transition; the only state that
// survives a restart.

use std::path::PathBuf;

use chrono::{DateTime, TimeZone, Utc};
use log::warn;
use rusqlite::{params, Connection};
use thiserror::Error;

use crate::models::{PersistedRecord, PresenceStatus};

/// Default row cap for recent-history queries.
pub const DEFAULT_RECENT_LIMIT: usize = 50;

/// SQLite renders `CURRENT_TIMESTAMP` as UTC in this format.
const SQLITE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Errors raised by the status history store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The database file could not be opened
    #[error("Failed to open status history database: {0}")]
    Open(#[source] rusqlite::Error),

    /// A statement failed to prepare or execute
    #[error("Status history statement failed: {0}")]
    Statement(#[from] rusqlite::Error),
}

/// Append-only SQLite log of status transitions.
///
/// Every operation opens its own connection and creates the table if it is
/// absent, so the store can be queried before anything was ever written.
/// With one row per presence change and reads at page-load frequency, the
/// per-call open is cheaper than managing a shared handle.
#[derive(Clone)]
pub struct StatusHistoryStore {
    path: PathBuf,
}

impl StatusHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn open(&self) -> Result<Connection, StorageError> {
        let conn = Connection::open(&self.path).map_err(StorageError::Open)?;
        Self::create_tables(&conn)?;
        Ok(conn)
    }

    /// Create the tables in the database
    fn create_tables(conn: &Connection) -> Result<(), StorageError> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS status_history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                jid TEXT NOT NULL,
                name TEXT,
                status TEXT NOT NULL,
                timestamp DATETIME DEFAULT CURRENT_TIMESTAMP
            )",
            [],
        )?;
        Ok(())
    }

    /// Append one status transition.
    ///
    /// The timestamp column defaults to the database clock at insertion.
    /// Failures are reported to the caller, who logs and carries on; a
    /// persistence gap never blocks ingestion.
    pub fn append(
        &self,
        identifier: &str,
        name: Option<&str>,
        status: PresenceStatus,
    ) -> Result<(), StorageError> {
        let conn = self.open()?;
        conn.execute(
            "INSERT INTO status_history (jid, name, status) VALUES (?, ?, ?)",
            params![identifier, name, status.as_str()],
        )?;
        Ok(())
    }

    /// The most recent transitions for one identifier, newest first, at most
    /// `limit` rows.
    ///
    /// The second ordering key disambiguates rows inserted within the same
    /// clock second. A row with an unreadable timestamp gets the read time
    /// substituted and an unknown status string becomes `Offline`; one
    /// corrupt row never fails the batch.
    pub fn recent(
        &self,
        identifier: &str,
        limit: usize,
    ) -> Result<Vec<PersistedRecord>, StorageError> {
        let conn = self.open()?;
        let mut stmt = conn.prepare(
            "SELECT id, jid, name, status, timestamp FROM status_history
             WHERE jid = ? ORDER BY timestamp DESC, id DESC LIMIT ?",
        )?;
        let rows = stmt.query_map(params![identifier, limit as i64], |row| {
            Ok(RawRow {
                id: row.get(0)?,
                identifier: row.get(1)?,
                name: row.get(2)?,
                status: row.get(3)?,
                timestamp: row.get(4)?,
            })
        })?;

        let mut records = Vec::new();
        for row in rows {
            let raw = match row {
                Ok(raw) => raw,
                Err(e) => {
                    warn!("Skipping unreadable status history row: {}", e);
                    continue;
                }
            };
            records.push(raw.into_record());
        }
        Ok(records)
    }
}

struct RawRow {
    id: i64,
    identifier: String,
    name: Option<String>,
    status: String,
    timestamp: String,
}

impl RawRow {
    fn into_record(self) -> PersistedRecord {
        let status = match self.status.parse::<PresenceStatus>() {
            Ok(status) => status,
            Err(e) => {
                warn!("Row {}: {}; treating as Offline", self.id, e);
                PresenceStatus::Offline
            }
        };
        let timestamp = match parse_row_timestamp(&self.timestamp) {
            Some(timestamp) => timestamp,
            None => {
                warn!(
                    "Row {}: unparseable timestamp {:?}; substituting read time",
                    self.id, self.timestamp
                );
                Utc::now()
            }
        };
        PersistedRecord {
            id: self.id,
            identifier: self.identifier,
            name: self.name,
            status,
            timestamp,
        }
    }
}

fn parse_row_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    chrono::NaiveDateTime::parse_from_str(raw, SQLITE_TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}
