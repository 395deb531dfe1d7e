// Durable status history store tests
// These tests exercise the SQLite log: append, recent-history retrieval,
// and tolerance of corrupt rows.

mod common;
use common::{broken_store, setup_logging, temp_store};

use chrono::Utc;
use rusqlite::{params, Connection};

use presencebox::models::PresenceStatus;

#[test]
fn test_recent_limit_and_descending_order() {
    setup_logging();
    let (store, _dir) = temp_store();

    for i in 0..60 {
        let status = if i % 2 == 0 {
            PresenceStatus::Online
        } else {
            PresenceStatus::Offline
        };
        store
            .append("alice@example.org", None, status)
            .expect("append should succeed");
    }

    let records = store
        .recent("alice@example.org", 50)
        .expect("recent should succeed");
    assert_eq!(records.len(), 50, "limit must cap the result");

    // Newest first: ids strictly decreasing, timestamps never increasing.
    for pair in records.windows(2) {
        assert!(pair[0].id > pair[1].id);
        assert!(pair[0].timestamp >= pair[1].timestamp);
    }
    // The most recent insert (the 60th) must be the first row back.
    assert_eq!(records[0].status, PresenceStatus::Offline);
}

#[test]
fn test_recent_before_any_write_returns_empty() {
    setup_logging();
    let (store, _dir) = temp_store();

    let records = store
        .recent("nobody@example.org", 50)
        .expect("querying a fresh store must not fail");
    assert!(records.is_empty());
}

#[test]
fn test_identifiers_are_isolated() {
    setup_logging();
    let (store, _dir) = temp_store();

    store
        .append("alice@example.org", Some("Alice"), PresenceStatus::Online)
        .unwrap();
    store
        .append("bob@example.org", Some("Bob"), PresenceStatus::Offline)
        .unwrap();

    let records = store.recent("alice@example.org", 50).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].identifier, "alice@example.org");
    assert_eq!(records[0].name.as_deref(), Some("Alice"));
    assert_eq!(records[0].status, PresenceStatus::Online);
}

#[test]
fn test_corrupt_timestamp_gets_read_time_substituted() {
    setup_logging();
    let (store, dir) = temp_store();

    // A normal write first, so the table exists.
    store
        .append("alice@example.org", None, PresenceStatus::Offline)
        .unwrap();

    // Plant a row with an unparseable timestamp behind the store's back.
    let conn = Connection::open(dir.path().join("status_history.db")).unwrap();
    conn.execute(
        "INSERT INTO status_history (jid, name, status, timestamp) VALUES (?, ?, ?, ?)",
        params!["alice@example.org", Option::<String>::None, "Online", "not-a-date"],
    )
    .unwrap();

    let before = Utc::now();
    let records = store
        .recent("alice@example.org", 50)
        .expect("a corrupt row must not fail the batch");
    let after = Utc::now();

    assert_eq!(records.len(), 2);
    let corrupt = records
        .iter()
        .find(|r| r.status == PresenceStatus::Online)
        .expect("the planted row should be returned");
    assert!(corrupt.timestamp >= before && corrupt.timestamp <= after);
}

#[test]
fn test_unknown_status_string_becomes_offline() {
    setup_logging();
    let (store, dir) = temp_store();

    store
        .append("alice@example.org", None, PresenceStatus::Online)
        .unwrap();

    let conn = Connection::open(dir.path().join("status_history.db")).unwrap();
    conn.execute(
        "INSERT INTO status_history (jid, status) VALUES (?, ?)",
        params!["bob@example.org", "Lurking"],
    )
    .unwrap();

    let records = store.recent("bob@example.org", 50).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].status, PresenceStatus::Offline);
}

#[test]
fn test_append_failure_is_reported_not_fatal() {
    setup_logging();
    let (store, _dir) = broken_store();

    assert!(store
        .append("alice@example.org", None, PresenceStatus::Online)
        .is_err());
    assert!(store.recent("alice@example.org", 50).is_err());
}
