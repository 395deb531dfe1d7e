// Common test utilities for integration tests
// This module contains shared code for all integration tests

use std::sync::Once;

use log::LevelFilter;
use tempfile::TempDir;

use presencebox::storage::StatusHistoryStore;

// Initialize logging once
static INIT_LOGGER: Once = Once::new();

/// Set up the logger for the tests
pub fn setup_logging() {
    INIT_LOGGER.call_once(|| {
        env_logger::Builder::new()
            .filter_level(LevelFilter::Debug)
            .is_test(true)
            .init();
    });
}

/// A store backed by a SQLite file in its own temp directory. The directory
/// (and the database file) is removed when the returned guard drops, so keep
/// it alive for the duration of the test.
pub fn temp_store() -> (StatusHistoryStore, TempDir) {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let store = StatusHistoryStore::new(dir.path().join("status_history.db"));
    (store, dir)
}

/// A store pointed at a path that can never be opened as a database (the
/// temp directory itself), for exercising persistence-failure paths.
pub fn broken_store() -> (StatusHistoryStore, TempDir) {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let store = StatusHistoryStore::new(dir.path());
    (store, dir)
}
