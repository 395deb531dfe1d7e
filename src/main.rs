use anyhow::Result;
use clap::Parser;
use log::{info, LevelFilter};
use std::path::PathBuf;
use std::sync::Arc;

mod utils;

use presencebox::presence::{PresenceMonitor, PresenceStateTable};
use presencebox::storage::StatusHistoryStore;

/// Command line arguments for presencebox
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Presencebox: tracks contact presence and keeps a durable status history.",
    long_about = "Presencebox ingests online/offline presence events for tracked contacts,\n\
    keeps a live in-memory view of current status, and appends every transition\n\
    to a SQLite history log from which online intervals are reconstructed on demand.\n\n\
    A transport layer delivers events through the inbound channel; a presentation\n\
    layer reads through the query operations. Neither is wired here."
)]
struct Args {
    /// SQLite file for the durable status history log
    #[arg(long, value_name = "PATH", default_value = "status_history.db")]
    db_path: PathBuf,

    /// Write logs to this file instead of stdout
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    utils::setup_logging(
        args.log_file.as_deref().and_then(|p| p.to_str()),
        LevelFilter::Info,
    )?;

    info!("Presencebox starting up");
    info!("Status history database: {}", args.db_path.display());

    let state = Arc::new(PresenceStateTable::new());
    let store = StatusHistoryStore::new(args.db_path);
    let (events_tx, events_rx) = PresenceMonitor::channel();
    let monitor = PresenceMonitor::new(Arc::clone(&state), store);
    let ingestion = tokio::spawn(monitor.run(events_rx));

    // The transport layer owns a clone of `events_tx`; the presentation
    // layer calls the query operations with `state` and the store. Keeping
    // the sender alive here keeps the ingestion loop running until shutdown.
    info!("Presence engine ready; waiting for shutdown signal");
    tokio::signal::ctrl_c().await?;

    info!("Shutting down");
    drop(events_tx);
    let _ = ingestion.await;

    Ok(())
}
