//! Connection bootstrap utilities for the ledger.
//!
//! # Responsibility
//! - Open file or in-memory ledger connections.
//! - Configure connection behavior required by the record surface.
//! - Trigger schema migrations before returning a usable connection.
//!
//! # Invariants
//! - Returned connections have migrations fully applied.

use super::migrations::apply_migrations;
use super::LedgerResult;
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

/// Opens a ledger database file and applies all pending migrations.
///
/// # Side effects
/// - Emits `ledger_open` logging events with duration and status.
pub fn open_ledger(path: impl AsRef<Path>) -> LedgerResult<Connection> {
    let started_at = Instant::now();
    info!("event=ledger_open module=ledger status=start mode=file");

    let conn = Connection::open(path);
    finish_open(conn, started_at, "file")
}

/// Opens an in-memory ledger and applies all pending migrations.
///
/// # Side effects
/// - Emits `ledger_open` logging events with duration and status.
pub fn open_ledger_in_memory() -> LedgerResult<Connection> {
    let started_at = Instant::now();
    info!("event=ledger_open module=ledger status=start mode=memory");

    let conn = Connection::open_in_memory();
    finish_open(conn, started_at, "memory")
}

fn finish_open(
    opened: Result<Connection, rusqlite::Error>,
    started_at: Instant,
    mode: &str,
) -> LedgerResult<Connection> {
    let mut conn = match opened {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=ledger_open module=ledger status=error mode={mode} duration_ms={} error_code=ledger_open_failed error={err}",
                started_at.elapsed().as_millis(),
            );
            return Err(err.into());
        }
    };

    match bootstrap_connection(&mut conn) {
        Ok(()) => {
            info!(
                "event=ledger_open module=ledger status=ok mode={mode} duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=ledger_open module=ledger status=error mode={mode} duration_ms={} error_code=ledger_bootstrap_failed error={err}",
                started_at.elapsed().as_millis(),
            );
            Err(err)
        }
    }
}

fn bootstrap_connection(conn: &mut Connection) -> LedgerResult<()> {
    conn.busy_timeout(Duration::from_secs(5))?;
    apply_migrations(conn)?;
    Ok(())
}
