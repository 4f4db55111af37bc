//! Aggregate counter record operations.
//!
//! # Responsibility
//! - Materialize and read the process-wide counter record.
//! - Bump the counter inside the same transaction as an item creation.
//!
//! # Invariants
//! - The counter lives at one fixed derived address shared by all owners.
//! - It tracks items ever created; deletion paths never decrement it.
//! - It is never incremented outside an item-creating mutation.

use crate::address::counter_address;
use crate::ledger::LedgerClient;
use crate::model::records::{decode_record, encode_record, GlobalCounterRecord};
use crate::store::{StoreError, StoreResult};
use log::info;
use rusqlite::Connection;

/// Creates the counter record with `total_items = 0`.
///
/// Fails with `AlreadyExists` when the counter was initialized before.
pub fn initialize_counter(conn: &Connection) -> StoreResult<GlobalCounterRecord> {
    let address = counter_address();
    let counter = GlobalCounterRecord::new();
    let payload = encode_record(&counter)?;

    let ledger = LedgerClient::new(conn);
    ledger.create_record(&address, &payload, payload.len())?;

    info!("event=initialize_counter module=store status=ok address={address}");
    Ok(counter)
}

/// Reads the counter record, `None` when it was never initialized.
pub fn read_counter(conn: &Connection) -> StoreResult<Option<GlobalCounterRecord>> {
    let ledger = LedgerClient::new(conn);
    let Some(stored) = ledger.read_record(&counter_address())? else {
        return Ok(None);
    };
    let counter = decode_record(&stored.payload)?;
    Ok(Some(counter))
}

/// Raises `total_items` by exactly 1.
///
/// Called only from within an item-creating mutation, on the same
/// transaction that commits the owner-level change.
pub(crate) fn increment_total(ledger: &LedgerClient<'_>) -> StoreResult<()> {
    let address = counter_address();
    let stored = ledger
        .read_record(&address)?
        .ok_or(StoreError::RecordNotFound(address))?;

    let mut counter: GlobalCounterRecord = decode_record(&stored.payload)?;
    counter.increment();
    ledger.write_record(&address, &encode_record(&counter)?)?;
    Ok(())
}
