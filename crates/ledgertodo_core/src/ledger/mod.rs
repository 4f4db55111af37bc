//! Ledger storage bootstrap and record lifecycle surface.
//!
//! # Responsibility
//! - Open and configure the SQLite connection backing the record table.
//! - Apply schema migrations in deterministic order.
//! - Expose record-level create/read/write/grow/close with capacity and
//!   deposit accounting.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - Core code must not touch records before migrations succeed.
//! - No record's capacity ever exceeds [`MAX_RECORD_SIZE`].

use crate::address::StorageAddress;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod client;
mod open;

pub use client::{LedgerClient, RecordMeta, StoredRecord};
pub use open::{open_ledger, open_ledger_in_memory};

/// Absolute ceiling for one record's payload capacity, in bytes.
pub const MAX_RECORD_SIZE: usize = 10 * 1024 * 1024;

/// Flat part of the deposit charged when a record is materialized.
pub const RECORD_BASE_DEPOSIT: u64 = 128;

/// Deposit charged per byte of allocated capacity.
pub const DEPOSIT_PER_BYTE: u64 = 8;

pub type LedgerResult<T> = Result<T, LedgerError>;

/// Errors raised by the ledger record surface.
#[derive(Debug)]
pub enum LedgerError {
    Sqlite(rusqlite::Error),
    /// A record is already materialized at the address.
    AlreadyExists(StorageAddress),
    /// No record is materialized at the address.
    NotFound(StorageAddress),
    /// The requested allocation exceeds the ledger's absolute maximum.
    GrowthDenied { requested: usize, maximum: usize },
    /// A payload does not fit the record's current allocation.
    CapacityExceeded { needed: usize, capacity: usize },
    UnsupportedSchemaVersion {
        ledger_version: u32,
        latest_supported: u32,
    },
}

impl Display for LedgerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::AlreadyExists(address) => {
                write!(f, "record already exists at {address}")
            }
            Self::NotFound(address) => write!(f, "no record at {address}"),
            Self::GrowthDenied { requested, maximum } => write!(
                f,
                "requested allocation of {requested} bytes exceeds the {maximum}-byte ceiling"
            ),
            Self::CapacityExceeded { needed, capacity } => write!(
                f,
                "payload needs {needed} bytes but the record allocation is {capacity}"
            ),
            Self::UnsupportedSchemaVersion {
                ledger_version,
                latest_supported,
            } => write!(
                f,
                "ledger schema version {ledger_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for LedgerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for LedgerError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
