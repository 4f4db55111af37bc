//! Record-level ledger operations.
//!
//! # Responsibility
//! - Materialize, read, rewrite, grow and close records by derived address.
//! - Account for the deposit held against every record's allocation.
//!
//! # Invariants
//! - A record's payload never exceeds its capacity.
//! - Capacity never exceeds [`MAX_RECORD_SIZE`](super::MAX_RECORD_SIZE) and
//!   never shrinks.
//! - Closing removes all trace: later reads behave exactly as for an address
//!   that was never materialized.

use crate::address::StorageAddress;
use crate::ledger::{
    LedgerError, LedgerResult, DEPOSIT_PER_BYTE, MAX_RECORD_SIZE, RECORD_BASE_DEPOSIT,
};
use rusqlite::{params, Connection, OptionalExtension};

/// Allocation metadata for one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordMeta {
    pub capacity: usize,
    pub deposit: u64,
}

/// One materialized record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecord {
    pub payload: Vec<u8>,
    pub capacity: usize,
    pub deposit: u64,
}

/// Record-level view over a ledger connection.
///
/// Borrows a plain connection or, via deref, an open transaction; callers
/// that mutate more than one record wrap the client in a transaction so the
/// request commits whole or not at all.
pub struct LedgerClient<'conn> {
    conn: &'conn Connection,
}

impl<'conn> LedgerClient<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Materializes a record: Uninitialized -> Active.
    ///
    /// Charges the deposit for `capacity` bytes of allocation and returns the
    /// resulting allocation metadata.
    pub fn create_record(
        &self,
        address: &StorageAddress,
        payload: &[u8],
        capacity: usize,
    ) -> LedgerResult<RecordMeta> {
        if capacity > MAX_RECORD_SIZE {
            return Err(LedgerError::GrowthDenied {
                requested: capacity,
                maximum: MAX_RECORD_SIZE,
            });
        }
        if payload.len() > capacity {
            return Err(LedgerError::CapacityExceeded {
                needed: payload.len(),
                capacity,
            });
        }
        if self.record_exists(address)? {
            return Err(LedgerError::AlreadyExists(*address));
        }

        let deposit = RECORD_BASE_DEPOSIT + capacity as u64 * DEPOSIT_PER_BYTE;
        self.conn.execute(
            "INSERT INTO records (address, payload, capacity, deposit)
             VALUES (?1, ?2, ?3, ?4);",
            params![address.to_hex(), payload, capacity as i64, deposit as i64],
        )?;

        Ok(RecordMeta { capacity, deposit })
    }

    /// Whether a record is materialized at `address`.
    pub fn record_exists(&self, address: &StorageAddress) -> LedgerResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM records WHERE address = ?1);",
            [address.to_hex()],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    /// Reads the record at `address`, `None` when nothing is materialized.
    pub fn read_record(&self, address: &StorageAddress) -> LedgerResult<Option<StoredRecord>> {
        let record = self
            .conn
            .query_row(
                "SELECT payload, capacity, deposit FROM records WHERE address = ?1;",
                [address.to_hex()],
                |row| {
                    Ok(StoredRecord {
                        payload: row.get::<_, Vec<u8>>(0)?,
                        capacity: row.get::<_, i64>(1)? as usize,
                        deposit: row.get::<_, i64>(2)? as u64,
                    })
                },
            )
            .optional()?;
        Ok(record)
    }

    /// Rewrites the payload of an Active record within its allocation.
    ///
    /// Callers grow the record first when the payload outgrew it; the write
    /// itself never resizes.
    pub fn write_record(&self, address: &StorageAddress, payload: &[u8]) -> LedgerResult<()> {
        let stored = self
            .read_record(address)?
            .ok_or(LedgerError::NotFound(*address))?;
        if payload.len() > stored.capacity {
            return Err(LedgerError::CapacityExceeded {
                needed: payload.len(),
                capacity: stored.capacity,
            });
        }

        self.conn.execute(
            "UPDATE records SET payload = ?2 WHERE address = ?1;",
            params![address.to_hex(), payload],
        )?;
        Ok(())
    }

    /// Grows an Active record's allocation to `new_capacity`.
    ///
    /// Charges the marginal deposit. Requests at or below the current
    /// capacity are a no-op; allocations never shrink.
    pub fn grow_record(
        &self,
        address: &StorageAddress,
        new_capacity: usize,
    ) -> LedgerResult<RecordMeta> {
        let stored = self
            .read_record(address)?
            .ok_or(LedgerError::NotFound(*address))?;
        if new_capacity <= stored.capacity {
            return Ok(RecordMeta {
                capacity: stored.capacity,
                deposit: stored.deposit,
            });
        }
        if new_capacity > MAX_RECORD_SIZE {
            return Err(LedgerError::GrowthDenied {
                requested: new_capacity,
                maximum: MAX_RECORD_SIZE,
            });
        }

        let top_up = (new_capacity - stored.capacity) as u64 * DEPOSIT_PER_BYTE;
        let deposit = stored.deposit + top_up;
        self.conn.execute(
            "UPDATE records SET capacity = ?2, deposit = ?3 WHERE address = ?1;",
            params![address.to_hex(), new_capacity as i64, deposit as i64],
        )?;

        Ok(RecordMeta {
            capacity: new_capacity,
            deposit,
        })
    }

    /// Closes a record: Active -> Closed (terminal).
    ///
    /// Reclaims the allocation and returns the deposit to refund to the
    /// owner. Reads after close report the address as never materialized.
    pub fn close_record(&self, address: &StorageAddress) -> LedgerResult<u64> {
        let stored = self
            .read_record(address)?
            .ok_or(LedgerError::NotFound(*address))?;

        self.conn
            .execute("DELETE FROM records WHERE address = ?1;", [address.to_hex()])?;
        Ok(stored.deposit)
    }
}
