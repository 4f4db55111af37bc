//! Per-item storage strategy: an index record plus one record per item.
//!
//! # Responsibility
//! - Keep each item in its own record at `(owner, sequence)` so one item can
//!   use the ledger's full record ceiling.
//! - Keep the owner's index record consistent with the live item records.
//!
//! # Invariants
//! - Item ids are allocated monotonically and never reused.
//! - Each item record's `id` equals the sequence number in its address.
//! - The index `item_count` counts not-yet-deleted item records.
//! - Deleting an item closes its record; later reads behave exactly as for a
//!   sequence that was never created.

use crate::address::{item_address, list_address, StorageAddress};
use crate::auth::authorize;
use crate::ledger::{LedgerClient, MAX_RECORD_SIZE};
use crate::model::item::{validate_payload_size, validate_title, TodoItem};
use crate::model::owner::OwnerId;
use crate::model::records::{decode_record, encode_record, ItemIndexRecord, ItemRecord};
use crate::store::{
    counter, expect_address, CreateItemRequest, DeleteItemRequest, InitializeRecordRequest,
    ItemCreated, OwnerSummary, StoreError, StoreResult, TodoStore, UpdateItemRequest,
};
use log::info;
use rusqlite::{Connection, Transaction, TransactionBehavior};

/// Headroom reserved for the owner identity, id, title and framing inside an
/// item record; what remains of the ceiling is available to the description.
const ITEM_RECORD_HEADROOM_BYTES: usize = 400;

/// Largest admissible description under this strategy.
pub fn max_description_bytes() -> usize {
    MAX_RECORD_SIZE - ITEM_RECORD_HEADROOM_BYTES
}

pub struct PerItemStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> PerItemStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn load_index(
        ledger: &LedgerClient<'_>,
        address: &StorageAddress,
    ) -> StoreResult<ItemIndexRecord> {
        let stored = ledger
            .read_record(address)?
            .ok_or(StoreError::RecordNotFound(*address))?;
        let index = decode_record(&stored.payload)?;
        Ok(index)
    }

    fn load_item_record(
        ledger: &LedgerClient<'_>,
        owner: &OwnerId,
        item_id: u64,
    ) -> StoreResult<Option<ItemRecord>> {
        let address = item_address(owner, item_id);
        let Some(stored) = ledger.read_record(&address)? else {
            return Ok(None);
        };
        let record: ItemRecord = decode_record(&stored.payload)?;
        if record.item.id != item_id {
            return Err(StoreError::InvalidRecordData(format!(
                "item record at {address} carries id {} instead of its address sequence {item_id}",
                record.item.id
            )));
        }
        Ok(Some(record))
    }
}

impl TodoStore for PerItemStore<'_> {
    fn owner_record_address(&self, owner: &OwnerId) -> StorageAddress {
        list_address(owner)
    }

    fn item_record_address(&self, owner: &OwnerId, item_id: u64) -> StorageAddress {
        item_address(owner, item_id)
    }

    fn initialize_record(&self, request: &InitializeRecordRequest) -> StoreResult<()> {
        let address = list_address(&request.owner);
        expect_address(address, request.record_address)?;
        authorize(&request.caller, &request.owner)?;

        let index = ItemIndexRecord::new(request.owner);
        let payload = encode_record(&index)?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        LedgerClient::new(&tx).create_record(&address, &payload, payload.len())?;
        tx.commit()?;

        info!(
            "event=initialize_record module=store strategy=per_item status=ok owner={}",
            request.owner
        );
        Ok(())
    }

    fn create_item(&self, request: &CreateItemRequest) -> StoreResult<ItemCreated> {
        let index_addr = list_address(&request.owner);
        expect_address(index_addr, request.record_address)?;
        validate_title(&request.title)?;
        validate_payload_size(request.description.len(), max_description_bytes())?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let ledger = LedgerClient::new(&tx);

        let mut index = Self::load_index(&ledger, &index_addr)?;
        authorize(&request.caller, &index.owner)?;

        let id = index.allocate_id();
        let record = ItemRecord {
            owner: request.owner,
            item: TodoItem::new(id, request.title.clone(), request.description.clone()),
        };
        let payload = encode_record(&record)?;
        validate_payload_size(payload.len(), MAX_RECORD_SIZE)?;

        let item_addr = item_address(&request.owner, id);
        ledger.create_record(&item_addr, &payload, payload.len())?;
        ledger.write_record(&index_addr, &encode_record(&index)?)?;
        counter::increment_total(&ledger)?;
        tx.commit()?;

        info!(
            "event=create_item module=store strategy=per_item status=ok owner={} id={id} payload_bytes={}",
            request.owner,
            payload.len()
        );
        Ok(ItemCreated {
            id,
            record_address: item_addr,
        })
    }

    fn update_item(&self, request: &UpdateItemRequest) -> StoreResult<()> {
        let address = item_address(&request.owner, request.item_id);
        expect_address(address, request.record_address)?;
        if let Some(title) = &request.patch.title {
            validate_title(title)?;
        }
        if let Some(description) = &request.patch.description {
            validate_payload_size(description.len(), max_description_bytes())?;
        }

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let ledger = LedgerClient::new(&tx);

        let Some(mut record) = Self::load_item_record(&ledger, &request.owner, request.item_id)?
        else {
            return Err(StoreError::ItemNotFound {
                id: request.item_id,
            });
        };
        authorize(&request.caller, &record.owner)?;

        if let Some(title) = &request.patch.title {
            record.item.title = title.clone();
        }
        if let Some(description) = &request.patch.description {
            record.item.description = description.clone();
        }
        if let Some(completed) = request.patch.completed {
            record.item.completed = completed;
        }

        let payload = encode_record(&record)?;
        validate_payload_size(payload.len(), MAX_RECORD_SIZE)?;
        ledger.grow_record(&address, payload.len())?;
        ledger.write_record(&address, &payload)?;
        tx.commit()?;

        info!(
            "event=update_item module=store strategy=per_item status=ok owner={} id={}",
            request.owner, request.item_id
        );
        Ok(())
    }

    fn delete_item(&self, request: &DeleteItemRequest) -> StoreResult<()> {
        let address = item_address(&request.owner, request.item_id);
        expect_address(address, request.record_address)?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let ledger = LedgerClient::new(&tx);

        let Some(record) = Self::load_item_record(&ledger, &request.owner, request.item_id)?
        else {
            return Err(StoreError::ItemNotFound {
                id: request.item_id,
            });
        };
        authorize(&request.caller, &record.owner)?;

        let index_addr = list_address(&request.owner);
        let mut index = Self::load_index(&ledger, &index_addr)?;

        let refunded = ledger.close_record(&address)?;
        index.record_removal();
        ledger.write_record(&index_addr, &encode_record(&index)?)?;
        tx.commit()?;

        info!(
            "event=delete_item module=store strategy=per_item status=ok owner={} id={} refunded_deposit={refunded}",
            request.owner, request.item_id
        );
        Ok(())
    }

    fn get_item(&self, owner: &OwnerId, item_id: u64) -> StoreResult<Option<TodoItem>> {
        let ledger = LedgerClient::new(self.conn);
        let record = Self::load_item_record(&ledger, owner, item_id)?;
        Ok(record.map(|record| record.item))
    }

    fn list_items(&self, owner: &OwnerId) -> StoreResult<Vec<TodoItem>> {
        let ledger = LedgerClient::new(self.conn);
        let index = Self::load_index(&ledger, &list_address(owner))?;

        let mut items = Vec::with_capacity(index.item_count as usize);
        for sequence in 0..index.next_item_id {
            if let Some(record) = Self::load_item_record(&ledger, owner, sequence)? {
                items.push(record.item);
            }
        }
        Ok(items)
    }

    fn owner_summary(&self, owner: &OwnerId) -> StoreResult<Option<OwnerSummary>> {
        let ledger = LedgerClient::new(self.conn);
        let Some(stored) = ledger.read_record(&list_address(owner))? else {
            return Ok(None);
        };
        let index: ItemIndexRecord = decode_record(&stored.payload)?;
        Ok(Some(OwnerSummary {
            owner: index.owner,
            item_count: index.item_count,
            next_item_id: index.next_item_id,
        }))
    }
}
