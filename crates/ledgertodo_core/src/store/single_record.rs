//! Whole-list storage strategy: one growing record per owner.
//!
//! # Responsibility
//! - Keep every item of an owner inside a single list record.
//! - Grow the record ahead of the payload as items are appended or enlarged.
//!
//! # Invariants
//! - `item_count == items.len()` at every commit point.
//! - Removal shifts later items down one position; relative order of the
//!   remaining items is preserved.
//! - The record never outgrows the ledger's maximum record size, which
//!   bounds how many items one owner can hold.

use crate::address::{list_address, StorageAddress};
use crate::auth::authorize;
use crate::ledger::LedgerClient;
use crate::model::item::{validate_bounded_description, validate_title, TodoItem};
use crate::model::owner::OwnerId;
use crate::model::records::{decode_record, encode_record, TodoListRecord};
use crate::store::{
    counter, expect_address, CreateItemRequest, DeleteItemRequest, InitializeRecordRequest,
    ItemCreated, OwnerSummary, StoreError, StoreResult, TodoStore, UpdateItemRequest,
};
use log::info;
use rusqlite::{Connection, Transaction, TransactionBehavior};

pub struct SingleRecordStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SingleRecordStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn load_list(
        ledger: &LedgerClient<'_>,
        address: &StorageAddress,
    ) -> StoreResult<TodoListRecord> {
        let stored = ledger
            .read_record(address)?
            .ok_or(StoreError::RecordNotFound(*address))?;
        let list = decode_record(&stored.payload)?;
        Ok(list)
    }

    /// Persists the list, growing the record first when the payload outgrew
    /// its allocation.
    fn store_list(
        ledger: &LedgerClient<'_>,
        address: &StorageAddress,
        list: &TodoListRecord,
    ) -> StoreResult<()> {
        let payload = encode_record(list)?;
        ledger.grow_record(address, payload.len())?;
        ledger.write_record(address, &payload)?;
        Ok(())
    }
}

impl TodoStore for SingleRecordStore<'_> {
    fn owner_record_address(&self, owner: &OwnerId) -> StorageAddress {
        list_address(owner)
    }

    fn item_record_address(&self, owner: &OwnerId, _item_id: u64) -> StorageAddress {
        // Every item lives inside the owner's list record.
        list_address(owner)
    }

    fn initialize_record(&self, request: &InitializeRecordRequest) -> StoreResult<()> {
        let address = list_address(&request.owner);
        expect_address(address, request.record_address)?;
        authorize(&request.caller, &request.owner)?;

        let list = TodoListRecord::new(request.owner);
        let payload = encode_record(&list)?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        LedgerClient::new(&tx).create_record(&address, &payload, payload.len())?;
        tx.commit()?;

        info!(
            "event=initialize_record module=store strategy=single_record status=ok owner={}",
            request.owner
        );
        Ok(())
    }

    fn create_item(&self, request: &CreateItemRequest) -> StoreResult<ItemCreated> {
        let address = list_address(&request.owner);
        expect_address(address, request.record_address)?;
        validate_title(&request.title)?;
        validate_bounded_description(&request.description)?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let ledger = LedgerClient::new(&tx);

        let mut list = Self::load_list(&ledger, &address)?;
        authorize(&request.caller, &list.owner)?;

        let id = list.append_item(request.title.clone(), request.description.clone());
        Self::store_list(&ledger, &address, &list)?;
        counter::increment_total(&ledger)?;
        tx.commit()?;

        info!(
            "event=create_item module=store strategy=single_record status=ok owner={} id={id}",
            request.owner
        );
        Ok(ItemCreated {
            id,
            record_address: address,
        })
    }

    fn update_item(&self, request: &UpdateItemRequest) -> StoreResult<()> {
        let address = list_address(&request.owner);
        expect_address(address, request.record_address)?;
        if let Some(title) = &request.patch.title {
            validate_title(title)?;
        }
        if let Some(description) = &request.patch.description {
            validate_bounded_description(description)?;
        }

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let ledger = LedgerClient::new(&tx);

        let mut list = Self::load_list(&ledger, &address)?;
        authorize(&request.caller, &list.owner)?;

        let item = list.item_mut(request.item_id).ok_or(StoreError::ItemNotFound {
            id: request.item_id,
        })?;
        if let Some(title) = &request.patch.title {
            item.title = title.clone();
        }
        if let Some(description) = &request.patch.description {
            item.description = description.clone();
        }
        if let Some(completed) = request.patch.completed {
            item.completed = completed;
        }

        Self::store_list(&ledger, &address, &list)?;
        tx.commit()?;

        info!(
            "event=update_item module=store strategy=single_record status=ok owner={} id={}",
            request.owner, request.item_id
        );
        Ok(())
    }

    fn delete_item(&self, request: &DeleteItemRequest) -> StoreResult<()> {
        let address = list_address(&request.owner);
        expect_address(address, request.record_address)?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let ledger = LedgerClient::new(&tx);

        let mut list = Self::load_list(&ledger, &address)?;
        authorize(&request.caller, &list.owner)?;

        let position = list
            .position_of(request.item_id)
            .ok_or(StoreError::ItemNotFound {
                id: request.item_id,
            })?;
        list.remove_item_at(position);

        Self::store_list(&ledger, &address, &list)?;
        tx.commit()?;

        info!(
            "event=delete_item module=store strategy=single_record status=ok owner={} id={}",
            request.owner, request.item_id
        );
        Ok(())
    }

    fn get_item(&self, owner: &OwnerId, item_id: u64) -> StoreResult<Option<TodoItem>> {
        let ledger = LedgerClient::new(self.conn);
        let Some(stored) = ledger.read_record(&list_address(owner))? else {
            return Ok(None);
        };
        let list: TodoListRecord = decode_record(&stored.payload)?;
        Ok(list.item(item_id).cloned())
    }

    fn list_items(&self, owner: &OwnerId) -> StoreResult<Vec<TodoItem>> {
        let ledger = LedgerClient::new(self.conn);
        let list = Self::load_list(&ledger, &list_address(owner))?;
        Ok(list.items)
    }

    fn owner_summary(&self, owner: &OwnerId) -> StoreResult<Option<OwnerSummary>> {
        let ledger = LedgerClient::new(self.conn);
        let Some(stored) = ledger.read_record(&list_address(owner))? else {
            return Ok(None);
        };
        let list: TodoListRecord = decode_record(&stored.payload)?;
        Ok(Some(OwnerSummary {
            owner: list.owner,
            item_count: list.item_count,
            next_item_id: list.next_item_id,
        }))
    }
}
