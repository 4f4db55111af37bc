//! Todo use-case service.
//!
//! # Responsibility
//! - Provide stable entry points over any storage strategy.
//! - Derive request addresses through the strategy's addressing policy, so
//!   callers never invent addresses themselves.
//!
//! # Invariants
//! - Service APIs never bypass store validation/authorization contracts.
//! - The service layer remains strategy-agnostic.

use crate::address::StorageAddress;
use crate::model::item::{ItemPatch, TodoItem};
use crate::model::owner::OwnerId;
use crate::store::{
    CreateItemRequest, DeleteItemRequest, InitializeRecordRequest, ItemCreated, OwnerSummary,
    StoreResult, TodoStore, UpdateItemRequest,
};

/// Use-case service wrapper over a storage strategy.
pub struct TodoService<S: TodoStore> {
    store: S,
}

impl<S: TodoStore> TodoService<S> {
    /// Creates a service using the provided storage strategy.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The wrapped strategy, for callers that build raw requests.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Materializes the caller's list/index record and returns its address.
    pub fn initialize(&self, owner: &OwnerId) -> StoreResult<StorageAddress> {
        let record_address = self.store.owner_record_address(owner);
        self.store.initialize_record(&InitializeRecordRequest {
            caller: *owner,
            owner: *owner,
            record_address,
        })?;
        Ok(record_address)
    }

    /// Creates an item in the caller's own list.
    pub fn add_item(
        &self,
        caller: &OwnerId,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> StoreResult<ItemCreated> {
        self.store.create_item(&CreateItemRequest {
            caller: *caller,
            owner: *caller,
            record_address: self.store.owner_record_address(caller),
            title: title.into(),
            description: description.into(),
        })
    }

    /// Applies a partial update to `(owner, item_id)`.
    pub fn update_item(
        &self,
        caller: &OwnerId,
        owner: &OwnerId,
        item_id: u64,
        patch: ItemPatch,
    ) -> StoreResult<()> {
        self.store.update_item(&UpdateItemRequest {
            caller: *caller,
            owner: *owner,
            item_id,
            record_address: self.store.item_record_address(owner, item_id),
            patch,
        })
    }

    /// Flips the completion flag of `(owner, item_id)`.
    pub fn set_completed(
        &self,
        caller: &OwnerId,
        owner: &OwnerId,
        item_id: u64,
        completed: bool,
    ) -> StoreResult<()> {
        self.update_item(
            caller,
            owner,
            item_id,
            ItemPatch {
                completed: Some(completed),
                ..ItemPatch::default()
            },
        )
    }

    /// Deletes `(owner, item_id)`.
    pub fn remove_item(&self, caller: &OwnerId, owner: &OwnerId, item_id: u64) -> StoreResult<()> {
        self.store.delete_item(&DeleteItemRequest {
            caller: *caller,
            owner: *owner,
            item_id,
            record_address: self.store.item_record_address(owner, item_id),
        })
    }

    /// Reads one item; unauthenticated.
    pub fn item(&self, owner: &OwnerId, item_id: u64) -> StoreResult<Option<TodoItem>> {
        self.store.get_item(owner, item_id)
    }

    /// Reads all live items of an owner in order; unauthenticated.
    pub fn items(&self, owner: &OwnerId) -> StoreResult<Vec<TodoItem>> {
        self.store.list_items(owner)
    }

    /// Reads the owner-level counters; unauthenticated.
    pub fn summary(&self, owner: &OwnerId) -> StoreResult<Option<OwnerSummary>> {
        self.store.owner_summary(owner)
    }
}
