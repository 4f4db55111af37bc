//! Core domain logic for the ledgertodo storage layer.
//! This crate is the single source of truth for record invariants.

pub mod address;
pub mod auth;
pub mod ledger;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use address::{
    counter_address, derive_address, item_address, list_address, AddressParseError, StorageAddress,
};
pub use auth::{authorize, AuthError, AuthResult};
pub use ledger::{
    open_ledger, open_ledger_in_memory, LedgerClient, LedgerError, LedgerResult, RecordMeta,
    StoredRecord, MAX_RECORD_SIZE,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::item::{
    ItemPatch, ItemValidationError, TodoItem, MAX_BOUNDED_DESCRIPTION_BYTES, MAX_TITLE_BYTES,
};
pub use model::owner::OwnerId;
pub use model::records::{GlobalCounterRecord, ItemIndexRecord, ItemRecord, TodoListRecord};
pub use service::todo_service::TodoService;
pub use store::counter::{initialize_counter, read_counter};
pub use store::{
    CreateItemRequest, DeleteItemRequest, InitializeRecordRequest, ItemCreated, OwnerSummary,
    PerItemStore, SingleRecordStore, StoreError, StoreResult, TodoStore, UpdateItemRequest,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
