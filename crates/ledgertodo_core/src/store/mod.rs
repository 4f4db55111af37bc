//! Todo record store contracts shared by both storage strategies.
//!
//! # Responsibility
//! - Define the request surface and error taxonomy of the storage core.
//! - Re-derive and check the client-supplied target address of every
//!   mutation.
//!
//! # Invariants
//! - Mutations validate and authorize before the ledger is touched.
//! - A rejected request leaves every record exactly as it was.
//! - Validation and authorization logic is shared; only addressing and
//!   capacity policy differ between strategies.

pub mod counter;
mod per_item;
mod single_record;

pub use per_item::{max_description_bytes, PerItemStore};
pub use single_record::SingleRecordStore;

use crate::address::StorageAddress;
use crate::auth::AuthError;
use crate::ledger::LedgerError;
use crate::model::item::{ItemPatch, ItemValidationError, TodoItem};
use crate::model::owner::OwnerId;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Request-terminal errors of the storage core.
#[derive(Debug)]
pub enum StoreError {
    /// Field or payload limits violated; nothing was applied.
    Validation(ItemValidationError),
    /// Caller identity does not match the stored record owner.
    Auth(AuthError),
    /// The request named an address that does not match the re-derived one.
    AddressMismatch {
        expected: StorageAddress,
        provided: StorageAddress,
    },
    /// The owner's list/index record (or the counter) is not materialized.
    RecordNotFound(StorageAddress),
    /// No item with this id exists under the target owner.
    ItemNotFound { id: u64 },
    /// A record is already materialized at the derived address.
    AlreadyExists(StorageAddress),
    /// The mutation would grow a record beyond the ledger's ceiling.
    GrowthDenied { requested: usize, maximum: usize },
    /// A persisted payload failed to decode into its record layout.
    InvalidRecordData(String),
    /// Ledger transport failure.
    Ledger(LedgerError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Auth(err) => write!(f, "{err}"),
            Self::AddressMismatch { expected, provided } => write!(
                f,
                "request names address {provided} but the derived address is {expected}"
            ),
            Self::RecordNotFound(address) => write!(f, "no record at {address}"),
            Self::ItemNotFound { id } => write!(f, "no item with id {id}"),
            Self::AlreadyExists(address) => write!(f, "record already exists at {address}"),
            Self::GrowthDenied { requested, maximum } => write!(
                f,
                "requested allocation of {requested} bytes exceeds the {maximum}-byte ceiling"
            ),
            Self::InvalidRecordData(message) => {
                write!(f, "invalid persisted record data: {message}")
            }
            Self::Ledger(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Auth(err) => Some(err),
            Self::Ledger(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ItemValidationError> for StoreError {
    fn from(value: ItemValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<AuthError> for StoreError {
    fn from(value: AuthError) -> Self {
        Self::Auth(value)
    }
}

impl From<LedgerError> for StoreError {
    fn from(value: LedgerError) -> Self {
        match value {
            LedgerError::AlreadyExists(address) => Self::AlreadyExists(address),
            LedgerError::NotFound(address) => Self::RecordNotFound(address),
            LedgerError::GrowthDenied { requested, maximum } => {
                Self::GrowthDenied { requested, maximum }
            }
            other => Self::Ledger(other),
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Ledger(LedgerError::Sqlite(value))
    }
}

impl From<bincode::Error> for StoreError {
    fn from(value: bincode::Error) -> Self {
        Self::InvalidRecordData(value.to_string())
    }
}

/// Request to materialize an owner's list/index record.
#[derive(Debug, Clone)]
pub struct InitializeRecordRequest {
    pub caller: OwnerId,
    pub owner: OwnerId,
    /// Client-derived address of the record being created.
    pub record_address: StorageAddress,
}

/// Request to create one item under an owner.
#[derive(Debug, Clone)]
pub struct CreateItemRequest {
    pub caller: OwnerId,
    pub owner: OwnerId,
    /// Client-derived address of the owner's list/index record.
    pub record_address: StorageAddress,
    pub title: String,
    pub description: String,
}

/// Request to patch an existing item.
#[derive(Debug, Clone)]
pub struct UpdateItemRequest {
    pub caller: OwnerId,
    pub owner: OwnerId,
    pub item_id: u64,
    /// Client-derived address of the record holding the item.
    pub record_address: StorageAddress,
    pub patch: ItemPatch,
}

/// Request to delete an existing item.
#[derive(Debug, Clone)]
pub struct DeleteItemRequest {
    pub caller: OwnerId,
    pub owner: OwnerId,
    pub item_id: u64,
    /// Client-derived address of the record holding the item.
    pub record_address: StorageAddress,
}

/// Outcome of a successful item creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemCreated {
    pub id: u64,
    /// Address of the record the new item lives in.
    pub record_address: StorageAddress,
}

/// Owner-level counters read back from the list/index record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerSummary {
    pub owner: OwnerId,
    pub item_count: u64,
    pub next_item_id: u64,
}

/// The request surface of the storage core.
///
/// Implemented by both storage strategies; selected at construction time.
/// Mutations carry the client-derived target address and the caller
/// identity; reads are unauthenticated lookups.
pub trait TodoStore {
    /// Address of the owner's list/index record under this strategy.
    fn owner_record_address(&self, owner: &OwnerId) -> StorageAddress;

    /// Address of the record holding `(owner, item_id)` under this strategy.
    fn item_record_address(&self, owner: &OwnerId, item_id: u64) -> StorageAddress;

    fn initialize_record(&self, request: &InitializeRecordRequest) -> StoreResult<()>;

    fn create_item(&self, request: &CreateItemRequest) -> StoreResult<ItemCreated>;

    fn update_item(&self, request: &UpdateItemRequest) -> StoreResult<()>;

    fn delete_item(&self, request: &DeleteItemRequest) -> StoreResult<()>;

    fn get_item(&self, owner: &OwnerId, item_id: u64) -> StoreResult<Option<TodoItem>>;

    fn list_items(&self, owner: &OwnerId) -> StoreResult<Vec<TodoItem>>;

    fn owner_summary(&self, owner: &OwnerId) -> StoreResult<Option<OwnerSummary>>;
}

/// Rejects requests whose named address does not match the re-derived one.
pub(crate) fn expect_address(
    expected: StorageAddress,
    provided: StorageAddress,
) -> StoreResult<()> {
    if expected == provided {
        Ok(())
    } else {
        Err(StoreError::AddressMismatch { expected, provided })
    }
}
