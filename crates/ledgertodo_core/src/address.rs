//! Deterministic storage address derivation.
//!
//! # Responsibility
//! - Compute stable 32-byte addresses from a namespace tag and ordered key
//!   parts.
//! - Provide the three addressing policies used by the todo record layouts.
//!
//! # Invariants
//! - Derivation is pure: identical inputs always yield the identical address.
//! - Distinct input tuples never collide: namespace and every part are
//!   length-prefixed before hashing, so part boundaries stay unambiguous.
//! - Clients re-derive addresses on every request; they never invent them.

use crate::model::owner::OwnerId;
use sha2::{Digest, Sha256};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Namespace tag for an owner's whole-list or index record.
pub const TODO_LIST_NAMESPACE: &[u8] = b"todo_list";
/// Namespace tag for one per-item record, qualified by a sequence number.
pub const TODO_ITEM_NAMESPACE: &[u8] = b"todo_item";
/// Namespace tag for the process-wide aggregate counter record.
pub const GLOBAL_COUNTER_NAMESPACE: &[u8] = b"global_todo_counter";

/// Byte width of every derived address.
pub const ADDRESS_LEN: usize = 32;

/// A derived storage location.
///
/// Addresses are computed from fixed inputs rather than allocated by the
/// ledger; deriving one does not materialize a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StorageAddress([u8; ADDRESS_LEN]);

impl StorageAddress {
    /// Raw address bytes.
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// Lowercase hex rendering used for persistence and display.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parses the hex rendering produced by [`StorageAddress::to_hex`].
    pub fn from_hex(value: &str) -> Result<Self, AddressParseError> {
        let bytes = hex::decode(value.trim())
            .map_err(|_| AddressParseError::InvalidHex(value.to_string()))?;
        let raw: [u8; ADDRESS_LEN] = bytes
            .try_into()
            .map_err(|rejected: Vec<u8>| AddressParseError::InvalidLength(rejected.len()))?;
        Ok(Self(raw))
    }
}

impl Display for StorageAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for StorageAddress {
    type Err = AddressParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::from_hex(value)
    }
}

/// Errors from parsing an address rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressParseError {
    InvalidHex(String),
    InvalidLength(usize),
}

impl Display for AddressParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidHex(value) => write!(f, "address is not valid hex: `{value}`"),
            Self::InvalidLength(len) => {
                write!(f, "address must be {ADDRESS_LEN} bytes, got {len}")
            }
        }
    }
}

impl Error for AddressParseError {}

/// Derives the address for `(namespace, parts...)`.
///
/// Each input is framed as `len(input) ‖ input` before hashing, so
/// `["ab", "c"]` and `["a", "bc"]` derive different addresses.
pub fn derive_address(namespace: &[u8], parts: &[&[u8]]) -> StorageAddress {
    let mut hasher = Sha256::new();
    hasher.update((namespace.len() as u64).to_le_bytes());
    hasher.update(namespace);
    for part in parts {
        hasher.update((part.len() as u64).to_le_bytes());
        hasher.update(part);
    }
    StorageAddress(hasher.finalize().into())
}

/// Address of an owner's whole-list or index record.
pub fn list_address(owner: &OwnerId) -> StorageAddress {
    derive_address(TODO_LIST_NAMESPACE, &[owner.as_bytes()])
}

/// Address of one per-item record for `(owner, sequence)`.
pub fn item_address(owner: &OwnerId, sequence: u64) -> StorageAddress {
    derive_address(
        TODO_ITEM_NAMESPACE,
        &[owner.as_bytes(), &sequence.to_le_bytes()],
    )
}

/// Address of the process-wide aggregate counter record.
pub fn counter_address() -> StorageAddress {
    derive_address(GLOBAL_COUNTER_NAMESPACE, &[])
}

#[cfg(test)]
mod tests {
    use super::{
        counter_address, derive_address, item_address, list_address, AddressParseError,
        StorageAddress,
    };
    use crate::model::owner::OwnerId;

    #[test]
    fn identical_inputs_derive_identical_addresses() {
        let owner = OwnerId::new_random();
        assert_eq!(list_address(&owner), list_address(&owner));
        assert_eq!(item_address(&owner, 7), item_address(&owner, 7));
        assert_eq!(counter_address(), counter_address());
    }

    #[test]
    fn differing_any_input_derives_a_different_address() {
        let owner_a = OwnerId::new_random();
        let owner_b = OwnerId::new_random();

        assert_ne!(list_address(&owner_a), list_address(&owner_b));
        assert_ne!(item_address(&owner_a, 0), item_address(&owner_a, 1));
        assert_ne!(list_address(&owner_a), item_address(&owner_a, 0));
        assert_ne!(list_address(&owner_a), counter_address());
    }

    #[test]
    fn part_boundaries_are_unambiguous() {
        let joined = derive_address(b"ns", &[b"ab", b"c"]);
        let shifted = derive_address(b"ns", &[b"a", b"bc"]);
        let merged = derive_address(b"ns", &[b"abc"]);

        assert_ne!(joined, shifted);
        assert_ne!(joined, merged);
        assert_ne!(shifted, merged);
    }

    #[test]
    fn hex_rendering_round_trips() {
        let address = item_address(&OwnerId::new_random(), 42);
        let parsed = StorageAddress::from_hex(&address.to_hex()).expect("hex round trip");
        assert_eq!(parsed, address);
    }

    #[test]
    fn rejects_malformed_hex_renderings() {
        assert!(matches!(
            StorageAddress::from_hex("zz"),
            Err(AddressParseError::InvalidHex(_))
        ));
        assert!(matches!(
            StorageAddress::from_hex("abcd"),
            Err(AddressParseError::InvalidLength(2))
        ));
    }
}
