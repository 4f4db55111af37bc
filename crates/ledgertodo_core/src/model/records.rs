//! Persisted record layouts for both storage strategies.
//!
//! # Responsibility
//! - Define the byte-for-byte shapes the ledger stores per derived address.
//! - Keep count/sequence bookkeeping next to the data it describes.
//!
//! # Invariants
//! - `TodoListRecord::item_count` always equals `items.len()`.
//! - `next_item_id` never decreases; removed ids are never handed out again.
//! - `ItemRecord::item.id` equals the sequence number in the record's address.

use crate::model::item::TodoItem;
use crate::model::owner::OwnerId;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Whole-list record: one record per owner holding every item in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoListRecord {
    pub owner: OwnerId,
    /// Number of live items; equals `items.len()`.
    pub item_count: u64,
    /// Monotonic id allocator; equals `item_count` until the first removal.
    pub next_item_id: u64,
    pub items: Vec<TodoItem>,
}

impl TodoListRecord {
    /// Empty list owned by `owner`.
    pub fn new(owner: OwnerId) -> Self {
        Self {
            owner,
            item_count: 0,
            next_item_id: 0,
            items: Vec::new(),
        }
    }

    /// Appends a new item and returns its assigned id.
    pub fn append_item(
        &mut self,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> u64 {
        let id = self.next_item_id;
        self.items.push(TodoItem::new(id, title, description));
        self.next_item_id += 1;
        self.item_count = self.items.len() as u64;
        id
    }

    /// Position of the item with `id`, if present.
    pub fn position_of(&self, id: u64) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    /// Read access to the item with `id`.
    pub fn item(&self, id: u64) -> Option<&TodoItem> {
        self.position_of(id).map(|index| &self.items[index])
    }

    /// Write access to the item with `id`.
    pub fn item_mut(&mut self, id: u64) -> Option<&mut TodoItem> {
        self.position_of(id).map(|index| &mut self.items[index])
    }

    /// Replaces the item at `index`, keeping its position.
    pub fn replace_item_at(&mut self, index: usize, item: TodoItem) -> Option<()> {
        let slot = self.items.get_mut(index)?;
        *slot = item;
        Some(())
    }

    /// Removes the item at `index`, shifting later items down one position.
    ///
    /// Relative order of the remaining items is preserved.
    pub fn remove_item_at(&mut self, index: usize) -> Option<TodoItem> {
        if index >= self.items.len() {
            return None;
        }
        let removed = self.items.remove(index);
        self.item_count = self.items.len() as u64;
        Some(removed)
    }
}

/// Index record for the per-item strategy: counters only, no items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemIndexRecord {
    pub owner: OwnerId,
    /// Number of not-yet-deleted items created under this owner.
    pub item_count: u64,
    /// Monotonic id allocator; equals `item_count` until the first removal.
    pub next_item_id: u64,
}

impl ItemIndexRecord {
    /// Empty index owned by `owner`.
    pub fn new(owner: OwnerId) -> Self {
        Self {
            owner,
            item_count: 0,
            next_item_id: 0,
        }
    }

    /// Hands out the next id and accounts for the new live item.
    pub fn allocate_id(&mut self) -> u64 {
        let id = self.next_item_id;
        self.next_item_id += 1;
        self.item_count += 1;
        id
    }

    /// Accounts for one removed live item.
    pub fn record_removal(&mut self) {
        self.item_count = self.item_count.saturating_sub(1);
    }
}

/// Per-item record: one item plus the owner it is scoped to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub owner: OwnerId,
    pub item: TodoItem,
}

/// Process-wide aggregate counter record.
///
/// Tracks the number of items ever created across all owners; removing an
/// item does not decrement it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalCounterRecord {
    pub total_items: u64,
}

impl GlobalCounterRecord {
    /// Zeroed counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accounts for exactly one created item.
    pub fn increment(&mut self) {
        self.total_items += 1;
    }
}

/// Serializes a record into its persisted payload bytes.
pub fn encode_record<T: Serialize>(record: &T) -> Result<Vec<u8>, bincode::Error> {
    bincode::serialize(record)
}

/// Deserializes a persisted payload back into its record layout.
pub fn decode_record<T: DeserializeOwned>(payload: &[u8]) -> Result<T, bincode::Error> {
    bincode::deserialize(payload)
}

#[cfg(test)]
mod tests {
    use super::{
        decode_record, encode_record, GlobalCounterRecord, ItemIndexRecord, TodoListRecord,
    };
    use crate::model::item::TodoItem;
    use crate::model::owner::OwnerId;

    #[test]
    fn append_assigns_sequential_ids_and_tracks_count() {
        let mut list = TodoListRecord::new(OwnerId::new_random());

        assert_eq!(list.append_item("first", "a"), 0);
        assert_eq!(list.append_item("second", "b"), 1);
        assert_eq!(list.item_count, 2);
        assert_eq!(list.items.len(), 2);
    }

    #[test]
    fn remove_shifts_later_items_left_preserving_order() {
        let mut list = TodoListRecord::new(OwnerId::new_random());
        list.append_item("first", "a");
        list.append_item("second", "b");
        list.append_item("third", "c");

        let removed = list.remove_item_at(0).expect("index 0 exists");
        assert_eq!(removed.title, "first");
        assert_eq!(list.item_count, 2);
        assert_eq!(list.items[0].title, "second");
        assert_eq!(list.items[1].title, "third");
    }

    #[test]
    fn removed_ids_are_never_reallocated() {
        let mut list = TodoListRecord::new(OwnerId::new_random());
        list.append_item("first", "a");
        list.append_item("second", "b");
        list.remove_item_at(1);

        let reallocated = list.append_item("third", "c");
        assert_eq!(reallocated, 2);
        assert!(list.item(1).is_none());
    }

    #[test]
    fn replace_keeps_position_and_rejects_out_of_range() {
        let mut list = TodoListRecord::new(OwnerId::new_random());
        list.append_item("first", "a");

        let replacement = TodoItem {
            completed: true,
            ..list.items[0].clone()
        };
        list.replace_item_at(0, replacement)
            .expect("index 0 exists");
        assert!(list.items[0].completed);

        assert!(list.replace_item_at(5, list.items[0].clone()).is_none());
        assert!(list.remove_item_at(5).is_none());
    }

    #[test]
    fn index_allocator_is_monotonic_across_removals() {
        let mut index = ItemIndexRecord::new(OwnerId::new_random());

        assert_eq!(index.allocate_id(), 0);
        assert_eq!(index.allocate_id(), 1);
        index.record_removal();
        assert_eq!(index.item_count, 1);
        assert_eq!(index.allocate_id(), 2);
    }

    #[test]
    fn counter_increments_by_exactly_one() {
        let mut counter = GlobalCounterRecord::new();
        counter.increment();
        counter.increment();
        assert_eq!(counter.total_items, 2);
    }

    #[test]
    fn payload_encoding_round_trips() {
        let mut list = TodoListRecord::new(OwnerId::new_random());
        list.append_item("first", "a");

        let payload = encode_record(&list).expect("encode");
        let decoded: TodoListRecord = decode_record(&payload).expect("decode");
        assert_eq!(decoded, list);
    }
}
