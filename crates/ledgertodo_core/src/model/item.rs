//! Todo item model and admission limits.
//!
//! # Responsibility
//! - Define the item shape shared by both storage strategies.
//! - Enforce field-length limits before any ledger call is made.
//!
//! # Invariants
//! - Limits are measured in bytes of the UTF-8 encoding.
//! - A rejected item leaves no trace; validation never partially applies.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Maximum title length in bytes, in every storage mode.
pub const MAX_TITLE_BYTES: usize = 50;
/// Maximum description length in bytes when the whole list shares one record.
pub const MAX_BOUNDED_DESCRIPTION_BYTES: usize = 200;

/// One todo entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    /// Store-assigned sequence number, unique per owner.
    pub id: u64,
    pub title: String,
    pub description: String,
    pub completed: bool,
}

impl TodoItem {
    /// Creates a not-yet-completed item.
    pub fn new(id: u64, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            completed: false,
        }
    }
}

/// Partial update applied to an existing item.
///
/// `None` fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

impl ItemPatch {
    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.completed.is_none()
    }
}

pub type ItemValidationResult = Result<(), ItemValidationError>;

/// Admission failures surfaced before any record mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemValidationError {
    TitleTooLong { len: usize, max: usize },
    DescriptionTooLong { len: usize, max: usize },
    PayloadTooLarge { len: usize, max: usize },
}

impl Display for ItemValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TitleTooLong { len, max } => {
                write!(f, "title is {len} bytes, maximum is {max}")
            }
            Self::DescriptionTooLong { len, max } => {
                write!(f, "description is {len} bytes, maximum is {max}")
            }
            Self::PayloadTooLarge { len, max } => {
                write!(f, "payload is {len} bytes, record ceiling is {max}")
            }
        }
    }
}

impl Error for ItemValidationError {}

/// Checks the title limit shared by every storage mode.
pub fn validate_title(title: &str) -> ItemValidationResult {
    if title.len() > MAX_TITLE_BYTES {
        return Err(ItemValidationError::TitleTooLong {
            len: title.len(),
            max: MAX_TITLE_BYTES,
        });
    }
    Ok(())
}

/// Checks the description limit of the whole-list (capacity-constrained) mode.
pub fn validate_bounded_description(description: &str) -> ItemValidationResult {
    if description.len() > MAX_BOUNDED_DESCRIPTION_BYTES {
        return Err(ItemValidationError::DescriptionTooLong {
            len: description.len(),
            max: MAX_BOUNDED_DESCRIPTION_BYTES,
        });
    }
    Ok(())
}

/// Checks a payload size against a record ceiling.
pub fn validate_payload_size(len: usize, max: usize) -> ItemValidationResult {
    if len > max {
        return Err(ItemValidationError::PayloadTooLarge { len, max });
    }
    Ok(())
}
