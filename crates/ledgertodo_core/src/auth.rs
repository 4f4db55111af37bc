//! Mutation authorization guard.
//!
//! # Responsibility
//! - Verify the caller identity against a record's stored owner before any
//!   state change is applied.
//!
//! # Invariants
//! - Every mutating operation passes this check; read-only fetches do not.
//! - A failed check leaves every record untouched.

use crate::model::owner::OwnerId;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type AuthResult = Result<(), AuthError>;

/// Authorization failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// The caller is not the recognized owner of the target record.
    Forbidden { caller: OwnerId, owner: OwnerId },
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Forbidden { caller, owner } => {
                write!(f, "caller {caller} is not the owner {owner} of the record")
            }
        }
    }
}

impl Error for AuthError {}

/// Checks that `caller` is the recognized owner of the target record.
pub fn authorize(caller: &OwnerId, record_owner: &OwnerId) -> AuthResult {
    if caller == record_owner {
        Ok(())
    } else {
        Err(AuthError::Forbidden {
            caller: *caller,
            owner: *record_owner,
        })
    }
}
