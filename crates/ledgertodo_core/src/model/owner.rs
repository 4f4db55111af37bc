//! Owner identity model.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque fixed-size identity a record is scoped to.
///
/// Supplied by the caller on every request; used both as an addressing input
/// and as the authorization subject. The core never mints identities on a
/// caller's behalf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerId(Uuid);

impl OwnerId {
    /// Mints a fresh random identity.
    ///
    /// Intended for clients and tests; stored records only ever echo
    /// identities that arrived in requests.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an identity that already exists externally.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Raw identity bytes fed into address derivation.
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }

    /// Parses the hyphenated rendering produced by [`Display`].
    pub fn parse_str(value: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(value.trim()).map(Self)
    }
}

impl Display for OwnerId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
