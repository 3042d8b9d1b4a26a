use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// The namespace an entity lives in.
///
/// Each kind owns a disjoint key prefix in the host store, so a donator and
/// a receiver may share a name without overwriting one another.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    Donator,
    Receiver,
    Project,
}

impl EntityKind {
    pub const ALL: [EntityKind; 3] = [Self::Donator, Self::Receiver, Self::Project];

    /// Stable one-byte tag used by the record codec.
    pub fn tag(&self) -> u8 {
        match self {
            Self::Donator => 1,
            Self::Receiver => 2,
            Self::Project => 3,
        }
    }

    /// Parse a codec tag.
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            1 => Some(Self::Donator),
            2 => Some(Self::Receiver),
            3 => Some(Self::Project),
            _ => None,
        }
    }

    /// Key prefix for this namespace.
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Donator => "donator:",
            Self::Receiver => "receiver:",
            Self::Project => "project:",
        }
    }

    /// Storage key for an entity of this kind.
    ///
    /// The key is always derived from the caller-supplied name; callers are
    /// expected to have run [`validate_name`] first.
    pub fn storage_key(&self, name: &str) -> String {
        format!("{}{}", self.prefix(), name)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Donator => write!(f, "donator"),
            Self::Receiver => write!(f, "receiver"),
            Self::Project => write!(f, "project"),
        }
    }
}

/// Reject names that cannot serve as a storage key.
pub fn validate_name(kind: EntityKind, name: &str) -> Result<&str, TypeError> {
    if name.is_empty() {
        return Err(TypeError::EmptyName { kind });
    }
    Ok(name)
}
