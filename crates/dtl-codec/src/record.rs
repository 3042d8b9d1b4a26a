use serde::de::DeserializeOwned;
use serde::Serialize;

use dtl_types::{Donator, EntityKind, Project, Receiver, TypeError};

/// An entity that can be stored under a key.
pub trait Record: Serialize + DeserializeOwned {
    /// Namespace and codec tag of this record type.
    const KIND: EntityKind;

    /// The entity's name, which is also its key within the namespace.
    fn name(&self) -> &str;

    /// Structural invariants a decoded value must satisfy.
    fn check(&self) -> Result<(), TypeError> {
        Ok(())
    }
}

impl Record for Donator {
    const KIND: EntityKind = EntityKind::Donator;

    fn name(&self) -> &str {
        &self.name
    }

    fn check(&self) -> Result<(), TypeError> {
        self.check_invariants()
    }
}

impl Record for Receiver {
    const KIND: EntityKind = EntityKind::Receiver;

    fn name(&self) -> &str {
        &self.name
    }
}

impl Record for Project {
    const KIND: EntityKind = EntityKind::Project;

    fn name(&self) -> &str {
        &self.name
    }
}

/// A decoded record of any kind, for callers that only learn the kind from
/// the frame header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnyRecord {
    Donator(Donator),
    Receiver(Receiver),
    Project(Project),
}

impl AnyRecord {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Donator(_) => EntityKind::Donator,
            Self::Receiver(_) => EntityKind::Receiver,
            Self::Project(_) => EntityKind::Project,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Donator(d) => &d.name,
            Self::Receiver(r) => &r.name,
            Self::Project(p) => &p.name,
        }
    }

    pub fn check(&self) -> Result<(), TypeError> {
        match self {
            Self::Donator(d) => d.check(),
            Self::Receiver(r) => r.check(),
            Self::Project(p) => p.check(),
        }
    }
}
