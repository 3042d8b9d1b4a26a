//! Foundation types for the Donation Tracking Ledger (DTL).
//!
//! Every other DTL crate depends on `dtl-types`. The types here are plain
//! data: they know their own invariants but nothing about storage, encoding,
//! or dispatch.
//!
//! # Key Types
//!
//! - [`Donator`]: a donor with an append-only history of [`DonatorRecord`]s
//! - [`Receiver`]: a profit recipient credited by project assignments
//! - [`Project`]: a named cause donations and assignments refer to
//! - [`EntityKind`]: the namespace an entity's storage key lives in
//! - [`Timestamp`]: host-supplied transaction time

pub mod entity;
pub mod error;
pub mod kind;
pub mod temporal;

pub use entity::{Donator, DonatorRecord, Project, Receiver};
pub use error::TypeError;
pub use kind::{validate_name, EntityKind};
pub use temporal::Timestamp;
