//! Key-value state storage for the Donation Tracking Ledger.
//!
//! The host runtime owns the actual store and exposes only single-key
//! `get`/`put`. This crate defines that contract ([`StateStore`]) and the
//! typed adapter ([`EntityStore`]) the ledger uses on top of it.
//!
//! # Storage Backends
//!
//! - [`InMemoryStateStore`] -- `HashMap`-based store for tests and embedding
//! - [`FileStateStore`] -- JSON snapshot on disk, rewritten atomically on
//!   every put
//!
//! # Design Rules
//!
//! 1. Every put is a full overwrite of the key's value; there is no merge.
//! 2. There are no multi-key transactions.
//! 3. Absence is `NotFound`; bytes that fail to decode are `CorruptState`.
//! 4. Host store errors are propagated verbatim, never retried.

pub mod entity;
pub mod error;
pub mod file;
pub mod memory;
pub mod traits;

pub use entity::{EntityError, EntityResult, EntityStore};
pub use error::{StoreError, StoreResult};
pub use file::FileStateStore;
pub use memory::InMemoryStateStore;
pub use traits::StateStore;
