//! Record codec for the Donation Tracking Ledger.
//!
//! Converts each entity to and from the bytes stored under its key. The
//! layout is explicit and versioned so records survive process restarts and
//! toolchain upgrades:
//!
//! ```text
//! [2 bytes: magic "DT"]
//! [1 byte:  format version]
//! [1 byte:  entity kind tag]
//! [4 bytes: payload length (big-endian u32)]
//! [4 bytes: CRC32 of payload (big-endian u32)]
//! [N bytes: payload (bincode, fixed-width big-endian integers)]
//! ```
//!
//! Decoding is all-or-nothing: a buffer that is truncated, carries trailing
//! bytes, fails its checksum, or holds a different kind than requested is
//! rejected with a [`CodecError`].

pub mod codec;
pub mod error;
pub mod record;

pub use codec::{RecordCodec, FORMAT_VERSION, HEADER_SIZE, MAGIC, MAX_PAYLOAD_SIZE};
pub use error::{CodecError, CodecResult};
pub use record::{AnyRecord, Record};
