use dtl_types::EntityKind;
use thiserror::Error;

/// Errors from encoding or decoding a stored record.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("buffer too short: {len} bytes, header needs {needed}")]
    TooShort { len: usize, needed: usize },

    #[error("bad magic: {0:02x?}")]
    BadMagic([u8; 2]),

    #[error("unsupported format version {0}")]
    UnsupportedVersion(u8),

    #[error("unknown entity kind tag {0}")]
    UnknownKind(u8),

    #[error("kind mismatch: expected {expected}, found {found}")]
    KindMismatch {
        expected: EntityKind,
        found: EntityKind,
    },

    #[error("length mismatch: header declares {declared} payload bytes, buffer holds {actual}")]
    LengthMismatch { declared: usize, actual: usize },

    #[error("checksum mismatch: expected {expected:08x}, computed {computed:08x}")]
    ChecksumMismatch { expected: u32, computed: u32 },

    #[error("payload too large: {size} bytes (max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("deserialization error: {0}")]
    Deserialization(String),
}

pub type CodecResult<T> = Result<T, CodecError>;
