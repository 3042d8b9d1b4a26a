use std::path::PathBuf;

/// Errors from the host key-value store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Failure reported by the host store backend.
    #[error("backend error: {0}")]
    Backend(String),

    /// I/O error from a file-backed store.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A state file exists but cannot be parsed.
    #[error("corrupt state file {path}: {reason}")]
    CorruptFile { path: PathBuf, reason: String },

    /// The store rejects writes.
    #[error("store is read-only")]
    ReadOnly,
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
