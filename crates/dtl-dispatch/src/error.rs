use std::fmt;

use dtl_ledger::LedgerError;
use serde::{Deserialize, Serialize};

/// Errors returned to the caller of a dispatched operation.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    #[error("incorrect number of arguments for {operation}: expected {expected}, got {actual}")]
    InvalidArgumentCount {
        operation: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

pub type DispatchResult<T> = Result<T, DispatchError>;

/// Coarse classification of a [`DispatchError`], stable across versions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    InvalidArgumentCount,
    InvalidAmount,
    InvalidName,
    UnknownOperation,
    NotFound,
    CorruptState,
    StoreError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidArgumentCount => "InvalidArgumentCount",
            Self::InvalidAmount => "InvalidAmount",
            Self::InvalidName => "InvalidName",
            Self::UnknownOperation => "UnknownOperation",
            Self::NotFound => "NotFound",
            Self::CorruptState => "CorruptState",
            Self::StoreError => "StoreError",
        }
    }

    /// Whether the caller can fix the failure by changing its request.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgumentCount
                | Self::InvalidAmount
                | Self::InvalidName
                | Self::UnknownOperation
                | Self::NotFound
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DispatchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownOperation(_) => ErrorKind::UnknownOperation,
            Self::InvalidArgumentCount { .. } => ErrorKind::InvalidArgumentCount,
            Self::Ledger(e) => match e {
                LedgerError::InvalidAmount { .. } => ErrorKind::InvalidAmount,
                LedgerError::InvalidName { .. } => ErrorKind::InvalidName,
                LedgerError::NotFound { .. } => ErrorKind::NotFound,
                LedgerError::CorruptState { .. } => ErrorKind::CorruptState,
                LedgerError::Store(_) => ErrorKind::StoreError,
            },
        }
    }
}
