use dtl_store::{EntityError, StoreError};
use dtl_types::{EntityKind, TypeError};

/// Errors produced by ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("invalid amount {input:?}: {reason}")]
    InvalidAmount { input: String, reason: String },

    #[error("invalid {kind} name: {reason}")]
    InvalidName { kind: EntityKind, reason: String },

    #[error("{kind} not found: {name}")]
    NotFound { kind: EntityKind, name: String },

    #[error("corrupt state under {key}: {reason}")]
    CorruptState { key: String, reason: String },

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

pub type LedgerResult<T> = Result<T, LedgerError>;

impl From<EntityError> for LedgerError {
    fn from(err: EntityError) -> Self {
        match err {
            EntityError::NotFound { kind, name } => Self::NotFound { kind, name },
            EntityError::CorruptState { key, reason } => Self::CorruptState { key, reason },
            EntityError::Encode { key, source } => {
                Self::Store(StoreError::Serialization(format!("{key}: {source}")))
            }
            EntityError::Store(e) => Self::Store(e),
        }
    }
}

impl LedgerError {
    pub(crate) fn invalid_name(kind: EntityKind, err: TypeError) -> Self {
        Self::InvalidName {
            kind,
            reason: err.to_string(),
        }
    }

    pub(crate) fn invalid_amount(input: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidAmount {
            input: input.into(),
            reason: reason.to_string(),
        }
    }
}
