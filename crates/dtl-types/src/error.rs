use thiserror::Error;

use crate::kind::EntityKind;

/// Errors produced by type operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("{kind} name must not be empty")]
    EmptyName { kind: EntityKind },

    #[error("amount must be positive")]
    ZeroAmount,

    #[error("{field} would overflow: {current} + {amount}")]
    Overflow {
        field: &'static str,
        current: u64,
        amount: u64,
    },

    #[error("invariant violated for {kind} {name}: {reason}")]
    InvariantViolation {
        kind: EntityKind,
        name: String,
        reason: String,
    },
}
