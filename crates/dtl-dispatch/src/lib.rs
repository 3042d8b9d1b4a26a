//! Dispatch façade for the Donation Tracking Ledger.
//!
//! Maps an external call -- an operation name plus string arguments -- onto
//! a [`Ledger`](dtl_ledger::Ledger) operation. Argument counts are checked
//! here, before any ledger work, and every failure is reported as a
//! [`DispatchError`] whose [`ErrorKind`] a host can surface to its caller.

pub mod dispatcher;
pub mod error;
pub mod operation;

pub use dispatcher::Dispatcher;
pub use error::{DispatchError, DispatchResult, ErrorKind};
pub use operation::{Channel, Operation};
