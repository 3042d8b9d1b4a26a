//! State-transition core of the Donation Tracking Ledger (DTL).
//!
//! This crate provides:
//! - [`Ledger`] -- registration, donation, assignment, and query operations
//!   over a host [`StateStore`](dtl_store::StateStore)
//! - [`TxClock`] -- the host-supplied transaction timestamp, with
//!   [`SystemClock`] and [`ManualClock`] implementations
//! - Amount parsing and the [`LedgerError`] taxonomy
//!
//! Every mutating operation is a single read-modify-write of one stored
//! value. Validation and computation finish before the write, so a failed
//! call leaves state untouched.

pub mod amount;
pub mod clock;
pub mod error;
pub mod ledger;

pub use amount::parse_amount;
pub use clock::{ManualClock, SystemClock, TxClock};
pub use error::{LedgerError, LedgerResult};
pub use ledger::Ledger;
