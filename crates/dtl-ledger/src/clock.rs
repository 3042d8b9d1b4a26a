use std::sync::{Arc, Mutex};

use dtl_types::Timestamp;

/// Source of the current transaction's timestamp.
///
/// The host runtime decides what "now" means for a transaction; the ledger
/// asks once per operation and stamps every value it writes with the answer.
pub trait TxClock: Send + Sync {
    fn tx_timestamp(&self) -> Timestamp;
}

impl<C: TxClock + ?Sized> TxClock for Arc<C> {
    fn tx_timestamp(&self) -> Timestamp {
        (**self).tx_timestamp()
    }
}

/// Wall-clock time, forced strictly increasing across calls.
#[derive(Debug, Default)]
pub struct SystemClock {
    last: Mutex<Timestamp>,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TxClock for SystemClock {
    fn tx_timestamp(&self) -> Timestamp {
        let mut last = self.last.lock().expect("clock mutex poisoned");
        let next = Timestamp::now().after(&last);
        *last = next;
        next
    }
}

/// Deterministic clock for tests and replayed transactions.
///
/// Returns the current value and then moves it forward by `step_seconds`.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Timestamp>,
    step_seconds: i64,
}

impl ManualClock {
    /// A clock starting at `start` that advances one second per call.
    pub fn new(start: Timestamp) -> Self {
        Self::with_step(start, 1)
    }

    /// A clock starting at `start` that advances `step_seconds` per call.
    pub fn with_step(start: Timestamp, step_seconds: i64) -> Self {
        Self {
            now: Mutex::new(start),
            step_seconds,
        }
    }

    /// The value the next call will return.
    pub fn peek(&self) -> Timestamp {
        *self.now.lock().expect("clock mutex poisoned")
    }

    pub fn set(&self, ts: Timestamp) {
        *self.now.lock().expect("clock mutex poisoned") = ts;
    }
}

impl TxClock for ManualClock {
    fn tx_timestamp(&self) -> Timestamp {
        let mut now = self.now.lock().expect("clock mutex poisoned");
        let current = *now;
        *now = Timestamp::new(current.seconds.saturating_add(self.step_seconds), current.nanos);
        current
    }
}
