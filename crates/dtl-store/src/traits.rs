use std::sync::Arc;

use crate::error::StoreResult;

/// Key-value state supplied by the host runtime.
///
/// All implementations must satisfy these invariants:
/// - `put_state` fully replaces any previous value under the key.
/// - A failed `put_state` leaves the previous value in place.
/// - Reads after a successful put observe the new value.
/// - The store never interprets values.
pub trait StateStore: Send + Sync {
    /// Read the value under `key`. Returns `Ok(None)` if nothing is stored.
    fn get_state(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Store `value` under `key`, overwriting any previous value.
    fn put_state(&self, key: &str, value: &[u8]) -> StoreResult<()>;
}

impl<S: StateStore + ?Sized> StateStore for Arc<S> {
    fn get_state(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        (**self).get_state(key)
    }

    fn put_state(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        (**self).put_state(key, value)
    }
}

impl<S: StateStore + ?Sized> StateStore for &S {
    fn get_state(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        (**self).get_state(key)
    }

    fn put_state(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        (**self).put_state(key, value)
    }
}
