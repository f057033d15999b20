//! Call Counter
//!
//! Counts invocations of an operation in the backing store.

use std::sync::Arc;

use tracing::debug;

use crate::error::{CacheError, Result};
use crate::store::KeyValueStore;

/// Wraps `op` so every invocation first increments the counter named
/// `identity`.
///
/// The counter tracks attempts: it is bumped before delegating, so a call
/// that then fails is still counted. If the increment itself fails the
/// operation is not run and the store error is returned.
///
/// # Arguments
/// * `store` - Store holding the counter
/// * `identity` - Stable operation name, used as the counter key
/// * `op` - Operation to wrap
pub fn count_calls<A, R, F>(
    store: Arc<dyn KeyValueStore>,
    identity: impl Into<String>,
    op: F,
) -> impl Fn(A) -> Result<R> + Send + Sync
where
    F: Fn(A) -> Result<R> + Send + Sync,
{
    let identity = identity.into();

    move |args: A| {
        let calls = store.increment(&identity)?;
        debug!(operation = %identity, calls, "Counted call");
        op(args)
    }
}

/// Reads the number of counted calls for `identity`.
///
/// A counter that was never incremented reads as 0.
pub fn call_count(store: &dyn KeyValueStore, identity: &str) -> Result<u64> {
    match store.get(identity)? {
        None => Ok(0),
        Some(raw) => std::str::from_utf8(&raw)
            .ok()
            .and_then(|text| text.parse::<u64>().ok())
            .ok_or_else(|| {
                CacheError::Decode(format!("counter {} is not a non-negative integer", identity))
            }),
    }
}
