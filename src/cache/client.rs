//! Cache Client Module
//!
//! The cache itself: mints keys, writes encoded values, and reads them back.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use crate::cache::{decode_float, decode_int, decode_text, Key, Value, STORE_OPERATION};
use crate::error::{CacheError, Result};
use crate::instrument::{call_count, call_history, count_calls};
use crate::store::KeyValueStore;

/// Boxed `store` operation, possibly wrapped in instrumentation.
type StoreOp = Box<dyn Fn((Value,)) -> Result<Key> + Send + Sync>;

// == Instrumentation ==
/// Which wrappers are composed around `Cache::store`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instrumentation {
    /// Count every call under `Cache.store`
    pub count_calls: bool,
    /// Record inputs and outputs under `Cache.store:inputs` / `Cache.store:outputs`
    pub call_history: bool,
}

impl Instrumentation {
    /// No wrappers; `store` talks to the backend directly.
    pub fn none() -> Self {
        Self {
            count_calls: false,
            call_history: false,
        }
    }
}

impl Default for Instrumentation {
    fn default() -> Self {
        Self {
            count_calls: true,
            call_history: true,
        }
    }
}

// == Cache ==
/// Value cache over a [`KeyValueStore`].
///
/// Owns one long-lived store handle for its lifetime. The `store` operation is
/// composed once at construction: history recording wraps call counting wraps
/// the raw write, so history sees the counted call as a single unit.
///
/// Instrumentation is only as atomic as the individual store commands. Two
/// threads calling `store` concurrently can interleave their history pushes.
pub struct Cache {
    /// Shared backend handle
    store: Arc<dyn KeyValueStore>,
    /// `store` with instrumentation applied
    store_op: StoreOp,
    instrumentation: Instrumentation,
}

impl Cache {
    // == Constructor ==
    /// Creates the cache and flushes the backing namespace.
    ///
    /// # Data loss
    /// Every key in the store is deleted, including counters and history left
    /// by previous runs. Call this once from setup code; use [`Cache::open`]
    /// for any further instance sharing the same store.
    pub fn new(store: Arc<dyn KeyValueStore>, instrumentation: Instrumentation) -> Result<Self> {
        store.flush_all()?;
        info!("Backing store flushed");
        Ok(Self::open(store, instrumentation))
    }

    /// Creates the cache over an existing store without flushing it.
    pub fn open(store: Arc<dyn KeyValueStore>, instrumentation: Instrumentation) -> Self {
        let backend = store.clone();
        let raw = move |(data,): (Value,)| -> Result<Key> {
            let key = Key::generate();
            backend.set(key.as_str(), &data.encode())?;
            debug!(key = %key, "Stored value");
            Ok(key)
        };

        let mut store_op: StoreOp = Box::new(raw);
        if instrumentation.count_calls {
            store_op = Box::new(count_calls(store.clone(), STORE_OPERATION, store_op));
        }
        if instrumentation.call_history {
            store_op = Box::new(call_history(store.clone(), STORE_OPERATION, store_op));
        }

        Self {
            store,
            store_op,
            instrumentation,
        }
    }

    // == Store ==
    /// Stores `data` under a freshly generated key and returns the key.
    ///
    /// Never overwrites an existing record.
    pub fn store(&self, data: impl Into<Value>) -> Result<Key> {
        (self.store_op)((data.into(),))
    }

    // == Retrieve ==
    /// Returns the raw bytes stored under `key`, or `None` if there are none.
    pub fn retrieve(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.store.get(key)?)
    }

    /// Returns the value under `key` passed through `decode`.
    ///
    /// `decode` is only invoked when the key exists. Its error is returned as
    /// is; store failures are converted into the caller's error type.
    pub fn retrieve_with<T, E, F>(&self, key: &str, decode: F) -> std::result::Result<Option<T>, E>
    where
        F: FnOnce(&[u8]) -> std::result::Result<T, E>,
        E: From<CacheError>,
    {
        match self.retrieve(key)? {
            Some(raw) => decode(raw.as_slice()).map(Some),
            None => Ok(None),
        }
    }

    /// Returns the value under `key` decoded as UTF-8 text.
    pub fn retrieve_str(&self, key: &str) -> Result<Option<String>> {
        self.retrieve_with(key, decode_text)
    }

    /// Returns the value under `key` decoded as a decimal integer.
    pub fn retrieve_int(&self, key: &str) -> Result<Option<i64>> {
        self.retrieve_with(key, decode_int)
    }

    /// Returns the value under `key` decoded as a decimal float.
    pub fn retrieve_float(&self, key: &str) -> Result<Option<f64>> {
        self.retrieve_with(key, decode_float)
    }

    // == Introspection ==
    /// Number of counted calls for `identity`, 0 if never called.
    pub fn call_count(&self, identity: &str) -> Result<u64> {
        call_count(&*self.store, identity)
    }

    /// Shared handle to the backing store, e.g. for replay.
    pub fn handle(&self) -> Arc<dyn KeyValueStore> {
        self.store.clone()
    }

    /// Wrappers applied to `store`.
    pub fn instrumentation(&self) -> Instrumentation {
        self.instrumentation
    }
}

impl fmt::Debug for Cache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("store", &self.store)
            .field("instrumentation", &self.instrumentation)
            .finish_non_exhaustive()
    }
}
