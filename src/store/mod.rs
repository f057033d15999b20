//! Store Module
//!
//! Thin adapter over the external key-value backend. Everything above this
//! layer talks to a `KeyValueStore`, so it runs the same against Redis or the
//! in-memory fake.

mod memory;
mod redis_store;

use std::fmt::Debug;

use crate::error::StoreError;

pub use memory::MemoryStore;
pub use redis_store::RedisStore;

// == Key-Value Store ==
/// Primitive operations the cache needs from its backend.
///
/// Keys and list names are plain text, values are raw bytes. Each call is a
/// single backend primitive and is atomic on its own; no sequence of calls is.
/// Implementations do not retry.
pub trait KeyValueStore: Debug + Send + Sync {
    /// Stores `value` under `key`, replacing whatever was there (SET).
    fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;

    /// Returns the bytes stored under `key`, or `None` if absent (GET).
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Adds one to the integer counter `name`, creating it at 0 first if
    /// absent (INCR). Returns the new value.
    fn increment(&self, name: &str) -> Result<i64, StoreError>;

    /// Appends `entry` to the tail of list `name` (RPUSH).
    fn append_to_list(&self, name: &str, entry: &[u8]) -> Result<(), StoreError>;

    /// Returns every entry of list `name` in insertion order (LRANGE 0 -1).
    /// An absent list reads as empty.
    fn read_list(&self, name: &str) -> Result<Vec<Vec<u8>>, StoreError>;

    /// Removes every key in the backing namespace.
    fn flush_all(&self) -> Result<(), StoreError>;
}
