//! Redis Basic - A value cache over a key-value store
//!
//! Stores scalar values under generated keys, counts and records calls to the
//! store operation, and replays the recorded history.

pub mod cache;
pub mod config;
pub mod error;
pub mod instrument;
pub mod replay;
pub mod store;

pub use cache::{Cache, Instrumentation, Key, Value, STORE_OPERATION};
pub use config::Config;
pub use error::{CacheError, Result, StoreError};
pub use replay::{replay, Transcript};
pub use store::{KeyValueStore, MemoryStore, RedisStore};
