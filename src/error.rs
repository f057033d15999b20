//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Store Error Enum ==
/// Errors raised at the key-value store boundary.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Transport or server error reported by the Redis client
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// Command issued against an entry holding the wrong kind of value
    #[error("Wrong type for key: {0}")]
    WrongType(String),

    /// INCR against a value that is not a decimal integer
    #[error("Value is not an integer: {0}")]
    NotAnInteger(String),

    /// The store handle's lock was poisoned by a panicking caller
    #[error("Store handle poisoned")]
    Poisoned,
}

// == Cache Error Enum ==
/// Unified error type for the cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Failure from the backing store, passed through untouched
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Stored bytes could not be decoded into the requested type
    #[error("Decode error: {0}")]
    Decode(String),

    /// Value shape that cannot be stored
    #[error("Unsupported value: {0}")]
    UnsupportedValue(String),

    /// Transcript could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Replay output sink failed
    #[error("Output error: {0}")]
    Sink(#[from] std::io::Error),
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
