//! Cache Module
//!
//! Stores scalar values under generated keys and reads them back, optionally
//! decoded into a richer type.

mod client;
mod value;


// Re-export public types
pub use client::{Cache, Instrumentation};
pub use value::{decode_float, decode_int, decode_text, Key, Value};

// == Public Constants ==
/// Operation identity under which `Cache::store` is counted and recorded
pub const STORE_OPERATION: &str = "Cache.store";
