//! Instrumentation Module
//!
//! Wrappers that add call counting and call-history recording to any
//! operation without touching its body. Both take an operation and hand back
//! one with the same signature, so they compose in whichever order the caller
//! builds them.
//!
//! # Keys
//! For an operation identity `Cache.store`:
//! - `Cache.store` - call counter
//! - `Cache.store:inputs` - rendered argument tuples, one per call
//! - `Cache.store:outputs` - rendered results, one per successful call

mod counter;
mod history;

pub use counter::{call_count, count_calls};
pub use history::{call_history, inputs_key, outputs_key};
