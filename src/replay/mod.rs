//! Replay Module
//!
//! Reads an operation's recorded call history back out of the store and
//! renders it as a transcript.
//!
//! # Format
//! ```text
//! Cache.store was called 2 times:
//! Cache.store(*("foo",)) -> 0b6a1f4e-...
//! Cache.store(*("bar",)) -> 5c1d7a02-...
//! ```

mod transcript;

use std::io::Write;

use crate::error::Result;
use crate::store::KeyValueStore;

pub use transcript::{CallRecord, Transcript};

/// Writes the transcript of `identity` to `sink`, one line per entry.
///
/// Read-only: nothing in the store is modified.
pub fn replay<W: Write>(store: &dyn KeyValueStore, identity: &str, sink: &mut W) -> Result<()> {
    Transcript::load(store, identity)?.write_to(sink)
}
