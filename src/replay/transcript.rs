//! Transcript Module
//!
//! Structured view of an operation's history, renderable as text or JSON.

use std::fmt;
use std::io::Write;

use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::instrument::{inputs_key, outputs_key};
use crate::store::KeyValueStore;

// == Call Record ==
/// One replayed invocation: rendered arguments and rendered result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallRecord {
    pub input: String,
    pub output: String,
}

// == Transcript ==
/// Recorded calls of one operation, in call order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transcript {
    /// Operation identity, e.g. `Cache.store`
    pub identity: String,
    /// Number of recorded inputs
    pub call_count: usize,
    /// Input/output pairs, truncated to the shorter of the two lists
    pub calls: Vec<CallRecord>,
}

impl Transcript {
    // == Load ==
    /// Reads the inputs and outputs lists of `identity`.
    ///
    /// `call_count` is the number of inputs. A call whose operation failed has
    /// an input but no output, so `calls` may be shorter than `call_count`.
    pub fn load(store: &dyn KeyValueStore, identity: &str) -> Result<Self> {
        let inputs = store.read_list(&inputs_key(identity))?;
        let outputs = store.read_list(&outputs_key(identity))?;

        debug!(
            operation = identity,
            inputs = inputs.len(),
            outputs = outputs.len(),
            "Loaded call history"
        );

        let call_count = inputs.len();
        let calls = inputs
            .iter()
            .zip(outputs.iter())
            .map(|(input, output)| CallRecord {
                input: String::from_utf8_lossy(input).into_owned(),
                output: String::from_utf8_lossy(output).into_owned(),
            })
            .collect();

        Ok(Self {
            identity: identity.to_string(),
            call_count,
            calls,
        })
    }

    // == Header ==
    /// `"<identity> was called <n> time(s):"`, singular only for exactly one call.
    pub fn header(&self) -> String {
        let unit = if self.call_count == 1 { "time" } else { "times" };
        format!("{} was called {} {}:", self.identity, self.call_count, unit)
    }

    // == Lines ==
    /// Header followed by one `"<identity>(*<input>) -> <output>"` line per call.
    pub fn lines(&self) -> Vec<String> {
        std::iter::once(self.header())
            .chain(self.calls.iter().map(|call| {
                format!("{}(*{}) -> {}", self.identity, call.input, call.output)
            }))
            .collect()
    }

    /// Writes `lines()` to `sink`, newline-terminated.
    pub fn write_to<W: Write>(&self, sink: &mut W) -> Result<()> {
        for line in self.lines() {
            writeln!(sink, "{}", line)?;
        }
        Ok(())
    }

    /// Pretty-printed JSON form.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.lines() {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
