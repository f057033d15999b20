//! Call History Recorder
//!
//! Records each invocation's arguments and result into a pair of lists so the
//! calls can be replayed later.

use std::fmt::{Debug, Display};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::Result;
use crate::store::KeyValueStore;

/// Name of the list holding rendered argument tuples for `identity`.
pub fn inputs_key(identity: &str) -> String {
    format!("{}:inputs", identity)
}

/// Name of the list holding rendered results for `identity`.
pub fn outputs_key(identity: &str) -> String {
    format!("{}:outputs", identity)
}

/// Wraps `op` so every invocation is recorded under `identity`.
///
/// The argument tuple is rendered with `Debug` (`("foo",)`) and pushed to the
/// inputs list before delegating. The result is rendered with `Display` and
/// pushed to the outputs list once the delegate returns `Ok`.
///
/// When the delegate fails only the input is recorded and the error is
/// returned unchanged, so the outputs list can end up shorter than the inputs
/// list. Readers must pair entries up to the shorter length.
///
/// The input push, the call, and the output push are three separate store
/// commands. Concurrent callers of the same wrapped operation can interleave
/// them, in which case the Nth input and Nth output may belong to different
/// calls.
///
/// # Arguments
/// * `store` - Store holding the history lists
/// * `identity` - Stable operation name; lists are `<identity>:inputs` and `<identity>:outputs`
/// * `op` - Operation to wrap
pub fn call_history<A, R, F>(
    store: Arc<dyn KeyValueStore>,
    identity: impl Into<String>,
    op: F,
) -> impl Fn(A) -> Result<R> + Send + Sync
where
    A: Debug,
    R: Display,
    F: Fn(A) -> Result<R> + Send + Sync,
{
    let identity = identity.into();
    let inputs = inputs_key(&identity);
    let outputs = outputs_key(&identity);

    move |args: A| {
        store.append_to_list(&inputs, format!("{:?}", args).as_bytes())?;

        match op(args) {
            Ok(result) => {
                store.append_to_list(&outputs, result.to_string().as_bytes())?;
                debug!(operation = %identity, "Recorded call");
                Ok(result)
            }
            Err(e) => {
                warn!(operation = %identity, error = %e, "Call failed, output not recorded");
                Err(e)
            }
        }
    }
}
