//! Scoped recovery boundary around engine calls.
//!
//! Some engines signal internal faults by panicking rather than returning
//! an error. The contract promises that only [`KvError`] values cross into
//! application code, so every adapter entry point that touches its engine
//! runs inside [`recover`]. Lifecycle misuse never reaches this boundary
//! (adapter state flags report `ProtocolViolation` first), so a panic that
//! does arrive here is treated as an engine fault and surfaced as
//! [`KvError::Io`].

use crate::error::{KvError, KvResult};
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Runs `f`, converting an escaped panic into `KvError::Io`.
///
/// `op` names the public operation for the error message and the log line.
pub fn recover<T>(op: &'static str, f: impl FnOnce() -> KvResult<T>) -> KvResult<T> {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            tracing::warn!(op, message, "engine aborted; reporting as I/O failure");
            Err(KvError::io(format!("{op}: engine aborted: {message}")))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}
