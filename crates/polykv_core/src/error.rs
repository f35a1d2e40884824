//! The canonical error taxonomy for store operations.
//!
//! Every adapter translates its engine's native failure signals into this
//! closed set before they cross into application code. No other failure
//! mode (in particular, no engine panic) may escape a public entry point.

use std::io;
use thiserror::Error;

/// Result type for store operations.
pub type KvResult<T> = Result<T, KvError>;

/// Errors that can cross the store boundary.
#[derive(Debug, Error)]
pub enum KvError {
    /// The requested key does not exist.
    ///
    /// Only `get` produces this; `delete` of an absent key is a no-op.
    #[error("key not found")]
    NotFound,

    /// A caller-supplied argument was rejected before reaching the engine.
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// What was rejected and why.
        message: String,
    },

    /// The operation's context was cancelled before the engine was touched.
    #[error("operation cancelled")]
    Cancelled,

    /// The operation's context deadline expired before the engine was touched.
    #[error("deadline exceeded")]
    DeadlineExceeded,

    /// A lifecycle rule was broken: mutating a committed batch, operating on
    /// a closed store, or similar misuse.
    ///
    /// Engines that signal misuse by panicking never get the chance: the
    /// adapter's own state tracking reports the violation first.
    #[error("protocol violation: {message}")]
    ProtocolViolation {
        /// Which rule was broken.
        message: String,
    },

    /// An opaque engine-level fault (storage I/O, corruption, an engine
    /// abort absorbed by the recovery boundary).
    #[error("storage I/O failure: {message}")]
    Io {
        /// Engine-reported detail.
        message: String,
    },
}

impl KvError {
    /// Creates an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Creates a protocol violation error.
    pub fn protocol_violation(message: impl Into<String>) -> Self {
        Self::ProtocolViolation {
            message: message.into(),
        }
    }

    /// Creates an I/O failure from engine-reported detail.
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Returns true if this is the absent-key outcome.
    ///
    /// Callers use this to tell "key absent" apart from a real fault without
    /// matching on the full enum.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    /// Returns true for `Cancelled` or `DeadlineExceeded`.
    #[must_use]
    pub fn is_context_expired(&self) -> bool {
        matches!(self, Self::Cancelled | Self::DeadlineExceeded)
    }
}

impl From<io::Error> for KvError {
    fn from(err: io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
        }
    }
}
