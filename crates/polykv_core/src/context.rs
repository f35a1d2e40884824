//! Cooperative cancellation and deadlines for store operations.
//!
//! Every context-taking operation calls [`Context::check`] before touching
//! the engine and returns immediately, with no side effect, if the context
//! has expired. Cancellation is cooperative: an operation already in flight
//! against the engine completes or fails on the engine's own terms.

use crate::error::{KvError, KvResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Carries an optional cancellation flag and an optional deadline.
///
/// Contexts are cheap to clone and may be shared across threads.
///
/// # Example
///
/// ```rust
/// use polykv_core::Context;
///
/// let (ctx, handle) = Context::cancellable();
/// assert!(ctx.check().is_ok());
/// handle.cancel();
/// assert!(ctx.check().is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Context {
    cancelled: Option<Arc<AtomicBool>>,
    deadline: Option<Instant>,
}

/// Flips the cancellation flag of the [`Context`] it was created with.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    /// Cancels the associated context. Idempotent.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }
}

impl Context {
    /// A context that never expires.
    #[must_use]
    pub fn background() -> Self {
        Self::default()
    }

    /// A context that expires when the returned handle is cancelled.
    #[must_use]
    pub fn cancellable() -> (Self, CancelHandle) {
        let flag = Arc::new(AtomicBool::new(false));
        let ctx = Self {
            cancelled: Some(Arc::clone(&flag)),
            deadline: None,
        };
        (ctx, CancelHandle { flag })
    }

    /// A context that expires at the given instant.
    #[must_use]
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            cancelled: None,
            deadline: Some(deadline),
        }
    }

    /// A context that expires after the given duration from now.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    /// Returns a copy of this context that is additionally cancellable.
    #[must_use]
    pub fn child_cancellable(&self) -> (Self, CancelHandle) {
        let flag = Arc::new(AtomicBool::new(false));
        let ctx = Self {
            cancelled: Some(Arc::clone(&flag)),
            deadline: self.deadline,
        };
        (ctx, CancelHandle { flag })
    }

    /// Returns true if the cancellation flag has been flipped.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Acquire))
    }

    /// Checks for expiry.
    ///
    /// # Errors
    ///
    /// Returns [`KvError::Cancelled`] if the context was cancelled, or
    /// [`KvError::DeadlineExceeded`] if the deadline has passed.
    /// Cancellation takes precedence when both apply.
    pub fn check(&self) -> KvResult<()> {
        if self.is_cancelled() {
            return Err(KvError::Cancelled);
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Err(KvError::DeadlineExceeded);
            }
        }
        Ok(())
    }
}
