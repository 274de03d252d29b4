//! Cooperative cancellation signal
//!
//! A [`CancelToken`] is created by the caller (the CLI wires it to Ctrl-C)
//! and passed down the call chain into every backend operation. The engine
//! never polls it at arbitrary points; the only place that observes it is
//! the subprocess wait in [`crate::vcs::command`], where completion of the
//! external tool races against [`CancelToken::cancelled`]. Timeouts are the
//! caller's responsibility: cancel the token from a timer if one is wanted.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Notify;

/// Clonable cancellation signal shared between a controller and any number
/// of in-flight operations.
///
/// All clones observe the same state; cancellation is sticky and cannot be
/// reset.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    cancelled: AtomicBool,
    notify: Notify,
}

impl CancelToken {
    /// Create a token in the not-cancelled state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire the signal. Every pending and future [`cancelled`](Self::cancelled)
    /// wait completes immediately.
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    /// Whether the signal has fired.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Resolve once the signal fires. Resolves immediately if it already has.
    pub async fn cancelled(&self) {
        loop {
            if self.is_cancelled() {
                return;
            }
            let notified = self.inner.notify.notified();
            // Re-check after registering so a cancel between the first check
            // and registration is not missed.
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}
