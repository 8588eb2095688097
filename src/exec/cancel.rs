// src/exec/cancel.rs

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cooperative cancellation handle for an in-flight invocation.
///
/// Clones share the same flag, so a clone can be handed to another thread
/// (a UI button, a signal handler) while the runner streams output. The
/// streaming loop checks the flag once per line and clears it when it acts on
/// it, so a request never leaks into the next invocation.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag {
    requested: Arc<AtomicBool>,
}

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation of the current (or next) invocation.
    pub fn cancel(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Clear the flag, returning whether it was set.
    pub fn take(&self) -> bool {
        self.requested.swap(false, Ordering::SeqCst)
    }

    /// Drop a pending request without acting on it.
    ///
    /// The streaming loop only clears the flag when a line arrives, so a
    /// request made against a run that printed nothing is still set when that
    /// run returns. Call this before the next invocation to discard it.
    pub fn reset(&self) {
        self.requested.store(false, Ordering::SeqCst);
    }
}
