use core::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation handle shared between a sink and the code that owns it.
///
/// Clones share state: the UI keeps one clone to call [`cancel`](Self::cancel) while the
/// sink answers [`ProgressSink::is_cancel_requested`](crate::ProgressSink::is_cancel_requested)
/// from another.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Creates a new flag in the non-cancelled state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Withdraws a cancellation request so the flag can be reused for another run.
    pub fn clear(&self) {
        self.0.store(false, Ordering::Release);
    }

    /// Returns true when cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}
