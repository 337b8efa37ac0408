use super::{CancelFlag, ProgressSink};
use core::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

/// Marks "nothing reported yet". A NaN bit pattern, so no real percentage collides with it.
const NO_PERCENT: u32 = u32::MAX;

/// A headless sink that reports progress through the `log` facade.
///
/// Lifecycle events, titles and info text are logged at `info`, percentage updates at
/// `debug`. Repeated updates carrying the same percentage are dropped. Since log lines
/// can't be rewritten once emitted, [`text_can_be_edited`](ProgressSink::text_can_be_edited)
/// returns false.
#[derive(Debug)]
pub struct LogSink {
    title: Mutex<String>,
    last_percent: AtomicU32,
    logged_updates: AtomicU64,
    cancel: CancelFlag,
}

impl LogSink {
    /// Create a sink whose cancellation state is driven by `cancel`.
    #[must_use]
    pub fn new(cancel: CancelFlag) -> Self {
        Self {
            title: Mutex::new(String::new()),
            last_percent: AtomicU32::new(NO_PERCENT),
            logged_updates: AtomicU64::new(0),
            cancel,
        }
    }

    /// The current method title.
    #[must_use]
    pub fn title(&self) -> String {
        self.title.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// The last percentage that was logged during the current run, if any.
    #[must_use]
    pub fn last_percent(&self) -> Option<f32> {
        let bits = self.last_percent.load(Ordering::Relaxed);
        (bits != NO_PERCENT).then(|| f32::from_bits(bits))
    }

    /// Number of percentage updates that produced a log line, across all runs.
    #[must_use]
    pub fn logged_updates(&self) -> u64 {
        self.logged_updates.load(Ordering::Relaxed)
    }

    fn prefix(&self) -> String {
        let title = self.title.lock().unwrap_or_else(PoisonError::into_inner);
        if title.is_empty() { "progress".to_string() } else { title.clone() }
    }
}

impl ProgressSink for LogSink {
    fn update(&self, percent: f32) {
        let bits = percent.to_bits();
        if self.last_percent.swap(bits, Ordering::Relaxed) == bits {
            return;
        }

        let _ = self.logged_updates.fetch_add(1, Ordering::Relaxed);
        log::debug!("{}: {percent:.1}%", self.prefix());
    }

    fn set_method_title(&self, title: &str) {
        title.clone_into(&mut self.title.lock().unwrap_or_else(PoisonError::into_inner));
    }

    fn set_info(&self, info: &str) {
        log::info!("{}: {info}", self.prefix());
    }

    fn start(&self) {
        self.last_percent.store(NO_PERCENT, Ordering::Relaxed);
        log::info!("{}: started", self.prefix());
    }

    fn stop(&self) {
        if self.cancel.is_cancelled() {
            log::warn!("{}: cancelled", self.prefix());
        } else {
            log::info!("{}: finished", self.prefix());
        }
    }

    fn is_cancel_requested(&self) -> bool {
        self.cancel.is_cancelled()
    }

    fn text_can_be_edited(&self) -> bool {
        false
    }
}
