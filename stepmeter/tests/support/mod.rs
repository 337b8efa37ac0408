//! Shared helpers for the integration tests.
//!
//! Each test binary compiles this module on its own, so everything here that only some
//! binaries need is a public field rather than a method, which keeps `dead_code` quiet.

use core::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use stepmeter::{CancelFlag, ProgressSink};

/// A sink that remembers every update and lets the test request cancellation.
#[derive(Debug, Default)]
pub struct RecordingSink {
    updates: Mutex<Vec<f32>>,
    pub starts: AtomicUsize,
    pub stops: AtomicUsize,
    pub cancel: CancelFlag,
}

impl RecordingSink {
    pub fn updates(&self) -> Vec<f32> {
        self.updates.lock().unwrap().clone()
    }

    pub fn last_update(&self) -> Option<f32> {
        self.updates.lock().unwrap().last().copied()
    }
}

impl ProgressSink for RecordingSink {
    fn update(&self, percent: f32) {
        self.updates.lock().unwrap().push(percent);
    }

    fn set_method_title(&self, _title: &str) {}

    fn set_info(&self, _info: &str) {}

    fn start(&self) {
        let _ = self.starts.fetch_add(1, Ordering::Relaxed);
    }

    fn stop(&self) {
        let _ = self.stops.fetch_add(1, Ordering::Relaxed);
    }

    fn is_cancel_requested(&self) -> bool {
        self.cancel.is_cancelled()
    }
}
