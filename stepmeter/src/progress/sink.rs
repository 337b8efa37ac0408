use std::sync::Arc;

/// A trait for receiving progress notifications from a long-running algorithm.
///
/// Implementations are supplied by the caller (console, GUI, headless) and may be
/// called from several worker threads at once. None of the methods can fail: a sink
/// that hits an internal error must deal with it itself.
///
/// The expected call sequence for one run is:
///
/// 1. [`set_method_title`](Self::set_method_title) / [`set_info`](Self::set_info) (optional)
/// 2. [`start`](Self::start), exactly once
/// 3. any number of [`update`](Self::update), [`set_info`](Self::set_info) and
///    [`is_cancel_requested`](Self::is_cancel_requested) calls
/// 4. [`stop`](Self::stop), exactly once
pub trait ProgressSink: Send + Sync {
    /// Report the current overall progress, between 0.0 and 100.0.
    ///
    /// Whatever happens behind this call may be slow (repainting, for instance), so
    /// algorithms should not call it more than a few hundred times per run. Use a
    /// [`StepNormalizer`](crate::StepNormalizer) to batch fine-grained work.
    fn update(&self, percent: f32);

    /// Set a human-readable label for the running algorithm or phase.
    fn set_method_title(&self, title: &str);

    /// Set free-form text describing what the algorithm is doing.
    fn set_info(&self, info: &str);

    /// Notify that every preliminary piece of information has been sent and the process begins.
    fn start(&self);

    /// Notify that the process has ended, successfully or not.
    fn stop(&self);

    /// Check whether the caller wants the algorithm to halt early.
    ///
    /// Must be cheap, side-effect free and non-blocking. Results of an algorithm that
    /// honours the request may be incomplete.
    fn is_cancel_requested(&self) -> bool;

    /// Whether the title and info text shown to the user can be changed after the fact.
    ///
    /// Purely advisory.
    fn text_can_be_edited(&self) -> bool {
        true
    }
}

/// An absent sink: every notification is dropped and cancellation is never requested.
impl<S: ProgressSink + ?Sized> ProgressSink for Option<&S> {
    fn update(&self, percent: f32) {
        if let Some(sink) = self {
            sink.update(percent);
        }
    }

    fn set_method_title(&self, title: &str) {
        if let Some(sink) = self {
            sink.set_method_title(title);
        }
    }

    fn set_info(&self, info: &str) {
        if let Some(sink) = self {
            sink.set_info(info);
        }
    }

    fn start(&self) {
        if let Some(sink) = self {
            sink.start();
        }
    }

    fn stop(&self) {
        if let Some(sink) = self {
            sink.stop();
        }
    }

    fn is_cancel_requested(&self) -> bool {
        self.is_some_and(ProgressSink::is_cancel_requested)
    }

    fn text_can_be_edited(&self) -> bool {
        self.is_none_or(ProgressSink::text_can_be_edited)
    }
}

macro_rules! forward_progress_sink {
    ($($ptr:ty),+) => {
        $(
            impl<S: ProgressSink + ?Sized> ProgressSink for $ptr {
                fn update(&self, percent: f32) {
                    (**self).update(percent);
                }

                fn set_method_title(&self, title: &str) {
                    (**self).set_method_title(title);
                }

                fn set_info(&self, info: &str) {
                    (**self).set_info(info);
                }

                fn start(&self) {
                    (**self).start();
                }

                fn stop(&self) {
                    (**self).stop();
                }

                fn is_cancel_requested(&self) -> bool {
                    (**self).is_cancel_requested()
                }

                fn text_can_be_edited(&self) -> bool {
                    (**self).text_can_be_edited()
                }
            }
        )+
    };
}

forward_progress_sink!(&S, Box<S>, Arc<S>);
