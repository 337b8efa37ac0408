use super::BatchingPolicy;
use crate::ProgressSink;
use core::fmt::{Debug, Formatter};
use std::sync::{Mutex, PoisonError};

/// Counters shared by every thread reporting steps.
#[derive(Debug, Clone, Copy)]
struct Counters {
    total_steps: u64,
    total_percentage: u32,
    step_threshold: u64,

    /// Accumulated percentage when the current phase began
    base_percent: f64,

    /// Steps of the current phase already folded into the reported percentage
    reported_steps: u64,

    /// Steps received since the last notification
    raw_counter: u64,
}

impl Counters {
    fn new(total_steps: u64, total_percentage: u32, policy: &BatchingPolicy) -> Self {
        assert!(total_steps > 0, "total_steps must be greater than zero");
        assert!(total_percentage > 0, "total_percentage must be greater than zero");

        let step_threshold = policy.step_threshold(total_steps, total_percentage);
        log::debug!("scaled progress to {total_steps} steps over {total_percentage}% (threshold {step_threshold})");

        Self {
            total_steps,
            total_percentage,
            step_threshold,
            base_percent: 0.0,
            reported_steps: 0,
            raw_counter: 0,
        }
    }

    #[expect(clippy::cast_precision_loss, reason = "step counts beyond 2^53 only lose sub-ulp precision")]
    fn percent(&self) -> f64 {
        let reported = self.reported_steps.min(self.total_steps) as f64;
        let phase_percent = f64::from(self.total_percentage) * reported / self.total_steps as f64;
        self.base_percent + phase_percent
    }

    /// Add `n` raw steps, returning the new percentage when the sink is due an update.
    ///
    /// Sums are taken in `u128` so phases sized near `u64::MAX` neither overflow nor drop steps.
    #[expect(clippy::cast_possible_truncation, reason = "the remainder is below step_threshold, a u64")]
    fn advance(&mut self, n: u64) -> Option<f64> {
        let pending = u128::from(self.raw_counter) + u128::from(n);
        let remainder = pending % u128::from(self.step_threshold);
        let mut folded = pending - remainder;
        self.raw_counter = remainder as u64;

        // the tail of a phase may never fill a whole batch; report completion anyway
        let total = u128::from(self.total_steps);
        let reported = u128::from(self.reported_steps) + folded;
        if self.raw_counter > 0 && reported < total && reported + u128::from(self.raw_counter) >= total {
            folded += u128::from(self.raw_counter);
            self.raw_counter = 0;
        }

        if folded == 0 {
            return None;
        }

        // past the end of a phase only the cap matters, so saturating is lossless here
        self.reported_steps = u64::try_from(u128::from(self.reported_steps) + folded).unwrap_or(u64::MAX);
        Some(self.percent())
    }
}

/// Turns a count of discrete algorithm steps into a small number of percentage updates.
///
/// An algorithm that knows it will perform `total_steps` units of work creates a normalizer
/// and calls [`one_step`](Self::one_step) or [`steps`](Self::steps) as work completes. The
/// normalizer batches those calls so the sink only sees roughly one
/// [`update`](ProgressSink::update) per percentage point, however many steps there are.
///
/// The sink is borrowed, not owned, and may be absent. Without a sink the normalizer still
/// counts, so [`percent`](Self::percent) stays meaningful, but never notifies anyone and never
/// reports a cancellation.
///
/// Step reporting takes `&self` and is safe to share across worker threads: increments are
/// serialized by an internal mutex and each batch boundary produces exactly one update
/// carrying the up-to-date percentage. Updates are issued while the mutex is held, so the
/// sink always sees non-decreasing values.
///
/// # Example
///
/// ```
/// use stepmeter::{ProgressSink, StepNormalizer};
///
/// fn checksum(data: &[u8], sink: Option<&dyn ProgressSink>) -> Option<u64> {
///     let progress = StepNormalizer::new(sink, data.len() as u64);
///     let mut sum = 0u64;
///     for &byte in data {
///         sum = sum.wrapping_mul(31).wrapping_add(u64::from(byte));
///         if progress.one_step() {
///             return None;
///         }
///     }
///     Some(sum)
/// }
///
/// assert!(checksum(b"hello", None).is_some());
/// ```
pub struct StepNormalizer<'a> {
    sink: Option<&'a dyn ProgressSink>,
    policy: BatchingPolicy,
    counters: Mutex<Counters>,
}

impl<'a> StepNormalizer<'a> {
    /// Create a normalizer where `total_steps` steps make up 100%.
    ///
    /// # Panics
    ///
    /// Panics if `total_steps` is zero.
    #[must_use]
    pub fn new(sink: Option<&'a dyn ProgressSink>, total_steps: u64) -> Self {
        Self::with_percentage(sink, total_steps, 100)
    }

    /// Create a normalizer where `total_steps` steps make up `total_percentage` percent.
    ///
    /// # Panics
    ///
    /// Panics if `total_steps` or `total_percentage` is zero.
    #[must_use]
    pub fn with_percentage(sink: Option<&'a dyn ProgressSink>, total_steps: u64, total_percentage: u32) -> Self {
        Self::with_policy(sink, total_steps, total_percentage, BatchingPolicy::default())
    }

    /// Create a normalizer using a custom batching policy.
    ///
    /// # Panics
    ///
    /// Panics if `total_steps` or `total_percentage` is zero.
    #[must_use]
    pub fn with_policy(sink: Option<&'a dyn ProgressSink>, total_steps: u64, total_percentage: u32, policy: BatchingPolicy) -> Self {
        Self {
            sink,
            counters: Mutex::new(Counters::new(total_steps, total_percentage, &policy)),
            policy,
        }
    }

    /// Re-scale so that `total_steps` further steps make up `total_percentage` percent.
    ///
    /// With `update_current_progress` false the accumulated percentage restarts at zero.
    /// With it true the accumulated percentage is kept and the new phase adds on top of it,
    /// which lets several sequential phases share one overall progress bar. Steps still
    /// pending below the previous batch threshold are discarded either way.
    ///
    /// # Panics
    ///
    /// Panics if `total_steps` or `total_percentage` is zero.
    pub fn scale(&mut self, total_steps: u64, total_percentage: u32, update_current_progress: bool) {
        let counters = self.counters.get_mut().unwrap_or_else(PoisonError::into_inner);
        let base_percent = if update_current_progress { counters.percent() } else { 0.0 };

        *counters = Counters {
            base_percent,
            ..Counters::new(total_steps, total_percentage, &self.policy)
        };
    }

    /// Re-scale so that `total_steps` further steps make up 100%, starting from zero.
    ///
    /// # Panics
    ///
    /// Panics if `total_steps` is zero.
    pub fn rescale(&mut self, total_steps: u64) {
        self.scale(total_steps, 100, false);
    }

    /// Zero the step counter and accumulated percentage, keeping the current scale.
    pub fn reset(&mut self) {
        let counters = self.counters.get_mut().unwrap_or_else(PoisonError::into_inner);
        counters.base_percent = 0.0;
        counters.reported_steps = 0;
        counters.raw_counter = 0;
    }

    /// Record a single completed step.
    ///
    /// Returns true if the sink asks the algorithm to stop.
    pub fn one_step(&self) -> bool {
        self.steps(1)
    }

    /// Record `n` completed steps.
    ///
    /// Notifies the sink at most once, even if `n` spans several batches. Returns true if the
    /// sink asks the algorithm to stop, so the call doubles as the algorithm's cancellation
    /// checkpoint.
    pub fn steps(&self, n: u64) -> bool {
        {
            let mut counters = self.counters.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(percent) = counters.advance(n) {
                log::trace!("progress at {percent:.2}%");
                if let Some(sink) = self.sink {
                    sink.update(narrow(percent));
                }
            }
        }

        self.is_cancel_requested()
    }

    /// Whether the sink asks the algorithm to stop; always false without a sink.
    #[must_use]
    pub fn is_cancel_requested(&self) -> bool {
        self.sink.is_cancel_requested()
    }

    /// The accumulated percentage as last reported to the sink.
    #[must_use]
    pub fn percent(&self) -> f32 {
        narrow(self.counters().percent())
    }

    /// Raw steps folded into one sink update in the current phase.
    #[must_use]
    pub fn step_threshold(&self) -> u64 {
        self.counters().step_threshold
    }

    /// Percentage contributed by each raw step in the current phase.
    #[must_use]
    #[expect(clippy::cast_precision_loss, reason = "step counts beyond 2^53 only lose sub-ulp precision")]
    pub fn percent_add(&self) -> f32 {
        let counters = self.counters();
        narrow(f64::from(counters.total_percentage) / counters.total_steps as f64)
    }

    /// Number of steps making up the current phase.
    #[must_use]
    pub fn total_steps(&self) -> u64 {
        self.counters().total_steps
    }

    /// The sink this normalizer reports to, if any.
    #[must_use]
    pub fn sink(&self) -> Option<&'a dyn ProgressSink> {
        self.sink
    }

    fn counters(&self) -> Counters {
        *self.counters.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Debug for StepNormalizer<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StepNormalizer")
            .field("sink", &self.sink.map(|_| "<dyn ProgressSink>"))
            .field("policy", &self.policy)
            .field("counters", &self.counters)
            .finish()
    }
}

#[expect(clippy::cast_possible_truncation, reason = "percentages fit comfortably in f32")]
fn narrow(percent: f64) -> f32 {
    percent as f32
}
