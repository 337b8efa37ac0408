//! Step counting on top of a [`ProgressSink`](crate::ProgressSink)
//!
//! Algorithms rarely think in percentages. They know they have to visit a million points or
//! merge ten thousand cells, and a sink wants at most a few hundred updates per run. The
//! [`StepNormalizer`] sits in between.
//!
//! # Implementation Model
//!
//! A phase is described by a step count and the share of the overall percentage it covers.
//! Each raw step is worth `total_percentage / total_steps` percent, and the
//! [`BatchingPolicy`] decides how many raw steps are folded into a single sink update.
//! Phases can be chained with [`StepNormalizer::scale`] so that one progress bar covers
//! several passes of an algorithm.

mod batching_policy;
mod step_normalizer;

pub use batching_policy::BatchingPolicy;
pub use step_normalizer::StepNormalizer;
