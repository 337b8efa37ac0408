#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Progress reporting for long-running algorithms
//!
//! This crate defines the contract an algorithm uses to report how far along it is,
//! without knowing anything about how (or whether) that progress is shown to a user.
//!
//! # Module Organization
//!
//! - [`progress`]: The [`ProgressSink`] trait implemented by presentation layers, plus
//!   a cancellation handle and a headless sink that reports through `log`
//! - [`normalizer`]: The [`StepNormalizer`], which turns "N of M steps done" into a small
//!   number of percentage updates, and the [`BatchingPolicy`] that tunes it
//!
//! # Example
//!
//! ```
//! use stepmeter::{CancelFlag, LogSink, ProgressSink, StepNormalizer};
//!
//! let sink = LogSink::new(CancelFlag::new());
//! sink.set_method_title("Hashing");
//! sink.start();
//!
//! let progress = StepNormalizer::new(Some(&sink), 10_000);
//! for _ in 0..10_000 {
//!     if progress.one_step() {
//!         break;
//!     }
//! }
//!
//! sink.stop();
//! assert!((progress.percent() - 100.0).abs() < 1e-3);
//! ```

/// Result type alias using `ohno::AppError` as the default error type.
pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

pub mod normalizer;
pub mod progress;

pub use crate::normalizer::{BatchingPolicy, StepNormalizer};
pub use crate::progress::{CancelFlag, LogSink, ProgressSink};
