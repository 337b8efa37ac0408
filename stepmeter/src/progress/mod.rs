//! The progress notification contract
//!
//! Algorithms talk to their caller through a [`ProgressSink`]. The caller decides what a
//! sink does with the notifications: draw a bar, write log lines, or nothing at all.
//!
//! # Implementation Model
//!
//! A sink is a capability set with no state required by this crate. Algorithms usually
//! receive it as `Option<&dyn ProgressSink>`; `None` is a valid collaborator and every
//! call on it is a no-op, so algorithm code never has to null-check.
//!
//! Cancellation is cooperative. The caller flips a [`CancelFlag`] and the algorithm
//! notices the next time it polls [`ProgressSink::is_cancel_requested`].
//!
//! [`LogSink`] is a headless implementation for batch jobs and tests.

mod cancel_flag;
mod log_sink;
mod sink;

pub use cancel_flag::CancelFlag;
pub use log_sink::LogSink;
pub use sink::ProgressSink;
