//! Retry policy engine.
//!
//! Wraps a fallible closure and re-runs it on a linear backoff schedule while
//! the failure is classified as retriable and the attempt budget lasts. The
//! closure's own error is always what the caller gets back; this module only
//! decides *whether* to try again.
//!
//! ```no_run
//! use std::time::Duration;
//! use retrykit::retry::{Classification, RetryConfig};
//!
//! let policy = RetryConfig::<std::io::Error>::new(5)
//!     .delay(Duration::from_millis(100))
//!     .step(Duration::from_millis(100))
//!     .max_delay(Duration::from_secs(1))
//!     .retry_on(Classification::category(std::io::ErrorKind::TimedOut));
//! let text = policy.run(|| std::fs::read_to_string("/proc/loadavg"))?;
//! # Ok::<(), std::io::Error>(())
//! ```

mod classify;
mod log;
mod policy;
mod run;
mod sleep;

pub use classify::{Categorized, Classification};
pub use log::{LoggerProvider, RetryFields, RetryLogger, TracingLogger};
pub use policy::{AttemptState, RetryConfig, RetryDecision, StopReason, UNLIMITED};
pub use run::run_with_retry;
pub use sleep::{Sleeper, ThreadSleeper};
