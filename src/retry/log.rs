//! Retry warnings: the logger capability, its record, and the object-bound
//! logger override.

use std::fmt;
use std::time::Duration;

/// Structured content of one retry warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryFields<'a> {
    /// Name of the operation being retried.
    pub function: &'a str,
    /// `Debug` rendering of the error's category.
    pub error_category: String,
    /// `Display` rendering of the error.
    pub error: String,
    /// 1-based index of the attempt that failed.
    pub attempt: u64,
    /// `max_attempts - 1`; the same value for every warning of one call.
    /// `None` in unlimited mode.
    pub attempts_remaining: Option<u64>,
    /// Delay about to be slept.
    pub delay: Duration,
}

impl fmt::Display for RetryFields<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "retry: call to {} failed due to {}: {}, retry attempt #{}/",
            self.function, self.error_category, self.error, self.attempt
        )?;
        match self.attempts_remaining {
            Some(n) => write!(f, "{}", n)?,
            None => f.write_str("unlimited")?,
        }
        write!(f, " after {:?}", self.delay)
    }
}

/// Sink for retry warnings.
///
/// `message` is the rendered form of `fields`. Implementations must not rely
/// on being called: absence of a logger is legal.
pub trait RetryLogger: Send + Sync {
    fn warning(&self, message: &str, fields: &RetryFields<'_>);
}

/// Emits retry warnings as `tracing` events with structured fields.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl RetryLogger for TracingLogger {
    fn warning(&self, message: &str, fields: &RetryFields<'_>) {
        tracing::warn!(
            function = fields.function,
            error_category = %fields.error_category,
            error = %fields.error,
            attempt = fields.attempt,
            attempts_remaining = ?fields.attempts_remaining,
            delay = ?fields.delay,
            "{}",
            message
        );
    }
}

/// Implemented by receivers that carry their own logger.
///
/// When an operation is run through
/// [`RetryConfig::run_bound`](super::RetryConfig::run_bound), a `Some` logger
/// from the receiver replaces the configured one for that call. `None` means
/// "no logger of my own" and falls back to the configured logger; it does not
/// silence logging. A receiver that wants no warnings at all should return a
/// logger that discards them.
pub trait LoggerProvider {
    fn logger(&self) -> Option<&dyn RetryLogger>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_render_warning_line() {
        let fields = RetryFields {
            function: "fetch_index",
            error_category: "TimedOut".to_string(),
            error: "read timed out".to_string(),
            attempt: 2,
            attempts_remaining: Some(4),
            delay: Duration::from_secs(3),
        };
        assert_eq!(
            fields.to_string(),
            "retry: call to fetch_index failed due to TimedOut: read timed out, retry attempt #2/4 after 3s"
        );
    }

    #[test]
    fn unlimited_budget_renders_as_word() {
        let fields = RetryFields {
            function: "poll",
            error_category: "Busy".to_string(),
            error: "busy".to_string(),
            attempt: 7,
            attempts_remaining: None,
            delay: Duration::ZERO,
        };
        assert!(fields.to_string().contains("#7/unlimited after 0ns"));
    }
}
