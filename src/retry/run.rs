//! Retry loop: run a closure until success or the policy says stop.

use std::any::type_name;
use std::fmt;

use super::classify::Categorized;
use super::log::{LoggerProvider, RetryFields, RetryLogger};
use super::policy::{RetryConfig, RetryDecision};

/// Runs `f` under `config`. Same as [`RetryConfig::run`].
pub fn run_with_retry<T, E, F>(config: &RetryConfig<E>, f: F) -> Result<T, E>
where
    E: Categorized + fmt::Display,
    F: FnMut() -> Result<T, E>,
{
    config.run(f)
}

impl<E> RetryConfig<E>
where
    E: Categorized + fmt::Display,
{
    /// Runs `f` until it succeeds, fails with a non-retriable error, or the
    /// attempt budget is spent. On a retriable failure with budget left,
    /// warns through the configured logger, sleeps, and tries again.
    ///
    /// The returned error is always the one `f` produced on its last attempt.
    pub fn run<T, F>(&self, f: F) -> Result<T, E>
    where
        F: FnMut() -> Result<T, E>,
    {
        let name = self.callable_name::<F>();
        self.execute(name, self.logger.as_deref(), f)
    }

    /// Like [`run`](Self::run), for operations on a receiver that may carry
    /// its own logger. The receiver's logger, if any, overrides the
    /// configured one for this call only.
    pub fn run_bound<R, T, F>(&self, receiver: &R, mut f: F) -> Result<T, E>
    where
        R: LoggerProvider + ?Sized,
        F: FnMut(&R) -> Result<T, E>,
    {
        let name = self.callable_name::<F>();
        let logger: Option<&dyn RetryLogger> = match receiver.logger() {
            Some(own) => Some(own),
            None => self.logger.as_deref(),
        };
        self.execute(name, logger, || f(receiver))
    }

    fn callable_name<F>(&self) -> &str {
        self.name().unwrap_or(type_name::<F>())
    }

    fn execute<T, F>(&self, name: &str, logger: Option<&dyn RetryLogger>, mut f: F) -> Result<T, E>
    where
        F: FnMut() -> Result<T, E>,
    {
        let remaining = self.attempts_remaining();
        let mut state = self.start();
        loop {
            let err = match f() {
                Ok(value) => {
                    tracing::debug!(
                        function = name,
                        attempts = state.attempts_made(),
                        "retry: call succeeded"
                    );
                    return Ok(value);
                }
                Err(e) => e,
            };
            match self.decide(&state, &err) {
                RetryDecision::Stop(reason) => {
                    tracing::debug!(
                        function = name,
                        attempts = state.attempts_made(),
                        ?reason,
                        "retry: giving up: {}",
                        err
                    );
                    return Err(err);
                }
                RetryDecision::RetryAfter(delay) => {
                    if let Some(logger) = logger {
                        let fields = RetryFields {
                            function: name,
                            error_category: format!("{:?}", err.category()),
                            error: err.to_string(),
                            attempt: state.attempts_made(),
                            attempts_remaining: remaining,
                            delay,
                        };
                        logger.warning(&fields.to_string(), &fields);
                    }
                    self.sleeper.sleep(delay);
                    state.advance(self.step, self.max_delay);
                }
            }
        }
    }
}
