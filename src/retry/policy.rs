use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use super::classify::{Categorized, Classification};
use super::log::RetryLogger;
use super::sleep::{Sleeper, ThreadSleeper};

/// `max_attempts` value that never exhausts; only classification stops the loop.
pub const UNLIMITED: i64 = -1;

/// Why the executor stopped retrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The classification rule rejected the error.
    NonRetriable,
    /// The error was retriable but this was the last permitted attempt.
    Exhausted,
}

/// Decision returned by the retry policy after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Return the error to the caller.
    Stop(StopReason),
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// Per-invocation progress: how many attempts ran and the next backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptState {
    attempts_made: u64,
    current_delay: Duration,
}

impl AttemptState {
    /// State before the first failure. An initial delay above `max_delay` is
    /// clamped so the ceiling holds from the first sleep on.
    pub fn new(initial_delay: Duration, max_delay: Option<Duration>) -> Self {
        Self {
            attempts_made: 1,
            current_delay: clamp(initial_delay, max_delay),
        }
    }

    /// 1-based index of the attempt that just ran.
    pub fn attempts_made(&self) -> u64 {
        self.attempts_made
    }

    /// Delay to sleep before the next attempt.
    pub fn current_delay(&self) -> Duration {
        self.current_delay
    }

    /// Move to the next attempt: linear growth by `step`, capped at `max_delay`.
    pub fn advance(&mut self, step: Duration, max_delay: Option<Duration>) {
        self.attempts_made = self.attempts_made.saturating_add(1);
        self.current_delay = clamp(self.current_delay.saturating_add(step), max_delay);
    }
}

fn clamp(delay: Duration, max_delay: Option<Duration>) -> Duration {
    match max_delay {
        Some(max) => delay.min(max),
        None => delay,
    }
}

/// Immutable retry configuration for one kind of operation.
///
/// `max_attempts` counts the first call; a negative value means unlimited.
/// Between attempts the executor sleeps `delay`, `delay + step`,
/// `delay + 2 * step`, ... capped at `max_delay` when one is set.
pub struct RetryConfig<E: Categorized> {
    pub(super) max_attempts: i64,
    pub(super) initial_delay: Duration,
    pub(super) step: Duration,
    pub(super) max_delay: Option<Duration>,
    pub(super) classification: Classification<E>,
    pub(super) logger: Option<Arc<dyn RetryLogger>>,
    pub(super) name: Option<Cow<'static, str>>,
    pub(super) sleeper: Arc<dyn Sleeper>,
}

impl<E: Categorized> RetryConfig<E> {
    /// No delay, no ceiling, every error retriable, no logger.
    pub fn new(max_attempts: i64) -> Self {
        Self {
            max_attempts,
            initial_delay: Duration::ZERO,
            step: Duration::ZERO,
            max_delay: None,
            classification: Classification::any(),
            logger: None,
            name: None,
            sleeper: Arc::new(ThreadSleeper),
        }
    }

    /// Retry until the classification rule rejects an error.
    pub fn unlimited() -> Self {
        Self::new(UNLIMITED)
    }

    pub fn attempts(mut self, max_attempts: i64) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Delay before the first retry.
    pub fn delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Increment added to the delay after every retry.
    pub fn step(mut self, step: Duration) -> Self {
        self.step = step;
        self
    }

    pub fn max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = Some(max_delay);
        self
    }

    pub fn no_max_delay(mut self) -> Self {
        self.max_delay = None;
        self
    }

    pub fn retry_on(mut self, classification: Classification<E>) -> Self {
        self.classification = classification;
        self
    }

    /// Sink for retry warnings. A [`LoggerProvider`](super::LoggerProvider)
    /// passed to `run_bound` takes precedence over this one.
    pub fn logger(mut self, logger: Arc<dyn RetryLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn without_logger(mut self) -> Self {
        self.logger = None;
        self
    }

    /// Name reported in retry warnings instead of the closure's type name.
    pub fn named(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn max_attempts(&self) -> i64 {
        self.max_attempts
    }

    pub fn is_unlimited(&self) -> bool {
        self.max_attempts < 0
    }

    pub fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    pub fn step_delay(&self) -> Duration {
        self.step
    }

    pub fn max_delay_limit(&self) -> Option<Duration> {
        self.max_delay
    }

    pub fn classification(&self) -> &Classification<E> {
        &self.classification
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Fresh state for one invocation.
    pub fn start(&self) -> AttemptState {
        AttemptState::new(self.initial_delay, self.max_delay)
    }

    /// Decide what to do after `err` failed the attempt recorded in `state`.
    ///
    /// Classification is consulted first, so a non-retriable error stops the
    /// loop even on the last attempt. The exhaustion check comes before any
    /// delay: the final attempt never sleeps.
    pub fn decide(&self, state: &AttemptState, err: &E) -> RetryDecision {
        if !self.classification.needs_retry(err) {
            return RetryDecision::Stop(StopReason::NonRetriable);
        }
        if let Some(limit) = self.attempt_limit() {
            if state.attempts_made() >= limit {
                return RetryDecision::Stop(StopReason::Exhausted);
            }
        }
        RetryDecision::RetryAfter(state.current_delay())
    }

    /// Value reported as "attempts remaining" in every warning of one
    /// invocation: `max_attempts - 1`, not a countdown. `None` when unlimited.
    pub fn attempts_remaining(&self) -> Option<u64> {
        self.attempt_limit().map(|limit| limit.saturating_sub(1))
    }

    fn attempt_limit(&self) -> Option<u64> {
        u64::try_from(self.max_attempts).ok()
    }
}

impl<E: Categorized> Clone for RetryConfig<E> {
    fn clone(&self) -> Self {
        Self {
            max_attempts: self.max_attempts,
            initial_delay: self.initial_delay,
            step: self.step,
            max_delay: self.max_delay,
            classification: self.classification.clone(),
            logger: self.logger.clone(),
            name: self.name.clone(),
            sleeper: Arc::clone(&self.sleeper),
        }
    }
}

impl<E: Categorized> fmt::Debug for RetryConfig<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryConfig")
            .field("max_attempts", &self.max_attempts)
            .field("initial_delay", &self.initial_delay)
            .field("step", &self.step)
            .field("max_delay", &self.max_delay)
            .field("classification", &self.classification)
            .field("logger", &self.logger.is_some())
            .field("name", &self.name)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn timeout() -> io::Error {
        io::Error::new(io::ErrorKind::TimedOut, "timed out")
    }

    #[test]
    fn no_retry_for_unmatched_category() {
        let p = RetryConfig::<io::Error>::new(5)
            .retry_on(Classification::category(io::ErrorKind::ConnectionReset));
        assert_eq!(
            p.decide(&p.start(), &timeout()),
            RetryDecision::Stop(StopReason::NonRetriable)
        );
    }

    #[test]
    fn respects_max_attempts() {
        let p = RetryConfig::<io::Error>::new(3);
        let mut state = p.start();
        assert!(matches!(
            p.decide(&state, &timeout()),
            RetryDecision::RetryAfter(_)
        ));
        state.advance(p.step_delay(), p.max_delay_limit());
        assert!(matches!(
            p.decide(&state, &timeout()),
            RetryDecision::RetryAfter(_)
        ));
        state.advance(p.step_delay(), p.max_delay_limit());
        assert_eq!(
            p.decide(&state, &timeout()),
            RetryDecision::Stop(StopReason::Exhausted)
        );
    }

    #[test]
    fn non_retriable_wins_on_last_attempt() {
        let p = RetryConfig::<io::Error>::new(1)
            .retry_on(Classification::category(io::ErrorKind::ConnectionReset));
        assert_eq!(
            p.decide(&p.start(), &timeout()),
            RetryDecision::Stop(StopReason::NonRetriable)
        );
    }

    #[test]
    fn unlimited_never_exhausts() {
        let p = RetryConfig::<io::Error>::unlimited();
        let mut state = p.start();
        for _ in 0..1000 {
            state.advance(p.step_delay(), p.max_delay_limit());
        }
        assert!(matches!(
            p.decide(&state, &timeout()),
            RetryDecision::RetryAfter(_)
        ));
        assert_eq!(p.attempts_remaining(), None);
    }

    #[test]
    fn zero_attempts_exhausts_after_first_call() {
        let p = RetryConfig::<io::Error>::new(0);
        assert_eq!(
            p.decide(&p.start(), &timeout()),
            RetryDecision::Stop(StopReason::Exhausted)
        );
    }

    #[test]
    fn linear_backoff_grows_and_is_capped() {
        let step = Duration::from_secs(1);
        let max = Some(Duration::from_secs(2));
        let mut state = AttemptState::new(Duration::ZERO, max);
        let mut seen = vec![state.current_delay()];
        for _ in 0..4 {
            state.advance(step, max);
            seen.push(state.current_delay());
        }
        let secs: Vec<u64> = seen.iter().map(Duration::as_secs).collect();
        assert_eq!(secs, vec![0, 1, 2, 2, 2]);
        assert_eq!(state.attempts_made(), 5);
    }

    #[test]
    fn initial_delay_above_ceiling_is_clamped() {
        let state = AttemptState::new(Duration::from_secs(10), Some(Duration::from_secs(3)));
        assert_eq!(state.current_delay(), Duration::from_secs(3));
    }

    #[test]
    fn attempts_remaining_is_constant_budget() {
        assert_eq!(RetryConfig::<io::Error>::new(5).attempts_remaining(), Some(4));
        assert_eq!(RetryConfig::<io::Error>::new(0).attempts_remaining(), Some(0));
    }
}
