//! Defaults for retrying network calls.

use std::sync::Arc;
use std::time::Duration;

use super::classify::is_network_failure;
use super::error::NetworkError;
use crate::retry::{Classification, RetryConfig, RetryLogger};

/// Attempt count used when none is given.
pub const DEFAULT_ATTEMPTS: i64 = 3;
/// Initial delay used when none is given.
pub const DEFAULT_DELAY: Duration = Duration::from_secs(1);

/// Network retry options; anything left unset falls back to the preset.
#[derive(Default)]
pub struct NetworkRetry {
    pub attempts: Option<i64>,
    pub delay: Option<Duration>,
    pub step: Duration,
    pub max_delay: Option<Duration>,
    /// Replaces [`is_network_failure`] when set.
    pub retry_on: Option<Classification<NetworkError>>,
    pub logger: Option<Arc<dyn RetryLogger>>,
}

impl NetworkRetry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempts(mut self, attempts: i64) -> Self {
        self.attempts = Some(attempts);
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn step(mut self, step: Duration) -> Self {
        self.step = step;
        self
    }

    pub fn max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = Some(max_delay);
        self
    }

    pub fn retry_on(mut self, classification: Classification<NetworkError>) -> Self {
        self.retry_on = Some(classification);
        self
    }

    pub fn logger(mut self, logger: Arc<dyn RetryLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Build the executor configuration, filling gaps with the preset defaults.
    pub fn into_config(self) -> RetryConfig<NetworkError> {
        let mut config = RetryConfig::new(self.attempts.unwrap_or(DEFAULT_ATTEMPTS))
            .delay(self.delay.unwrap_or(DEFAULT_DELAY))
            .step(self.step)
            .retry_on(
                self.retry_on
                    .unwrap_or_else(|| Classification::predicate(is_network_failure)),
            );
        if let Some(max_delay) = self.max_delay {
            config = config.max_delay(max_delay);
        }
        if let Some(logger) = self.logger {
            config = config.logger(logger);
        }
        config
    }
}

/// Preset configuration with every default applied.
pub fn retry_config() -> RetryConfig<NetworkError> {
    NetworkRetry::default().into_config()
}
