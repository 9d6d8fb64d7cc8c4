//! Probe command: HEAD a URL under the network retry preset.

use anyhow::{Context, Result};
use retrykit::config::{RetrySettings, RetrykitConfig};
use retrykit::network;
use retrykit::retry::TracingLogger;
use std::sync::Arc;

/// Command-line values that take precedence over `[retry]` in config.toml.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProbeOverrides {
    pub attempts: Option<i64>,
    pub delay: Option<f64>,
    pub step: Option<f64>,
    pub max_delay: Option<f64>,
}

impl ProbeOverrides {
    pub fn merge(&self, base: &RetrySettings) -> RetrySettings {
        RetrySettings {
            max_attempts: self.attempts.unwrap_or(base.max_attempts),
            delay_secs: self.delay.unwrap_or(base.delay_secs),
            step_secs: self.step.unwrap_or(base.step_secs),
            max_delay_secs: self.max_delay.unwrap_or(base.max_delay_secs),
        }
    }
}

/// Probe `url`, printing the final status line and headers of interest.
pub fn run_probe(cfg: &RetrykitConfig, url: &str, overrides: &ProbeOverrides) -> Result<()> {
    let settings = overrides.merge(&cfg.retry);
    let policy = settings
        .apply(network::retry_config())?
        .logger(Arc::new(TracingLogger))
        .named("probe");
    let timeouts = cfg.probe.clone().unwrap_or_default().timeouts();

    tracing::info!(url, ?settings, "probe");
    let result = policy
        .run(|| network::probe(url, &timeouts))
        .with_context(|| format!("probe {}", url))?;

    println!("{}", result.status_line);
    if let Some(len) = result.content_length {
        println!("content-length: {}", len);
    }
    if let Some(ct) = &result.content_type {
        println!("content-type: {}", ct);
    }
    Ok(())
}
