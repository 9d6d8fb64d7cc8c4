use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::network::{ProbeTimeouts, DEFAULT_ATTEMPTS, DEFAULT_DELAY};
use crate::retry::{Categorized, RetryConfig};

/// Retry policy parameters (`[retry]` section in config.toml).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrySettings {
    /// Maximum number of attempts (including the first). Negative = unlimited.
    pub max_attempts: i64,
    /// Delay in seconds before the first retry (e.g. 0.25 = 250ms).
    pub delay_secs: f64,
    /// Seconds added to the delay after each retry.
    #[serde(default)]
    pub step_secs: f64,
    /// Maximum delay in seconds. Negative = no ceiling.
    #[serde(default = "no_ceiling")]
    pub max_delay_secs: f64,
}

fn no_ceiling() -> f64 {
    -1.0
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_ATTEMPTS,
            delay_secs: DEFAULT_DELAY.as_secs_f64(),
            step_secs: 0.0,
            max_delay_secs: no_ceiling(),
        }
    }
}

impl RetrySettings {
    /// Reject delays that cannot become a `Duration` (negative, non-finite,
    /// or too large).
    pub fn validate(&self) -> Result<()> {
        self.delay()?;
        self.step()?;
        self.max_delay()?;
        Ok(())
    }

    pub fn delay(&self) -> Result<Duration> {
        secs_to_duration("delay_secs", self.delay_secs)
    }

    pub fn step(&self) -> Result<Duration> {
        secs_to_duration("step_secs", self.step_secs)
    }

    /// `None` when `max_delay_secs` is negative (no ceiling).
    pub fn max_delay(&self) -> Result<Option<Duration>> {
        if !self.max_delay_secs.is_finite() {
            bail!("retry.max_delay_secs must be finite, got {}", self.max_delay_secs);
        }
        if self.max_delay_secs < 0.0 {
            return Ok(None);
        }
        secs_to_duration("max_delay_secs", self.max_delay_secs).map(Some)
    }

    /// Copy attempt and delay bounds onto `config`, keeping its
    /// classification, logger and name.
    pub fn apply<E: Categorized>(&self, config: RetryConfig<E>) -> Result<RetryConfig<E>> {
        let config = config
            .attempts(self.max_attempts)
            .delay(self.delay()?)
            .step(self.step()?);
        Ok(match self.max_delay()? {
            Some(max) => config.max_delay(max),
            None => config.no_max_delay(),
        })
    }
}

fn secs_to_duration(name: &str, secs: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(secs)
        .map_err(|e| anyhow!("retry.{} = {} is not a valid delay: {}", name, secs, e))
}

/// Timeouts for `retrykit probe` (`[probe]` section).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeSettings {
    pub connect_timeout_secs: u64,
    pub timeout_secs: u64,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        let t = ProbeTimeouts::default();
        Self {
            connect_timeout_secs: t.connect.as_secs(),
            timeout_secs: t.total.as_secs(),
        }
    }
}

impl ProbeSettings {
    pub fn timeouts(&self) -> ProbeTimeouts {
        ProbeTimeouts {
            connect: Duration::from_secs(self.connect_timeout_secs),
            total: Duration::from_secs(self.timeout_secs),
        }
    }
}

/// Global configuration loaded from `~/.config/retrykit/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RetrykitConfig {
    #[serde(default)]
    pub retry: RetrySettings,
    /// Optional probe timeouts; if missing, built-in defaults are used.
    #[serde(default)]
    pub probe: Option<ProbeSettings>,
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("retrykit")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<RetrykitConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = RetrykitConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from(&path)
}

/// Load and validate configuration from `path`.
pub fn load_from(path: &Path) -> Result<RetrykitConfig> {
    let data = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: RetrykitConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    cfg.retry.validate()?;
    Ok(cfg)
}
