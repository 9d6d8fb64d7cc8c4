//! Config command: print the effective configuration.

use anyhow::Result;
use retrykit::config::RetrykitConfig;

pub fn run_config(cfg: &RetrykitConfig) -> Result<()> {
    print!("{}", toml::to_string_pretty(cfg)?);
    Ok(())
}
