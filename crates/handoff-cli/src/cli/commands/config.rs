//! `handoff config` – print the effective configuration.

use anyhow::Result;
use handoff_core::config::{self, HandoffConfig};

pub fn run_config(cfg: &HandoffConfig) -> Result<()> {
    if let Ok(path) = config::config_path() {
        println!("# {}", path.display());
    }
    print!("{}", toml::to_string_pretty(cfg)?);
    Ok(())
}
