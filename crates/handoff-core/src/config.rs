use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::endpoint::CandidatePorts;

/// Reasons a configuration is rejected by [`HandoffConfig::validate`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("max_port_attempts must be at least 1")]
    NoCandidatePorts,
    #[error("candidate range {base}..{base}+{attempts} exceeds the port space")]
    PortRangeOverflow { base: u16, attempts: u16 },
    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),
    #[error("{field} must start with '/', got {value:?}")]
    RelativePath { field: &'static str, value: String },
}

fn default_health_path() -> String {
    "/api/ping".to_string()
}

fn default_delivery_path() -> String {
    "/api/download".to_string()
}

fn default_liveness_field() -> String {
    "status".to_string()
}

fn default_liveness_value() -> String {
    "pidm_active".to_string()
}

/// Global configuration loaded from `~/.config/handoff/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandoffConfig {
    /// First candidate port; the sweep starts here.
    pub base_port: u16,
    /// Number of contiguous candidate ports (at least 1).
    pub max_port_attempts: u16,
    /// Total timeout for one liveness probe, in milliseconds.
    pub probe_timeout_ms: u64,
    /// Total timeout for one delivery POST, in milliseconds.
    pub delivery_timeout_ms: u64,
    /// Interval between health monitor ticks, in milliseconds.
    pub health_poll_interval_ms: u64,
    /// Path answered by the companion's liveness check.
    #[serde(default = "default_health_path")]
    pub health_path: String,
    /// Path accepting job payloads.
    #[serde(default = "default_delivery_path")]
    pub delivery_path: String,
    /// JSON field in the liveness body that identifies the companion.
    #[serde(default = "default_liveness_field")]
    pub liveness_field: String,
    /// Value `liveness_field` must carry for the port to count as live.
    #[serde(default = "default_liveness_value")]
    pub liveness_value: String,
}

impl Default for HandoffConfig {
    fn default() -> Self {
        Self {
            base_port: 49152,
            max_port_attempts: 10,
            probe_timeout_ms: 300,
            delivery_timeout_ms: 5000,
            health_poll_interval_ms: 15_000,
            health_path: default_health_path(),
            delivery_path: default_delivery_path(),
            liveness_field: default_liveness_field(),
            liveness_value: default_liveness_value(),
        }
    }
}

impl HandoffConfig {
    /// Check that the configuration describes a usable candidate range and timeouts.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.max_port_attempts == 0 {
            return Err(ConfigError::NoCandidatePorts);
        }
        let last = u32::from(self.base_port) + u32::from(self.max_port_attempts) - 1;
        if last > u32::from(u16::MAX) {
            return Err(ConfigError::PortRangeOverflow {
                base: self.base_port,
                attempts: self.max_port_attempts,
            });
        }
        if self.probe_timeout_ms == 0 {
            return Err(ConfigError::ZeroDuration("probe_timeout_ms"));
        }
        if self.delivery_timeout_ms == 0 {
            return Err(ConfigError::ZeroDuration("delivery_timeout_ms"));
        }
        if self.health_poll_interval_ms == 0 {
            return Err(ConfigError::ZeroDuration("health_poll_interval_ms"));
        }
        for (field, value) in [
            ("health_path", &self.health_path),
            ("delivery_path", &self.delivery_path),
        ] {
            if !value.starts_with('/') {
                return Err(ConfigError::RelativePath {
                    field,
                    value: value.clone(),
                });
            }
        }
        Ok(())
    }

    /// Candidate ports in sweep order. Only meaningful after `validate()` succeeds.
    pub fn candidate_ports(&self) -> CandidatePorts {
        CandidatePorts::new(self.base_port, self.max_port_attempts)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn delivery_timeout(&self) -> Duration {
        Duration::from_millis(self.delivery_timeout_ms)
    }

    pub fn health_poll_interval(&self) -> Duration {
        Duration::from_millis(self.health_poll_interval_ms)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("handoff")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load and validate configuration from a specific file.
pub fn load_from_path(path: &Path) -> Result<HandoffConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("read config: {}", path.display()))?;
    let cfg: HandoffConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<HandoffConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = HandoffConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from_path(&path)
}
