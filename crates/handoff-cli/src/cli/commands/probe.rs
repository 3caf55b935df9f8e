//! `handoff probe <port>` – one liveness check.

use anyhow::Result;
use handoff_core::config::HandoffConfig;
use handoff_core::probe::{CurlProbe, LivenessProbe};

pub async fn run_probe(cfg: &HandoffConfig, port: u16) -> Result<()> {
    let probe = CurlProbe::from_config(cfg);
    let state = if probe.probe(port).await { "live" } else { "not live" };
    println!("{:<6} {}", port, state);
    Ok(())
}
