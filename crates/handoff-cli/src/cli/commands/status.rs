//! `handoff status` – locate the companion once.

use anyhow::Result;
use handoff_core::config::HandoffConfig;
use handoff_core::Handoff;

pub async fn run_status(cfg: &HandoffConfig) -> Result<()> {
    let handoff = Handoff::from_config(cfg);
    match handoff.resolve().await {
        Some(ep) => println!("Companion active at {}", ep.base_url()),
        None => println!(
            "Companion not found on ports {}. Launch it and try again.",
            handoff.resolver().candidates()
        ),
    }
    Ok(())
}
