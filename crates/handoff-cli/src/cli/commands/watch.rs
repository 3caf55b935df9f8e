//! `handoff watch` – run the health monitor and print status changes.

use anyhow::Result;
use handoff_core::config::HandoffConfig;
use handoff_core::{Handoff, LinkStatus};

pub async fn run_watch(cfg: &HandoffConfig) -> Result<()> {
    let handoff = Handoff::from_config(cfg);
    let mut status_rx = handoff.subscribe();
    let monitor = handoff.spawn_monitor();
    println!(
        "Watching ports {} every {} ms (Ctrl-C to stop)",
        handoff.resolver().candidates(),
        cfg.health_poll_interval_ms
    );

    let mut last: Option<LinkStatus> = None;
    loop {
        tokio::select! {
            changed = status_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let status = *status_rx.borrow_and_update();
                if last == Some(status) {
                    continue;
                }
                last = Some(status);
                match (status, handoff.resolver().cached()) {
                    (LinkStatus::Active, Some(ep)) => println!("active   port {}", ep.port),
                    (LinkStatus::Active, None) => println!("active"),
                    (LinkStatus::Inactive, _) => println!("inactive"),
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    monitor.shutdown().await;
    Ok(())
}
