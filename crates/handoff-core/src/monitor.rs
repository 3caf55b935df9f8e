//! Health monitor: background task that re-resolves the companion on a fixed interval.
//!
//! Keeps the cached endpoint fresh and the link status accurate between job
//! submissions. It goes through the same single-flight guard as on-demand
//! resolution, so a tick that overlaps a submission just reads the cache.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::probe::LivenessProbe;
use crate::resolver::EndpointResolver;

/// Handle to a running monitor. Dropping it also stops the monitor.
#[derive(Debug)]
pub struct MonitorHandle {
    handle: JoinHandle<()>,
    shutdown_tx: watch::Sender<bool>,
}

impl MonitorHandle {
    /// Signal the loop to stop and wait for it. An in-flight sweep is abandoned.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        let _ = self.handle.await;
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}

pub struct HealthMonitor;

impl HealthMonitor {
    /// Start ticking immediately, then every `interval`.
    pub fn spawn<P>(resolver: Arc<EndpointResolver<P>>, interval: Duration) -> MonitorHandle
    where
        P: LivenessProbe + 'static,
    {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(async move {
            run_health_loop(resolver, interval, shutdown_rx).await;
        });
        info!(interval_ms = interval.as_millis() as u64, "health monitor started");
        MonitorHandle {
            handle,
            shutdown_tx,
        }
    }
}

async fn run_health_loop<P: LivenessProbe>(
    resolver: Arc<EndpointResolver<P>>,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last_port = resolver.cached().map(|e| e.port);

    loop {
        // A closed channel (handle dropped) counts as shutdown too.
        tokio::select! {
            _ = shutdown.changed() => break,
            _ = ticker.tick() => {}
        }
        let endpoint = tokio::select! {
            _ = shutdown.changed() => break,
            endpoint = resolver.resolve() => endpoint,
        };

        let port = endpoint.map(|e| e.port);
        if port != last_port {
            match port {
                Some(port) => info!(port, "health check: companion active"),
                None => info!("health check: companion inactive"),
            }
            last_port = port;
        } else {
            debug!(?port, "health check: unchanged");
        }
    }
    debug!("health monitor shutting down");
}
