//! Producer-facing entry point: one resolver, one delivery client, one status channel.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use crate::config::HandoffConfig;
use crate::delivery::{CurlTransport, DeliveryClient, DeliveryOutcome, DeliveryTransport};
use crate::endpoint::Endpoint;
use crate::monitor::{HealthMonitor, MonitorHandle};
use crate::payload::{JobPayload, PayloadError};
use crate::probe::{CurlProbe, LivenessProbe};
use crate::resolver::EndpointResolver;
use crate::status::{LinkStatus, StatusNotifier};

/// Wiring of the discovery and delivery pieces around a shared resolver.
#[derive(Debug)]
pub struct Handoff<P = CurlProbe, T = CurlTransport> {
    client: DeliveryClient<P, T>,
    poll_interval: Duration,
}

impl Handoff {
    /// Build the libcurl-backed stack. The config must already be validated.
    pub fn from_config(cfg: &HandoffConfig) -> Self {
        Self::with_parts(
            CurlProbe::from_config(cfg),
            CurlTransport::from_config(cfg),
            cfg,
        )
    }
}

impl<P: LivenessProbe + 'static, T: DeliveryTransport> Handoff<P, T> {
    pub fn with_parts(probe: P, transport: T, cfg: &HandoffConfig) -> Self {
        let resolver = Arc::new(EndpointResolver::new(
            probe,
            cfg.candidate_ports(),
            StatusNotifier::new(),
        ));
        Self {
            client: DeliveryClient::new(resolver, transport),
            poll_interval: cfg.health_poll_interval(),
        }
    }

    /// Hand one job to the companion. See [`DeliveryClient::deliver`].
    pub async fn submit(&self, payload: &JobPayload) -> Result<DeliveryOutcome, PayloadError> {
        self.client.deliver(payload).await
    }

    pub async fn resolve(&self) -> Option<Endpoint> {
        self.resolver().resolve().await
    }

    pub fn resolver(&self) -> &Arc<EndpointResolver<P>> {
        self.client.resolver()
    }

    pub fn status(&self) -> LinkStatus {
        self.resolver().status()
    }

    /// Observe active/inactive transitions.
    pub fn subscribe(&self) -> watch::Receiver<LinkStatus> {
        self.resolver().notifier().subscribe()
    }

    /// Start the periodic health monitor on the shared resolver.
    pub fn spawn_monitor(&self) -> MonitorHandle {
        HealthMonitor::spawn(Arc::clone(self.resolver()), self.poll_interval)
    }
}
