//! Delivery of job payloads to the resolved companion endpoint.
//!
//! One submission performs at most one resolution and one POST. There is no
//! retry loop: a caller that wants to retry calls `deliver` again, and because a
//! transport failure clears the cached endpoint, that retry rediscovers the port.

mod outcome;

pub use outcome::{DeliveryOutcome, HandoffError, UnreachableCause};

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::config::HandoffConfig;
use crate::endpoint::loopback_url;
use crate::payload::{JobPayload, PayloadError};
use crate::probe::LivenessProbe;
use crate::resolver::EndpointResolver;
use crate::transport::{self, TransportError};

/// Sends an encoded payload to a port and reports the HTTP status.
pub trait DeliveryTransport: Send + Sync {
    fn post(
        &self,
        port: u16,
        body: Vec<u8>,
    ) -> impl Future<Output = Result<u32, TransportError>> + Send;
}

/// Production transport: `POST http://127.0.0.1:{port}{delivery_path}` over libcurl.
#[derive(Debug, Clone)]
pub struct CurlTransport {
    delivery_path: String,
    timeout: Duration,
}

impl CurlTransport {
    pub fn new(delivery_path: impl Into<String>, timeout: Duration) -> Self {
        Self {
            delivery_path: delivery_path.into(),
            timeout,
        }
    }

    pub fn from_config(cfg: &HandoffConfig) -> Self {
        Self::new(cfg.delivery_path.clone(), cfg.delivery_timeout())
    }
}

impl DeliveryTransport for CurlTransport {
    async fn post(&self, port: u16, body: Vec<u8>) -> Result<u32, TransportError> {
        let url = loopback_url(port, &self.delivery_path);
        let timeout = self.timeout;
        let resp = transport::blocking(move || transport::post_json(&url, &body, timeout)).await?;
        Ok(resp.status)
    }
}

/// Hands jobs to the companion, invalidating the shared resolver on transport failure.
#[derive(Debug)]
pub struct DeliveryClient<P, T> {
    resolver: Arc<EndpointResolver<P>>,
    transport: T,
}

impl<P: LivenessProbe, T: DeliveryTransport> DeliveryClient<P, T> {
    pub fn new(resolver: Arc<EndpointResolver<P>>, transport: T) -> Self {
        Self { resolver, transport }
    }

    pub fn resolver(&self) -> &Arc<EndpointResolver<P>> {
        &self.resolver
    }

    /// Deliver one job.
    ///
    /// `Err` only for a payload that cannot be sent at all (checked before any
    /// network activity); every network result is a [`DeliveryOutcome`].
    pub async fn deliver(&self, payload: &JobPayload) -> Result<DeliveryOutcome, PayloadError> {
        let body = payload.to_json()?;

        let Some(endpoint) = self.resolver.resolve().await else {
            tracing::info!(url = %payload.target_url, "no companion listening, job not delivered");
            return Ok(DeliveryOutcome::Unreachable(UnreachableCause::NotFound));
        };

        match self.transport.post(endpoint.port, body).await {
            Ok(status) if (200..300).contains(&status) => {
                tracing::info!(port = endpoint.port, url = %payload.target_url, "job delivered");
                Ok(DeliveryOutcome::Success)
            }
            Ok(status) => {
                tracing::warn!(
                    port = endpoint.port,
                    status,
                    url = %payload.target_url,
                    "companion rejected job"
                );
                Ok(DeliveryOutcome::Rejected(status))
            }
            Err(e) => {
                let kind = e.kind();
                tracing::warn!(port = endpoint.port, ?kind, "delivery failed: {}", e);
                self.resolver.invalidate_port(endpoint.port);
                Ok(DeliveryOutcome::Unreachable(UnreachableCause::Transport(kind)))
            }
        }
    }
}
