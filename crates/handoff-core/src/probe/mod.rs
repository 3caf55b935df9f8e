//! Liveness probing of a single candidate port.
//!
//! A port is live only if the request completes, the status is 2xx, and the
//! JSON body carries the companion's marker. Every other result, including a
//! timeout, is "not live"; that is the common case for most candidates and is
//! never surfaced as an error.

mod parse;

pub use parse::LivenessMarker;

use std::future::Future;
use std::time::Duration;

use crate::config::HandoffConfig;
use crate::endpoint::loopback_url;
use crate::transport;

/// One bounded health check against one port.
pub trait LivenessProbe: Send + Sync {
    fn probe(&self, port: u16) -> impl Future<Output = bool> + Send;
}

/// Production prober: `GET http://127.0.0.1:{port}{health_path}` over libcurl.
#[derive(Debug, Clone)]
pub struct CurlProbe {
    health_path: String,
    timeout: Duration,
    marker: LivenessMarker,
}

impl CurlProbe {
    pub fn new(health_path: impl Into<String>, timeout: Duration, marker: LivenessMarker) -> Self {
        Self {
            health_path: health_path.into(),
            timeout,
            marker,
        }
    }

    pub fn from_config(cfg: &HandoffConfig) -> Self {
        Self::new(
            cfg.health_path.clone(),
            cfg.probe_timeout(),
            LivenessMarker::new(cfg.liveness_field.clone(), cfg.liveness_value.clone()),
        )
    }
}

impl LivenessProbe for CurlProbe {
    async fn probe(&self, port: u16) -> bool {
        let url = loopback_url(port, &self.health_path);
        let timeout = self.timeout;
        match transport::blocking(move || transport::get(&url, timeout)).await {
            Ok(resp) if resp.is_success() => {
                let live = self.marker.matches(&resp.body);
                if !live {
                    tracing::debug!(port, "port answered without the liveness marker");
                }
                live
            }
            Ok(resp) => {
                tracing::trace!(port, status = resp.status, "probe got non-success status");
                false
            }
            Err(e) => {
                tracing::trace!(port, kind = ?e.kind(), "probe failed: {}", e);
                false
            }
        }
    }
}
