//! Candidate port range and the verified endpoint record.

use std::fmt;
use std::time::SystemTime;

/// Contiguous, ascending set of ports `[base, base + count)` checked for the companion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidatePorts {
    base: u16,
    count: u16,
}

impl CandidatePorts {
    /// Ports that would overflow `u16::MAX` are silently dropped from the range;
    /// `HandoffConfig::validate` rejects such configurations up front.
    pub fn new(base: u16, count: u16) -> Self {
        Self { base, count }
    }

    pub fn base(&self) -> u16 {
        self.base
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Highest port swept, or `None` for an empty range.
    pub fn last(&self) -> Option<u16> {
        self.iter().last()
    }

    /// Ports in sweep order.
    pub fn iter(&self) -> impl Iterator<Item = u16> {
        let end = (u32::from(self.base) + u32::from(self.count)).min(u32::from(u16::MAX) + 1);
        (u32::from(self.base)..end).map(|p| p as u16)
    }
}

/// `49152-49161`, or just the base port for a range of one.
impl fmt::Display for CandidatePorts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.last() {
            Some(last) if last != self.base => write!(f, "{}-{}", self.base, last),
            _ => write!(f, "{}", self.base),
        }
    }
}

/// A port that answered the liveness check correctly at `verified_at`.
///
/// There is no expiry: an endpoint is only ever confirmed stale by the next probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub port: u16,
    pub verified_at: SystemTime,
}

impl Endpoint {
    pub fn verified_now(port: u16) -> Self {
        Self {
            port,
            verified_at: SystemTime::now(),
        }
    }

    /// Base URL for requests to this endpoint, e.g. `http://127.0.0.1:49152`.
    pub fn base_url(&self) -> String {
        loopback_url(self.port, "")
    }
}

/// `http://127.0.0.1:{port}{path}`.
pub fn loopback_url(port: u16, path: &str) -> String {
    format!("http://127.0.0.1:{}{}", port, path)
}
