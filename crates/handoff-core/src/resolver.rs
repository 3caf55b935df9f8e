//! Endpoint resolution: find the port the companion is listening on and cache it.
//!
//! `resolve()` re-checks the cached port first (one probe on the common path) and
//! otherwise sweeps the candidate range in ascending order, stopping at the first
//! live port. At most one resolution runs at a time; see [`EndpointResolver::resolve`]
//! for what overlapping callers observe.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::endpoint::{CandidatePorts, Endpoint};
use crate::probe::LivenessProbe;
use crate::status::{LinkStatus, StatusNotifier};

/// Clears the in-progress flag when dropped, including when a resolve future is
/// cancelled mid-sweep.
struct ScanGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> ScanGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for ScanGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Owns the cached endpoint and the single-flight guard.
///
/// Shared by handle (`Arc`) between the delivery client and the health monitor.
#[derive(Debug)]
pub struct EndpointResolver<P> {
    probe: P,
    candidates: CandidatePorts,
    cache: Mutex<Option<Endpoint>>,
    scanning: AtomicBool,
    status: StatusNotifier,
}

impl<P: LivenessProbe> EndpointResolver<P> {
    pub fn new(probe: P, candidates: CandidatePorts, status: StatusNotifier) -> Self {
        Self {
            probe,
            candidates,
            cache: Mutex::new(None),
            scanning: AtomicBool::new(false),
            status,
        }
    }

    /// Return a live endpoint, or `None` if no candidate port hosts the companion.
    ///
    /// Single-flight is a non-blocking flag, not a wait queue: if another
    /// resolution is already in progress this returns the currently cached value
    /// (possibly stale, possibly `None`) without waiting for the in-flight result.
    /// Callers must tolerate that; awaiting a shared in-flight future would give
    /// overlapping callers a consistent answer but is not what this does.
    pub async fn resolve(&self) -> Option<Endpoint> {
        let Some(_guard) = ScanGuard::acquire(&self.scanning) else {
            let cached = self.cached();
            tracing::debug!(?cached, "resolution already in progress, returning cached endpoint");
            return cached;
        };

        if let Some(cached) = self.cached() {
            if self.probe.probe(cached.port).await {
                return Some(self.refresh(cached.port));
            }
            tracing::info!(port = cached.port, "cached companion port stopped answering");
        }

        self.set_cache(None);
        self.status.inactive();

        for port in self.candidates.iter() {
            if self.probe.probe(port).await {
                let endpoint = Endpoint::verified_now(port);
                self.set_cache(Some(endpoint));
                self.status.active();
                tracing::info!(port, "companion found");
                return Some(endpoint);
            }
        }

        tracing::info!(
            base_port = self.candidates.base(),
            attempts = self.candidates.len(),
            "companion not found on any candidate port"
        );
        self.status.inactive();
        None
    }

    /// Currently cached endpoint, without probing.
    pub fn cached(&self) -> Option<Endpoint> {
        *self.lock_cache()
    }

    /// Forget the cached endpoint unconditionally and signal inactive.
    pub fn invalidate(&self) {
        self.set_cache(None);
        self.status.inactive();
    }

    /// Forget the cached endpoint only if it still points at `port`.
    ///
    /// Returns whether the cache was cleared. A cache that has meanwhile been
    /// replaced by a freshly verified port is left alone.
    pub fn invalidate_port(&self, port: u16) -> bool {
        let cleared = {
            let mut cache = self.lock_cache();
            match *cache {
                Some(ep) if ep.port == port => {
                    *cache = None;
                    true
                }
                _ => false,
            }
        };
        if cleared {
            self.status.inactive();
        }
        cleared
    }

    pub fn is_resolving(&self) -> bool {
        self.scanning.load(Ordering::Acquire)
    }

    pub fn candidates(&self) -> CandidatePorts {
        self.candidates
    }

    pub fn status(&self) -> LinkStatus {
        self.status.current()
    }

    pub fn notifier(&self) -> &StatusNotifier {
        &self.status
    }

    /// Bump `verified_at` after a passing re-check, unless the cache was cleared
    /// or replaced while the probe was in flight.
    fn refresh(&self, port: u16) -> Endpoint {
        let fresh = Endpoint::verified_now(port);
        let mut cache = self.lock_cache();
        if let Some(ep) = cache.as_mut() {
            if ep.port == port {
                *ep = fresh;
            }
        }
        fresh
    }

    fn set_cache(&self, value: Option<Endpoint>) {
        *self.lock_cache() = value;
    }

    fn lock_cache(&self) -> std::sync::MutexGuard<'_, Option<Endpoint>> {
        // The guarded value is a plain Copy scalar, so a poisoned lock still holds a valid state.
        self.cache.lock().unwrap_or_else(|e| e.into_inner())
    }
}
