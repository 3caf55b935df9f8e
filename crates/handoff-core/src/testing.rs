//! In-process fakes for resolver, client, and monitor tests.

use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::delivery::DeliveryTransport;
use crate::probe::LivenessProbe;
use crate::transport::TransportError;

#[derive(Debug, Default)]
struct ProbeState {
    live: HashSet<u16>,
    calls: Vec<u16>,
    delay: Duration,
}

/// Prober answering from a fixed set of live ports and recording every call.
#[derive(Debug, Clone, Default)]
pub(crate) struct FakeProbe {
    state: Arc<Mutex<ProbeState>>,
}

impl FakeProbe {
    pub(crate) fn with_live<I: IntoIterator<Item = u16>>(ports: I) -> Self {
        let probe = Self::default();
        probe.set_live(ports);
        probe
    }

    pub(crate) fn with_delay(self, delay: Duration) -> Self {
        self.set_delay(delay);
        self
    }

    pub(crate) fn set_live<I: IntoIterator<Item = u16>>(&self, ports: I) {
        self.state.lock().unwrap().live = ports.into_iter().collect();
    }

    pub(crate) fn set_delay(&self, delay: Duration) {
        self.state.lock().unwrap().delay = delay;
    }

    pub(crate) fn calls(&self) -> Vec<u16> {
        self.state.lock().unwrap().calls.clone()
    }

    pub(crate) fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }
}

impl LivenessProbe for FakeProbe {
    async fn probe(&self, port: u16) -> bool {
        let delay = {
            let mut state = self.state.lock().unwrap();
            state.calls.push(port);
            state.delay
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.state.lock().unwrap().live.contains(&port)
    }
}

/// Scripted reply for one delivery attempt.
#[derive(Debug)]
pub(crate) enum FakeReply {
    Status(u32),
    Fail(curl::Error),
}

#[derive(Debug, Default)]
struct TransportState {
    replies: VecDeque<FakeReply>,
    sent: Vec<(u16, Vec<u8>)>,
}

/// Delivery transport replaying scripted replies (200 once the script runs out).
#[derive(Debug, Clone, Default)]
pub(crate) struct FakeTransport {
    state: Arc<Mutex<TransportState>>,
}

impl FakeTransport {
    pub(crate) fn reply(&self, reply: FakeReply) {
        self.state.lock().unwrap().replies.push_back(reply);
    }

    pub(crate) fn fail_with(&self, code: curl_sys::CURLcode) {
        self.reply(FakeReply::Fail(curl::Error::new(code)));
    }

    pub(crate) fn sent(&self) -> Vec<(u16, Vec<u8>)> {
        self.state.lock().unwrap().sent.clone()
    }
}

impl DeliveryTransport for FakeTransport {
    async fn post(&self, port: u16, body: Vec<u8>) -> Result<u32, TransportError> {
        let mut state = self.state.lock().unwrap();
        state.sent.push((port, body));
        match state.replies.pop_front() {
            Some(FakeReply::Status(code)) => Ok(code),
            Some(FakeReply::Fail(e)) => Err(TransportError::Curl(e)),
            None => Ok(200),
        }
    }
}
