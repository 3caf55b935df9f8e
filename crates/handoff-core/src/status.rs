//! Active/inactive signal published to whoever renders companion status.

use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkStatus {
    Active,
    #[default]
    Inactive,
}

impl LinkStatus {
    pub fn is_active(self) -> bool {
        matches!(self, LinkStatus::Active)
    }
}

/// Broadcasts [`LinkStatus`] changes over a watch channel.
///
/// Every emission is a send, so re-affirming `Inactive` still wakes subscribers.
/// Cloning shares the same channel.
#[derive(Debug, Clone)]
pub struct StatusNotifier {
    tx: watch::Sender<LinkStatus>,
}

impl Default for StatusNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusNotifier {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(LinkStatus::Inactive);
        Self { tx }
    }

    pub fn emit(&self, status: LinkStatus) {
        let prev = self.tx.send_replace(status);
        if prev != status {
            tracing::debug!(?prev, ?status, "link status changed");
        }
    }

    pub fn active(&self) {
        self.emit(LinkStatus::Active);
    }

    pub fn inactive(&self) {
        self.emit(LinkStatus::Inactive);
    }

    pub fn current(&self) -> LinkStatus {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<LinkStatus> {
        self.tx.subscribe()
    }
}
