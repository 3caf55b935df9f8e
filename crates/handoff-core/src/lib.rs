//! Discovery of a local companion process on a small set of loopback ports, and
//! delivery of download jobs to it.

pub mod config;
pub mod logging;

pub mod delivery;
pub mod endpoint;
pub mod handoff;
pub mod monitor;
pub mod payload;
pub mod probe;
pub mod resolver;
pub mod status;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use delivery::{DeliveryOutcome, HandoffError, UnreachableCause};
pub use endpoint::Endpoint;
pub use handoff::Handoff;
pub use payload::JobPayload;
pub use status::LinkStatus;
