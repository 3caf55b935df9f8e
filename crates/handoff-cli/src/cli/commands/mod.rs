//! CLI command handlers. Each command is in its own file.

mod config;
mod probe;
mod send;
mod status;
mod watch;

pub use config::run_config;
pub use probe::run_probe;
pub use send::{run_send, SendArgs};
#[cfg(test)]
pub(crate) use send::failure_context;
pub use status::run_status;
pub use watch::run_watch;
