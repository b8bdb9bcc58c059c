//! The I/O boundary: accepts connections, frames the line protocol, and
//! routes queued work to the dispatcher and expiry worker.
//!
//! Three long-running loops live here, matching spec's `T_net`, `T_dispatch`,
//! `T_expire`: [`Reactor::run`], [`Dispatcher::run`], [`ExpiryWorker::run`].
//! All three are plain `async fn`s spawned onto the same Tokio runtime rather
//! than OS threads — see the workspace's concurrency-model notes.

mod connection;
mod dispatcher;
mod expiry;
mod reactor;
mod registry;
mod tasks;

pub use dispatcher::Dispatcher;
pub use expiry::ExpiryWorker;
pub use reactor::Reactor;
pub use registry::ConnectionRegistry;
pub use tasks::{CommandTask, SettlementTask};
