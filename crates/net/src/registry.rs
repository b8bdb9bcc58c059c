use std::collections::HashMap;

use auction_types::ConnectionId;
use parking_lot::Mutex;
use tokio::sync::mpsc;

/// Maps a live connection to the channel that feeds its write half.
///
/// Registration happens once at accept time and is torn down once the
/// connection's read loop exits; the dispatcher is the only reader of this
/// map after that, so a notification addressed to a connection that has
/// already closed is silently dropped rather than treated as an error.
#[derive(Default)]
pub struct ConnectionRegistry {
    senders: Mutex<HashMap<ConnectionId, mpsc::UnboundedSender<String>>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, id: ConnectionId, sender: mpsc::UnboundedSender<String>) {
        self.senders.lock().insert(id, sender);
    }

    pub fn unregister(&self, id: ConnectionId) {
        self.senders.lock().remove(&id);
    }

    /// Queues `line` for the connection's write half. A missing or closed
    /// connection is not an error: the addressee is simply no longer there.
    pub fn send(&self, id: ConnectionId, line: String) {
        let senders = self.senders.lock();
        if let Some(sender) = senders.get(&id) {
            let _ = sender.send(line);
        }
    }
}
