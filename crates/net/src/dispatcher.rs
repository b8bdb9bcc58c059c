use std::sync::Arc;

use auction_queue::TaskConsumer;
use auction_session::SessionRegistry;

use crate::registry::ConnectionRegistry;

/// Drains the task queue and routes each resulting notification back to its
/// addressee's connection, formatted per the wire protocol's response frame.
///
/// The sole writer of any connection's outbound half once this loop is
/// running, matching §5's "dispatcher is the only writer after startup".
pub struct Dispatcher {
    consumer: TaskConsumer,
    sessions: Arc<SessionRegistry>,
    connections: Arc<ConnectionRegistry>,
}

impl Dispatcher {
    pub fn new(
        consumer: TaskConsumer,
        sessions: Arc<SessionRegistry>,
        connections: Arc<ConnectionRegistry>,
    ) -> Self {
        Self { consumer, sessions, connections }
    }

    pub async fn run(mut self) {
        while let Some(task) = self.consumer.dequeue().await {
            let notification = task.run().await;
            let Some(session_id) = notification.session_id else {
                continue;
            };
            let Some(connection_id) = self.sessions.get_connection_id(session_id) else {
                tracing::debug!(?session_id, "dropping notification: no live connection");
                continue;
            };
            self.connections.send(connection_id, format!("RESP>> {}\nCMD>>", notification.text));
        }
        tracing::warn!("dispatcher exiting: task queue has no remaining producers");
    }
}
