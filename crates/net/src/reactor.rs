use std::{
    net::SocketAddr,
    sync::{
        atomic::{AtomicU64, AtomicUsize, Ordering},
        Arc,
    },
};

use auction_command::CommandExecutor;
use auction_queue::TaskQueue;
use auction_session::SessionRegistry;
use auction_types::{ConnectionId, ServerError, SessionId};
use tokio::net::TcpListener;

use crate::{connection, registry::ConnectionRegistry};

/// Accepts TCP connections and spawns one task per connection, enforcing a
/// soft cap on concurrently active connections (spec's "accepts up to ~100
/// concurrent connections by convention" — beyond that a new connection is
/// declined immediately rather than relying solely on the OS backlog).
pub struct Reactor {
    listener: TcpListener,
    executor: Arc<CommandExecutor>,
    sessions: Arc<SessionRegistry>,
    connections: Arc<ConnectionRegistry>,
    queue: TaskQueue,
    max_connections: usize,
}

impl Reactor {
    pub async fn bind(
        addr: SocketAddr,
        executor: Arc<CommandExecutor>,
        sessions: Arc<SessionRegistry>,
        connections: Arc<ConnectionRegistry>,
        queue: TaskQueue,
        max_connections: usize,
    ) -> Result<Self, ServerError> {
        let listener =
            TcpListener::bind(addr).await.map_err(|e| ServerError::BindFailure(e.to_string()))?;
        Ok(Self { listener, executor, sessions, connections, queue, max_connections })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub async fn run(self) {
        let active = Arc::new(AtomicUsize::new(0));
        let next_id = Arc::new(AtomicU64::new(0));

        loop {
            let (socket, peer) = match self.listener.accept().await {
                Ok(accepted) => accepted,
                Err(err) => {
                    tracing::warn!(%err, "accept failed");
                    continue;
                }
            };

            if active.load(Ordering::Acquire) >= self.max_connections {
                tracing::warn!(%peer, "rejecting connection: at max-connections cap");
                drop(socket);
                continue;
            }
            active.fetch_add(1, Ordering::AcqRel);

            let id = next_id.fetch_add(1, Ordering::Relaxed);
            let connection_id = ConnectionId::new(id);
            let session_id = SessionId::new(id);
            tracing::info!(%connection_id, %peer, "connection accepted");

            let executor = self.executor.clone();
            let sessions = self.sessions.clone();
            let connections = self.connections.clone();
            let queue = self.queue.clone();
            let active = active.clone();

            tokio::spawn(async move {
                connection::handle(
                    socket,
                    connection_id,
                    session_id,
                    executor,
                    sessions,
                    connections,
                    queue,
                )
                .await;
                active.fetch_sub(1, Ordering::AcqRel);
                tracing::info!(%connection_id, "connection closed");
            });
        }
    }
}
