use std::sync::Arc;

use auction_command::CommandExecutor;
use auction_queue::TaskQueue;
use auction_session::SessionRegistry;
use auction_types::{ConnectionId, SessionId};
use futures::{SinkExt, StreamExt};
use tokio::{net::TcpStream, sync::mpsc};
use tokio_util::codec::{Framed, LinesCodec, LinesCodecError};

use crate::{registry::ConnectionRegistry, tasks::CommandTask};

/// Drives one accepted connection until the peer disconnects or a framing
/// error occurs. The read half tokenizes lines and queues a [`CommandTask`]
/// per line; the write half is fed exclusively by the dispatcher through the
/// connection registry, never directly by this loop.
pub async fn handle(
    socket: TcpStream,
    connection_id: ConnectionId,
    session_id: SessionId,
    executor: Arc<CommandExecutor>,
    sessions: Arc<SessionRegistry>,
    connections: Arc<ConnectionRegistry>,
    queue: TaskQueue,
) {
    let framed = Framed::new(socket, LinesCodec::new());
    let (mut sink, mut stream) = framed.split();

    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<String>();
    connections.register(connection_id, outbound_tx);

    let write_task = tokio::spawn(async move {
        while let Some(line) = outbound_rx.recv().await {
            if sink.send(line).await.is_err() {
                break;
            }
        }
    });

    sessions.start_session(session_id, connection_id);
    queue.enqueue(Box::new(CommandTask {
        session_id,
        line: "HELP".to_string(),
        executor: executor.clone(),
    }));

    loop {
        match stream.next().await {
            Some(Ok(line)) => {
                queue.enqueue(Box::new(CommandTask {
                    session_id,
                    line,
                    executor: executor.clone(),
                }));
            }
            Some(Err(LinesCodecError::MaxLineLengthExceeded)) => {
                tracing::debug!(%connection_id, "line exceeded codec limit, closing connection");
                break;
            }
            Some(Err(err)) => {
                tracing::debug!(%connection_id, %err, "connection closed with a socket error");
                break;
            }
            None => break,
        }
    }

    sessions.end_session(session_id);
    connections.unregister(connection_id);
    write_task.abort();
}
