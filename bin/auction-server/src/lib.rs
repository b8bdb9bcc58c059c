//! Wiring for the auction server binary, factored out of `main` so
//! integration tests can stand up a real server on an ephemeral port.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use auction_book::AuctionBook;
use auction_command::CommandExecutor;
use auction_ledger::AccountLedger;
use auction_net::{ConnectionRegistry, Dispatcher, ExpiryWorker, Reactor};
use auction_session::SessionRegistry;
use auction_types::Funds;

/// Tunables that would otherwise come from the binary's CLI flags; split out
/// so tests can construct one without going through `clap`.
pub struct ServerConfig {
    pub port: u16,
    pub listing_fee: u64,
    pub default_auction_secs: u64,
    pub max_connections: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 0, listing_fee: 1, default_auction_secs: 300, max_connections: 100 }
    }
}

/// The long-running pieces of a bound server: a [`Reactor`] ready to `run()`,
/// plus the dispatcher and expiry worker that must run alongside it.
pub struct Server {
    pub reactor: Reactor,
    pub dispatcher: Dispatcher,
    pub expiry_worker: ExpiryWorker,
}

impl Server {
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.reactor.local_addr()
    }

    /// Spawns the dispatcher and expiry worker, then runs the reactor's
    /// accept loop on the current task until it returns (it normally never
    /// does; callers `select!` it against a shutdown signal).
    pub async fn run(self) {
        tokio::spawn(self.dispatcher.run());
        tokio::spawn(self.expiry_worker.run());
        self.reactor.run().await;
    }
}

pub async fn bind(config: ServerConfig) -> eyre::Result<Server> {
    let ledger = Arc::new(AccountLedger::new());
    let sessions = Arc::new(SessionRegistry::new());
    let book = Arc::new(AuctionBook::new());
    let connections = Arc::new(ConnectionRegistry::new());
    let executor = Arc::new(CommandExecutor::new(
        ledger.clone(),
        sessions.clone(),
        book.clone(),
        Funds::new(config.listing_fee),
        Duration::from_secs(config.default_auction_secs),
    ));

    let (queue, consumer) = auction_queue::channel();
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let reactor = Reactor::bind(
        addr,
        executor,
        sessions.clone(),
        connections.clone(),
        queue.clone(),
        config.max_connections,
    )
    .await?;

    let dispatcher = Dispatcher::new(consumer, sessions.clone(), connections);
    let expiry_worker = ExpiryWorker::new(book, ledger, sessions, queue);

    Ok(Server { reactor, dispatcher, expiry_worker })
}
