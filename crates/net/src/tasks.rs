use std::sync::Arc;

use auction_command::CommandExecutor;
use auction_ledger::AccountLedger;
use auction_session::SessionRegistry;
use auction_types::{Auction, Notification, SessionId};

/// One protocol line from one connection, queued by the reactor for the
/// dispatcher to run against the shared ledger/session/book state.
pub struct CommandTask {
    pub session_id: SessionId,
    pub line: String,
    pub executor: Arc<CommandExecutor>,
}

#[async_trait::async_trait]
impl auction_queue::Task for CommandTask {
    async fn run(self: Box<Self>) -> Notification {
        self.executor.execute(self.session_id, &self.line)
    }
}

/// One expired auction, queued by the expiry worker for the dispatcher to
/// settle.
pub struct SettlementTask {
    pub ledger: Arc<AccountLedger>,
    pub sessions: Arc<SessionRegistry>,
    pub auction: Auction,
}

#[async_trait::async_trait]
impl auction_queue::Task for SettlementTask {
    async fn run(self: Box<Self>) -> Notification {
        let SettlementTask { ledger, sessions, auction } = *self;
        auction_settlement::process_expired(&ledger, &sessions, auction)
    }
}
