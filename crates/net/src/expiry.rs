use std::sync::Arc;

use auction_book::AuctionBook;
use auction_ledger::AccountLedger;
use auction_queue::TaskQueue;
use auction_session::SessionRegistry;

use crate::tasks::SettlementTask;

/// Loops forever: block until the book's nearest expiration has passed, pull
/// every auction that's now due, and queue each for settlement.
pub struct ExpiryWorker {
    book: Arc<AuctionBook>,
    ledger: Arc<AccountLedger>,
    sessions: Arc<SessionRegistry>,
    queue: TaskQueue,
}

impl ExpiryWorker {
    pub fn new(
        book: Arc<AuctionBook>,
        ledger: Arc<AccountLedger>,
        sessions: Arc<SessionRegistry>,
        queue: TaskQueue,
    ) -> Self {
        Self { book, ledger, sessions, queue }
    }

    pub async fn run(self) {
        loop {
            self.book.wait_for_expired().await;
            for auction in self.book.collect_expired() {
                tracing::debug!(auction_id = %auction.id, "auction expired");
                self.queue.enqueue(Box::new(SettlementTask {
                    ledger: self.ledger.clone(),
                    sessions: self.sessions.clone(),
                    auction,
                }));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use auction_types::Funds;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn expired_auction_is_queued_for_settlement() {
        let book = Arc::new(AuctionBook::new());
        let ledger = Arc::new(AccountLedger::new());
        let sessions = Arc::new(SessionRegistry::new());
        book.add("alice".into(), "hat".into(), Funds::new(5), Duration::from_millis(10));

        let (queue, mut consumer) = auction_queue::channel();
        let worker = ExpiryWorker::new(book, ledger, sessions, queue);
        let handle = tokio::spawn(worker.run());

        tokio::time::advance(Duration::from_millis(20)).await;
        let notif = tokio::time::timeout(Duration::from_secs(5), async {
            consumer.dequeue().await.unwrap().run().await
        })
        .await
        .expect("settlement task should be queued once the auction expires");
        assert_eq!(notif.text, "Your item: hat, hasn't been sold!");

        handle.abort();
    }
}
