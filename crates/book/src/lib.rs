//! Indexed collection of live auctions, with the blocking-wait primitive the
//! expiry worker drives.
//!
//! The nearest-expiration field is a hint only, used to bound
//! [`AuctionBook::wait_for_expired`]; [`AuctionBook::collect_expired`]
//! always re-derives it from the remaining live set so it cannot drift.

use std::{collections::HashMap, time::Duration};

use auction_types::{Auction, AuctionId, BidResult, Funds, Item, Username};
use parking_lot::Mutex;
use tokio::{sync::Notify, time::Instant};

struct BookState {
    auctions: HashMap<AuctionId, Auction>,
    next_id: u64,
    nearest_expire: Option<Instant>,
}

impl Default for BookState {
    fn default() -> Self {
        Self { auctions: HashMap::new(), next_id: 0, nearest_expire: None }
    }
}

pub struct AuctionBook {
    state: Mutex<BookState>,
    notify_timer: Notify,
    notify_nonempty: Notify,
}

impl Default for AuctionBook {
    fn default() -> Self {
        Self {
            state: Mutex::new(BookState::default()),
            notify_timer: Notify::new(),
            notify_nonempty: Notify::new(),
        }
    }
}

impl AuctionBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lists `item` at `price`, expiring after `duration`. Always succeeds
    /// barring allocator exhaustion; the `bool` return mirrors the original
    /// fallible signature.
    pub fn add(&self, owner: Username, item: Item, price: Funds, duration: Duration) -> bool {
        let expiration = Instant::now() + duration;
        let mut lower_timeout = false;
        {
            let mut state = self.state.lock();
            let id = AuctionId::new(state.next_id);
            state.next_id += 1;
            state.auctions.insert(id, Auction { id, owner, buyer: None, price, item, expiration });
            if state.nearest_expire.map_or(true, |t| expiration < t) {
                state.nearest_expire = Some(expiration);
                lower_timeout = true;
            }
        }
        if lower_timeout {
            self.notify_timer.notify_one();
        }
        self.notify_nonempty.notify_one();
        true
    }

    /// Owner-before-price tie-break order per the spec: a nonexistent id is
    /// reported before an owner self-bid, which is reported before a
    /// too-low price.
    pub fn bid(&self, id: AuctionId, new_price: Funds, bidder: &str) -> BidResult {
        let mut state = self.state.lock();
        let Some(auction) = state.auctions.get_mut(&id) else {
            return BidResult::DoesNotExist;
        };
        if auction.owner == bidder {
            return BidResult::OwnerBid;
        }
        if new_price <= auction.price {
            return BidResult::TooLowPrice;
        }
        auction.buyer = Some(bidder.to_owned());
        auction.price = new_price;
        BidResult::Successful
    }

    /// Removes and returns every auction whose expiration has passed.
    pub fn collect_expired(&self) -> Vec<Auction> {
        let now = Instant::now();
        let mut state = self.state.lock();
        let expired_ids: Vec<AuctionId> = state
            .auctions
            .iter()
            .filter(|(_, a)| a.expiration <= now)
            .map(|(id, _)| *id)
            .collect();
        let expired = expired_ids
            .into_iter()
            .filter_map(|id| state.auctions.remove(&id))
            .collect();
        state.nearest_expire = state.auctions.values().map(|a| a.expiration).min();
        expired
    }

    /// Blocks until the book is non-empty and its nearest expiration has
    /// passed. Re-checks both conditions after every wakeup, so spurious
    /// wakeups (and an `add()` racing ahead of us) are handled for free.
    pub async fn wait_for_expired(&self) {
        loop {
            let nearest = self.state.lock().nearest_expire;
            match nearest {
                None => self.notify_nonempty.notified().await,
                Some(t) if t > Instant::now() => {
                    tokio::select! {
                        _ = tokio::time::sleep_until(t) => {}
                        _ = self.notify_timer.notified() => {}
                    }
                }
                Some(_) => break,
            }
        }
        loop {
            if !self.state.lock().auctions.is_empty() {
                break;
            }
            self.notify_nonempty.notified().await;
        }
    }

    pub fn printable_list(&self) -> Vec<String> {
        let state = self.state.lock();
        state
            .auctions
            .values()
            .map(|a| {
                format!(
                    "ID: {}; ITEM: {}; OWNER: {}; PRICE: {}; BUYER: {}",
                    a.id,
                    a.item,
                    a.owner,
                    a.price,
                    a.buyer.as_deref().unwrap_or("")
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use assert_matches::assert_matches;
    use auction_types::Funds;

    use super::*;

    #[test]
    fn bid_on_unknown_auction_does_not_exist() {
        let book = AuctionBook::new();
        assert_matches!(book.bid(AuctionId::new(0), Funds::new(1), "bob"), BidResult::DoesNotExist);
    }

    #[test]
    fn owner_bid_is_rejected_before_price_check() {
        let book = AuctionBook::new();
        book.add("alice".into(), "book".into(), Funds::new(5), Duration::from_secs(300));
        // Owner bid fails even with a very high price.
        assert_matches!(book.bid(AuctionId::new(0), Funds::new(9999), "alice"), BidResult::OwnerBid);
    }

    #[test]
    fn equal_price_bid_is_too_low() {
        let book = AuctionBook::new();
        book.add("alice".into(), "book".into(), Funds::new(5), Duration::from_secs(300));
        assert_eq!(book.bid(AuctionId::new(0), Funds::new(5), "bob"), BidResult::TooLowPrice);
    }

    #[test]
    fn successful_bid_replaces_buyer_and_price() {
        let book = AuctionBook::new();
        book.add("alice".into(), "book".into(), Funds::new(5), Duration::from_secs(300));
        assert_eq!(book.bid(AuctionId::new(0), Funds::new(6), "bob"), BidResult::Successful);
        let list = book.printable_list();
        assert_eq!(list.len(), 1);
        assert!(list[0].contains("PRICE: 6"));
        assert!(list[0].contains("BUYER: bob"));
    }

    #[test]
    fn collect_expired_is_empty_before_expiration() {
        let book = AuctionBook::new();
        book.add("alice".into(), "book".into(), Funds::new(5), Duration::from_secs(300));
        assert!(book.collect_expired().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn collect_expired_recomputes_nearest_expiration() {
        let book = AuctionBook::new();
        book.add("alice".into(), "a".into(), Funds::new(1), Duration::from_millis(10));
        book.add("alice".into(), "b".into(), Funds::new(1), Duration::from_secs(60));
        tokio::time::advance(Duration::from_millis(20)).await;
        let expired = book.collect_expired();
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].item, "a");
        // the remaining auction is still there, and the cache was rebuilt from it.
        assert_eq!(book.printable_list().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn wait_for_expired_unblocks_once_due_and_recollects() {
        let book = AuctionBook::new();
        book.add("alice".into(), "book".into(), Funds::new(1), Duration::from_millis(50));
        tokio::time::timeout(Duration::from_secs(5), book.wait_for_expired())
            .await
            .expect("wait_for_expired should unblock once the timer fires");
        let expired = book.collect_expired();
        assert_eq!(expired.len(), 1);
    }
}
