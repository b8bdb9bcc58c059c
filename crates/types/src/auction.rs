use tokio::time::Instant;

use crate::{AuctionId, Funds, Item, Username};

/// A live or just-expired auction listing.
///
/// Invariants upheld by `auction-book`: `price` is strictly monotone over
/// bids, `owner != buyer` whenever `buyer` is set, `expiration` is fixed at
/// creation and never mutated.
#[derive(Debug, Clone)]
pub struct Auction {
    pub id: AuctionId,
    pub owner: Username,
    pub buyer: Option<Username>,
    pub price: Funds,
    pub item: Item,
    pub expiration: Instant,
}

/// Outcome of a bid attempt against the auction book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BidResult {
    Successful,
    TooLowPrice,
    OwnerBid,
    DoesNotExist,
}
