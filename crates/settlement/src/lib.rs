//! The expired-auction processor: a small saga that moves an item and funds
//! between the seller and the winning bidder, with an explicit compensating
//! action for every step that can fail.
//!
//! The ledger only exposes total, non-transactional primitives (§4.1), so
//! rollback has to be hand-rolled here rather than delegated to a
//! transaction manager: each step's failure mode undoes exactly the
//! preceding successful step.

use auction_ledger::AccountLedger;
use auction_session::SessionRegistry;
use auction_types::{Auction, Notification};

/// Finalizes one expired auction and produces the single notification
/// addressed to its seller (dropped downstream if the seller isn't
/// currently logged in).
pub fn process_expired(
    ledger: &AccountLedger,
    sessions: &SessionRegistry,
    auction: Auction,
) -> Notification {
    let seller_session = sessions.get_session_id(&auction.owner);

    let Some(buyer) = auction.buyer else {
        ledger.deposit_item(&auction.owner, auction.item.clone());
        return Notification::maybe_to(
            seller_session,
            format!("Your item: {}, hasn't been sold!", auction.item),
        );
    };

    if !ledger.withdraw_funds(&buyer, auction.price) {
        ledger.deposit_item(&auction.owner, auction.item.clone());
        return Notification::maybe_to(
            seller_session,
            format!(
                "Your item: {}, hasn't been sold! The {buyer} couldn't pay for it!",
                auction.item
            ),
        );
    }

    if !ledger.deposit_funds(&auction.owner, auction.price) {
        // This is the inverse of the withdrawal just above on an unchanged
        // balance, so it cannot fail; if it somehow did, the funds are gone
        // and there is nothing further we can roll back to.
        if !ledger.deposit_funds(&buyer, auction.price) {
            tracing::error!(
                buyer, auction.price = auction.price.get(),
                "refund to buyer failed after seller rejected payment; funds lost"
            );
        }
        ledger.deposit_item(&auction.owner, auction.item.clone());
        return Notification::maybe_to(
            seller_session,
            format!(
                "Your item: {}, hasn't been sold! You didn't accept the payment from {buyer}!",
                auction.item
            ),
        );
    }

    ledger.deposit_item(&buyer, auction.item.clone());
    Notification::maybe_to(
        seller_session,
        format!("Your item: {}, has been sold for {} by {buyer}!", auction.item, auction.price),
    )
}
