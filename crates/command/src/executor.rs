use std::sync::Arc;

use auction_book::AuctionBook;
use auction_ledger::AccountLedger;
use auction_session::SessionRegistry;
use auction_types::{BidResult, Funds, Notification, SessionId};

use crate::parser::{self, Command};

const HELP_TEXT: &str = "\
HELP
LOGIN <user>
LOGOUT
DEPOSIT FUNDS <n>
DEPOSIT ITEM <item>
WITHDRAW FUNDS <n>
WITHDRAW ITEM <item>
SELL <item> <price> [<secs>]
BID <auction-id> <price>
SHOW FUNDS
SHOW ITEMS
SHOW SALES";

/// Turns one parsed command from a session into exactly one notification
/// addressed back to that session, mutating the ledger/book as needed.
///
/// Every command but HELP, LOGIN, LOGOUT, and an unrecognized command
/// requires an authenticated session; the uniform failure for those is
/// "You are not logged in!" and the command is not executed.
pub struct CommandExecutor {
    ledger: Arc<AccountLedger>,
    sessions: Arc<SessionRegistry>,
    book: Arc<AuctionBook>,
    listing_fee: Funds,
    default_auction_duration: std::time::Duration,
}

const NOT_LOGGED_IN: &str = "You are not logged in!";

impl CommandExecutor {
    pub fn new(
        ledger: Arc<AccountLedger>,
        sessions: Arc<SessionRegistry>,
        book: Arc<AuctionBook>,
        listing_fee: Funds,
        default_auction_duration: std::time::Duration,
    ) -> Self {
        Self { ledger, sessions, book, listing_fee, default_auction_duration }
    }

    pub fn execute(&self, session_id: SessionId, line: &str) -> Notification {
        let reply = |text: String| Notification::to(session_id, text);

        match parser::parse(line) {
            Command::Help => reply(HELP_TEXT.to_string()),
            Command::Unknown(line) => reply(format!("WRONG COMMAND: {line}")),
            Command::Login(username) => {
                if self.sessions.login(session_id, username.clone()) {
                    reply(format!("Welcome {username}!"))
                } else {
                    reply(format!("Couldn't login as {username}!"))
                }
            }
            Command::Logout => {
                let username = self.sessions.get_username(session_id);
                if self.sessions.logout(session_id) {
                    reply(format!("Good bay, {}!", username.expect("logout succeeded")))
                } else {
                    reply(NOT_LOGGED_IN.to_string())
                }
            }
            command => {
                let Some(username) = self.sessions.get_username(session_id) else {
                    return reply(NOT_LOGGED_IN.to_string());
                };
                reply(self.execute_authenticated(&username, command))
            }
        }
    }

    fn execute_authenticated(&self, username: &str, command: Command) -> String {
        match command {
            Command::DepositFunds(Ok(amount)) => {
                if self.ledger.deposit_funds(username, amount) {
                    format!("Successful deposition of funds: {amount}!")
                } else {
                    "Deposition of funds has failed! Invalid amount!".to_string()
                }
            }
            Command::DepositFunds(Err(())) => {
                "Deposition of funds has failed! Invalid amount!".to_string()
            }
            Command::DepositItem(item) => {
                self.ledger.deposit_item(username, item.clone());
                format!("Successful deposition of item: {item}!")
            }
            Command::WithdrawFunds(Ok(amount)) => {
                if self.ledger.withdraw_funds(username, amount) {
                    format!("Successfully withdrawn: {amount}!")
                } else {
                    "Withdrawal of funds has failed! Insufficient funds!".to_string()
                }
            }
            Command::WithdrawFunds(Err(())) => {
                "Withdrawal of funds has failed! Invalid amount!".to_string()
            }
            Command::WithdrawItem(item) => {
                if self.ledger.withdraw_item(username, &item) {
                    format!("Successfully withdrawn item: {item}!")
                } else {
                    format!("Withdrawal of an item has failed! No such item: {item}!")
                }
            }
            Command::Sell { item, price, duration } => {
                self.sell(username, item, price, duration.unwrap_or(self.default_auction_duration))
            }
            Command::Bid { auction_id, price } => match self.book.bid(auction_id, price, username) {
                BidResult::Successful => format!("You are winning the auction {auction_id}!"),
                BidResult::TooLowPrice => {
                    format!("Your offer for the auction {auction_id} was too low!")
                }
                BidResult::OwnerBid => {
                    format!("You can't bid on the auction {auction_id}, you are the seller!")
                }
                BidResult::DoesNotExist => "There is no such auction!".to_string(),
            },
            Command::ShowFunds => format!("{}", self.ledger.get_funds(username)),
            Command::ShowItems => self.ledger.get_items(username),
            Command::ShowSales => self.book.printable_list().join("\n"),
            Command::Help | Command::Unknown(_) | Command::Login(_) | Command::Logout => {
                unreachable!("handled before authentication gate")
            }
        }
    }

    /// Withdraw item, withdraw the listing fee, insert the auction — each
    /// step compensates the previous one on failure.
    fn sell(
        &self,
        username: &str,
        item: String,
        price: Funds,
        duration: std::time::Duration,
    ) -> String {
        if !self.ledger.withdraw_item(username, &item) {
            return format!("You can't sell your item, there is no {item}!");
        }
        if !self.ledger.withdraw_funds(username, self.listing_fee) {
            self.ledger.deposit_item(username, item.clone());
            return "You can't sell your item, you don't have funds to cover the fee!".to_string();
        }
        if !self.book.add(username.to_string(), item.clone(), price, duration) {
            self.ledger.deposit_item(username, item.clone());
            if !self.ledger.deposit_funds(username, self.listing_fee) {
                tracing::error!(
                    username, fee = self.listing_fee.get(),
                    "listing fee refund failed after auction creation failed; funds lost"
                );
            }
            return format!("You can't sell your item {item}, a server error occurred!");
        }
        format!("Your item {item} is being auctioned off!")
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use auction_types::Funds;

    use super::*;

    fn executor() -> (CommandExecutor, Arc<SessionRegistry>) {
        let ledger = Arc::new(AccountLedger::new());
        let sessions = Arc::new(SessionRegistry::new());
        let book = Arc::new(AuctionBook::new());
        (
            CommandExecutor::new(ledger, sessions.clone(), book, Funds::new(1), Duration::from_secs(300)),
            sessions,
        )
    }

    #[test]
    fn unknown_command_is_echoed() {
        let (exec, sessions) = executor();
        sessions.start_session(SessionId::new(1), auction_types::ConnectionId::new(1));
        let notif = exec.execute(SessionId::new(1), "FOO");
        assert_eq!(notif.text, "WRONG COMMAND: FOO");
    }

    #[test]
    fn unauthenticated_gate_blocks_privileged_commands() {
        let (exec, sessions) = executor();
        sessions.start_session(SessionId::new(1), auction_types::ConnectionId::new(1));
        let notif = exec.execute(SessionId::new(1), "DEPOSIT FUNDS 100");
        assert_eq!(notif.text, "You are not logged in!");
    }

    #[test]
    fn login_conflict_reports_failure_and_keeps_first_session() {
        let (exec, sessions) = executor();
        sessions.start_session(SessionId::new(1), auction_types::ConnectionId::new(1));
        sessions.start_session(SessionId::new(2), auction_types::ConnectionId::new(2));
        assert_eq!(exec.execute(SessionId::new(1), "LOGIN alice").text, "Welcome alice!");
        assert_eq!(exec.execute(SessionId::new(2), "LOGIN alice").text, "Couldn't login as alice!");
    }

    #[test]
    fn sell_rolls_back_item_when_fee_cannot_be_paid() {
        let (exec, sessions) = executor();
        sessions.start_session(SessionId::new(1), auction_types::ConnectionId::new(1));
        exec.execute(SessionId::new(1), "LOGIN alice");
        exec.execute(SessionId::new(1), "DEPOSIT ITEM hat");
        let notif = exec.execute(SessionId::new(1), "SELL hat 5 1");
        assert_eq!(notif.text, "You can't sell your item, you don't have funds to cover the fee!");
        assert_eq!(exec.execute(SessionId::new(1), "SHOW ITEMS").text, "hat");
    }

    #[test]
    fn self_bid_is_rejected() {
        let (exec, sessions) = executor();
        sessions.start_session(SessionId::new(1), auction_types::ConnectionId::new(1));
        exec.execute(SessionId::new(1), "LOGIN alice");
        exec.execute(SessionId::new(1), "DEPOSIT FUNDS 10");
        exec.execute(SessionId::new(1), "DEPOSIT ITEM book");
        exec.execute(SessionId::new(1), "SELL book 5 300");
        let notif = exec.execute(SessionId::new(1), "BID 0 100");
        assert_eq!(notif.text, "You can't bid on the auction 0, you are the seller!");
    }

    #[test]
    fn successful_sale_listing_then_bid() {
        let (exec, sessions) = executor();
        sessions.start_session(SessionId::new(1), auction_types::ConnectionId::new(1));
        sessions.start_session(SessionId::new(2), auction_types::ConnectionId::new(2));
        exec.execute(SessionId::new(1), "LOGIN alice");
        exec.execute(SessionId::new(1), "DEPOSIT FUNDS 10");
        exec.execute(SessionId::new(1), "DEPOSIT ITEM book");
        let sell = exec.execute(SessionId::new(1), "SELL book 5 300");
        assert_eq!(sell.text, "Your item book is being auctioned off!");

        exec.execute(SessionId::new(2), "LOGIN bob");
        exec.execute(SessionId::new(2), "DEPOSIT FUNDS 10");
        let bid = exec.execute(SessionId::new(2), "BID 0 7");
        assert_eq!(bid.text, "You are winning the auction 0!");
    }

    #[test]
    fn bid_with_equal_price_is_too_low() {
        let (exec, sessions) = executor();
        sessions.start_session(SessionId::new(1), auction_types::ConnectionId::new(1));
        sessions.start_session(SessionId::new(2), auction_types::ConnectionId::new(2));
        exec.execute(SessionId::new(1), "LOGIN alice");
        exec.execute(SessionId::new(1), "DEPOSIT ITEM book");
        exec.execute(SessionId::new(1), "SELL book 5 300");
        exec.execute(SessionId::new(2), "LOGIN bob");
        let notif = exec.execute(SessionId::new(2), "BID 0 5");
        assert_eq!(notif.text, "Your offer for the auction 0 was too low!");
    }

    #[test]
    fn bid_on_missing_auction_reports_absent() {
        let (exec, sessions) = executor();
        sessions.start_session(SessionId::new(1), auction_types::ConnectionId::new(1));
        exec.execute(SessionId::new(1), "LOGIN alice");
        let notif = exec.execute(SessionId::new(1), "BID 42 5");
        assert_eq!(notif.text, "There is no such auction!");
    }

    #[test]
    fn deposit_funds_bad_arg_reports_invalid_amount() {
        let (exec, sessions) = executor();
        sessions.start_session(SessionId::new(1), auction_types::ConnectionId::new(1));
        exec.execute(SessionId::new(1), "LOGIN alice");
        let notif = exec.execute(SessionId::new(1), "DEPOSIT FUNDS abc");
        assert_eq!(notif.text, "Deposition of funds has failed! Invalid amount!");
    }

    #[test]
    fn logout_happy_path_and_already_logged_out() {
        let (exec, sessions) = executor();
        sessions.start_session(SessionId::new(1), auction_types::ConnectionId::new(1));
        exec.execute(SessionId::new(1), "LOGIN alice");
        assert_eq!(exec.execute(SessionId::new(1), "LOGOUT").text, "Good bay, alice!");
        assert_eq!(exec.execute(SessionId::new(1), "LOGOUT").text, "You are not logged in!");
    }

    #[test]
    fn sell_without_explicit_duration_uses_configured_default() {
        let (exec, sessions) = executor();
        sessions.start_session(SessionId::new(1), auction_types::ConnectionId::new(1));
        exec.execute(SessionId::new(1), "LOGIN alice");
        exec.execute(SessionId::new(1), "DEPOSIT ITEM hat");
        exec.execute(SessionId::new(1), "DEPOSIT FUNDS 1");
        let notif = exec.execute(SessionId::new(1), "SELL hat 5");
        assert_eq!(notif.text, "Your item hat is being auctioned off!");
    }
}
