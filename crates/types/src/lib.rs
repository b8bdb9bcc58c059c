//! Shared data model for the auction server.
//!
//! Every other crate in the workspace depends on this one for the entities
//! and identifiers that cross component boundaries: funds, items,
//! usernames, session/auction/connection identifiers, and the error
//! taxonomy raised at the process boundary.

pub mod account;
pub mod auction;
pub mod error;
pub mod funds;
pub mod ids;
pub mod notification;

pub use account::Account;
pub use auction::{Auction, BidResult};
pub use error::ServerError;
pub use funds::Funds;
pub use ids::{AuctionId, ConnectionId, SessionId};
pub use notification::Notification;

/// A non-empty word-character token identifying an item. Validated at the
/// command-parsing boundary; carried as an owned `String` everywhere else.
pub type Item = String;

/// A non-empty word-character token identifying a user. Validated at the
/// command-parsing boundary; carried as an owned `String` everywhere else.
pub type Username = String;

/// True if `s` is non-empty and every character is a word character
/// (`[0-9A-Za-z_]`), matching the original protocol's `\w+` token grammar.
pub fn is_word_token(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
