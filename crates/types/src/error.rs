use thiserror::Error;

/// Abstract error kinds shared across the command executor and settlement
/// pipeline. These never cross a component boundary as a panic or process
/// abort: the executor converts them to the user-visible text in §6 of the
/// spec, and the dispatcher logs and continues past any `ServerError`
/// surfaced by a task.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServerError {
    #[error("not logged in")]
    NotAuthenticated,
    #[error("could not parse argument")]
    ParseError,
    #[error("argument out of range")]
    ArgOutOfRange,
    #[error("insufficient funds")]
    InsufficientFunds,
    #[error("funds overflow")]
    OverflowFunds,
    #[error("no such item")]
    NoSuchItem,
    #[error("no such auction")]
    NoSuchAuction,
    #[error("cannot bid on your own auction")]
    SelfBid,
    #[error("bid too low")]
    BidTooLow,
    #[error("internal server error: {0}")]
    ServerError(String),
    #[error("connection closed")]
    ConnectionClosed,
    #[error("failed to bind listening socket: {0}")]
    BindFailure(String),
}
