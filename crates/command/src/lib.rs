//! Parsed request → ledger/book mutation → outbound notification.
//!
//! Command polymorphism is a tagged enum ([`Command`]) dispatched on in
//! [`CommandExecutor::execute`], not a trait object hierarchy: the
//! authorization gate is a single combinator wrapped around the variants
//! that require it, rather than a base-class check every variant repeats.

mod executor;
mod parser;

pub use executor::CommandExecutor;
pub use parser::{parse, Command};
