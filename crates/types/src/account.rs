use crate::{Funds, Item};

/// A user's funds balance and inventory. Created lazily on first reference
/// by the ledger; never removed for the lifetime of the process.
#[derive(Debug, Clone, Default)]
pub struct Account {
    pub funds: Funds,
    /// Insertion order preserved; duplicates allowed.
    pub items: Vec<Item>,
}

impl Account {
    pub fn new() -> Self {
        Self::default()
    }
}
