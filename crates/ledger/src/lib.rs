//! Per-user funds and inventory, with atomic deposit/withdraw primitives.
//!
//! These are the transactional building blocks settlement's rollback saga is
//! built on: withdrawal is total and observable (the caller gets a `bool` to
//! decide whether a compensating action is needed), and every operation
//! locks the whole account map rather than per-user, so a single operation
//! is always atomic with respect to every other.

use std::collections::HashMap;

use auction_types::{Account, Funds, Item, Username};
use parking_lot::Mutex;

#[derive(Default)]
pub struct AccountLedger {
    accounts: Mutex<HashMap<Username, Account>>,
}

impl AccountLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `item` to `user`'s inventory. Accounts are created lazily.
    pub fn deposit_item(&self, user: &str, item: Item) {
        self.accounts.lock().entry(user.to_owned()).or_default().items.push(item);
    }

    /// Adds `amount` to `user`'s balance. Fails without mutation if it would
    /// overflow `Funds`.
    pub fn deposit_funds(&self, user: &str, amount: Funds) -> bool {
        let mut accounts = self.accounts.lock();
        let account = accounts.entry(user.to_owned()).or_default();
        match account.funds.checked_add(amount) {
            Some(new_total) => {
                account.funds = new_total;
                true
            }
            None => false,
        }
    }

    /// Removes the first occurrence of `item` from `user`'s inventory.
    /// Returns `false` if absent.
    pub fn withdraw_item(&self, user: &str, item: &str) -> bool {
        let mut accounts = self.accounts.lock();
        let account = accounts.entry(user.to_owned()).or_default();
        if let Some(pos) = account.items.iter().position(|i| i == item) {
            account.items.remove(pos);
            true
        } else {
            false
        }
    }

    /// Subtracts `amount` from `user`'s balance. Returns `false` (without
    /// mutation) if the balance is insufficient.
    pub fn withdraw_funds(&self, user: &str, amount: Funds) -> bool {
        let mut accounts = self.accounts.lock();
        let account = accounts.entry(user.to_owned()).or_default();
        match account.funds.checked_sub(amount) {
            Some(new_total) => {
                account.funds = new_total;
                true
            }
            None => false,
        }
    }

    pub fn get_funds(&self, user: &str) -> Funds {
        self.accounts.lock().entry(user.to_owned()).or_default().funds
    }

    /// Newline-joined inventory snapshot, in insertion order.
    pub fn get_items(&self, user: &str) -> String {
        self.accounts.lock().entry(user.to_owned()).or_default().items.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use auction_types::Funds;

    use super::*;

    #[test]
    fn deposit_then_withdraw_funds_is_a_no_op() {
        let ledger = AccountLedger::new();
        ledger.deposit_funds("alice", Funds::new(10));
        assert!(ledger.withdraw_funds("alice", Funds::new(10)));
        assert_eq!(ledger.get_funds("alice"), Funds::ZERO);
    }

    #[test]
    fn deposit_then_withdraw_item_is_a_no_op() {
        let ledger = AccountLedger::new();
        ledger.deposit_item("alice", "book".into());
        assert!(ledger.withdraw_item("alice", "book"));
        assert_eq!(ledger.get_items("alice"), "");
    }

    #[test]
    fn withdraw_item_removes_only_first_occurrence() {
        let ledger = AccountLedger::new();
        ledger.deposit_item("alice", "book".into());
        ledger.deposit_item("alice", "book".into());
        assert!(ledger.withdraw_item("alice", "book"));
        assert_eq!(ledger.get_items("alice"), "book");
    }

    #[test]
    fn withdraw_funds_fails_when_insufficient_and_leaves_balance_unchanged() {
        let ledger = AccountLedger::new();
        ledger.deposit_funds("alice", Funds::new(5));
        assert!(!ledger.withdraw_funds("alice", Funds::new(6)));
        assert_eq!(ledger.get_funds("alice"), Funds::new(5));
    }

    #[test]
    fn withdraw_item_fails_when_absent() {
        let ledger = AccountLedger::new();
        assert!(!ledger.withdraw_item("alice", "hat"));
    }

    #[test]
    fn deposit_funds_overflow_leaves_balance_unchanged() {
        let ledger = AccountLedger::new();
        ledger.deposit_funds("alice", Funds::MAX);
        assert!(!ledger.deposit_funds("alice", Funds::new(1)));
        assert_eq!(ledger.get_funds("alice"), Funds::MAX);
    }

    #[test]
    fn accounts_are_created_lazily_and_start_empty() {
        let ledger = AccountLedger::new();
        assert_eq!(ledger.get_funds("nobody"), Funds::ZERO);
        assert_eq!(ledger.get_items("nobody"), "");
    }
}
