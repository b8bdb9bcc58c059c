use std::fmt;

/// Non-negative integer funds, wide enough for aggregate balances.
///
/// Wrapped in a newtype (rather than a bare `u64`) so overflow/underflow
/// checks live as total methods on one type instead of being re-derived by
/// every caller that touches a balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Funds(u64);

impl Funds {
    pub const ZERO: Funds = Funds(0);
    pub const MAX: Funds = Funds(u64::MAX);

    pub const fn new(amount: u64) -> Self {
        Funds(amount)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    /// `self + other`, or `None` if it would overflow `u64`.
    pub fn checked_add(self, other: Funds) -> Option<Funds> {
        self.0.checked_add(other.0).map(Funds)
    }

    /// `self - other`, or `None` if `other > self`.
    pub fn checked_sub(self, other: Funds) -> Option<Funds> {
        self.0.checked_sub(other.0).map(Funds)
    }
}

impl From<u64> for Funds {
    fn from(v: u64) -> Self {
        Funds(v)
    }
}

impl From<Funds> for u64 {
    fn from(v: Funds) -> Self {
        v.0
    }
}

impl fmt::Display for Funds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_overflow_is_rejected() {
        assert_eq!(Funds::MAX.checked_add(Funds::new(1)), None);
        assert_eq!(Funds::new(1).checked_add(Funds::new(1)), Some(Funds::new(2)));
    }

    #[test]
    fn sub_underflow_is_rejected() {
        assert_eq!(Funds::new(1).checked_sub(Funds::new(2)), None);
        assert_eq!(Funds::new(2).checked_sub(Funds::new(2)), Some(Funds::ZERO));
    }
}
