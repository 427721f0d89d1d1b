use std::fmt;

use serde::{Deserialize, Serialize};

/// Monetary amount in integer cents. Never floating point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(i64);

impl Price {
    pub const ZERO: Price = Price(0);

    pub fn from_cents(cents: i64) -> Self {
        Price(cents)
    }

    pub fn cents(&self) -> i64 {
        self.0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Addition that surfaces overflow instead of wrapping.
    pub fn checked_add(self, other: Price) -> Option<Price> {
        self.0.checked_add(other.0).map(Price)
    }
}

impl fmt::Display for Price {
    /// Currency rendering: 950 cents prints as `$9.50`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}${}.{:02}", abs / 100, abs % 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_cents_as_dollars() {
        assert_eq!(Price::from_cents(950).to_string(), "$9.50");
        assert_eq!(Price::from_cents(500).to_string(), "$5.00");
        assert_eq!(Price::from_cents(5).to_string(), "$0.05");
    }

    #[test]
    fn zero_and_negative_are_not_positive() {
        assert!(Price::from_cents(1).is_positive());
        assert!(!Price::ZERO.is_positive());
        assert!(!Price::from_cents(-100).is_positive());
    }

    #[test]
    fn sums_over_an_item_set() {
        let total = [8, 8]
            .into_iter()
            .map(Price::from_cents)
            .try_fold(Price::ZERO, Price::checked_add);
        assert_eq!(total, Some(Price::from_cents(16)));
    }

    #[test]
    fn checked_add_catches_overflow() {
        assert_eq!(Price::from_cents(i64::MAX).checked_add(Price::from_cents(1)), None);
    }
}
