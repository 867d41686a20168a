//! Monetary types for the core banking simulator.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// ISO 4217 currency code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Currency(String);

impl Currency {
    /// Create a new currency from code.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().to_uppercase())
    }

    /// Get the currency code.
    pub fn code(&self) -> &str {
        &self.0
    }

    /// Tunisian dinar, the currency every seeded account is held in.
    pub fn tnd() -> Self {
        Self::new("TND")
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self::tnd()
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Currency {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Direction a posted amount moves a balance in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Adds to the balance.
    Inflow,
    /// Subtracts from the balance.
    Outflow,
}

impl Direction {
    /// Apply the direction to an unsigned amount.
    pub fn signed(self, amount: Decimal) -> Decimal {
        match self {
            Direction::Inflow => amount,
            Direction::Outflow => -amount,
        }
    }
}

/// Largest balance magnitude, in whole units, an account may hold.
///
/// Keeps every balance well inside `Decimal`'s 28 significant digits so that
/// postings never round away fractional units.
pub const MAX_BALANCE_UNITS: i64 = 1_000_000_000_000_000;

/// `balance + signed_amount`, or `None` if the result overflows or leaves
/// the `±MAX_BALANCE_UNITS` range.
pub fn checked_balance(balance: Decimal, signed_amount: Decimal) -> Option<Decimal> {
    balance
        .checked_add(signed_amount)
        .filter(|next| next.abs() <= Decimal::from(MAX_BALANCE_UNITS))
}

/// Check that `balance` covers an outflow of `amount`.
///
/// The comparison is inclusive: draining an account to exactly zero is allowed.
pub fn covers(balance: Decimal, amount: Decimal) -> bool {
    balance >= amount
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_currency_normalized_to_uppercase() {
        assert_eq!(Currency::new("tnd"), Currency::tnd());
        assert_eq!(Currency::from("eur").code(), "EUR");
        assert_eq!(Currency::default(), Currency::tnd());
    }

    #[test]
    fn test_direction_sign() {
        assert_eq!(Direction::Inflow.signed(dec!(100)), dec!(100));
        assert_eq!(Direction::Outflow.signed(dec!(100)), dec!(-100));
    }

    #[test]
    fn test_checked_balance_limits() {
        assert_eq!(checked_balance(dec!(15850.75), dec!(-100)), Some(dec!(15750.75)));
        assert_eq!(
            checked_balance(Decimal::from(MAX_BALANCE_UNITS), dec!(0.01)),
            None
        );
        assert_eq!(checked_balance(Decimal::MAX, Decimal::MAX), None);
        assert_eq!(
            checked_balance(dec!(0), Decimal::from(MAX_BALANCE_UNITS)),
            Some(Decimal::from(MAX_BALANCE_UNITS))
        );
    }

    #[test]
    fn test_covers_is_inclusive() {
        assert!(covers(dec!(15850.75), dec!(15850.75)));
        assert!(covers(dec!(15850.75), dec!(100)));
        assert!(!covers(dec!(15850.75), dec!(999999)));
    }
}
