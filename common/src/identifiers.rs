//! Identifier types for core banking entities.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix carried by every transaction identifier.
pub const TRANSACTION_ID_PREFIX: &str = "TRN";

/// Minimum number of digits in a transaction identifier.
const TRANSACTION_ID_WIDTH: usize = 3;

/// Unique identifier for a customer (e.g. `C001`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(String);

impl CustomerId {
    /// Create a new customer ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CustomerId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for CustomerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Unique identifier for an account (e.g. `A001`).
///
/// Ordering is lexical, which is also the order accounts are listed in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    /// Create a new account ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AccountId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for AccountId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Sequential transaction identifier such as `TRN012`.
///
/// The numeric part is zero-padded to three digits and grows past that
/// width once the sequence exceeds 999.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    /// Build the identifier for a sequence number.
    pub fn from_sequence(sequence: u64) -> Self {
        Self(format!(
            "{}{:0width$}",
            TRANSACTION_ID_PREFIX,
            sequence,
            width = TRANSACTION_ID_WIDTH
        ))
    }

    /// Wrap an existing identifier string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Numeric part of the identifier, if it follows the `TRN<digits>` format.
    pub fn sequence(&self) -> Option<u64> {
        self.0
            .strip_prefix(TRANSACTION_ID_PREFIX)
            .filter(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()))
            .and_then(|digits| digits.parse().ok())
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_id_padding() {
        assert_eq!(TransactionId::from_sequence(12).as_str(), "TRN012");
        assert_eq!(TransactionId::from_sequence(7).as_str(), "TRN007");
        assert_eq!(TransactionId::from_sequence(1234).as_str(), "TRN1234");
    }

    #[test]
    fn test_transaction_id_sequence() {
        assert_eq!(TransactionId::new("TRN011").sequence(), Some(11));
        assert_eq!(TransactionId::from_sequence(1000).sequence(), Some(1000));
        assert_eq!(TransactionId::new("TRN").sequence(), None);
        assert_eq!(TransactionId::new("TX-42").sequence(), None);
        assert_eq!(TransactionId::new("TRN+12").sequence(), None);
    }

    #[test]
    fn test_account_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&AccountId::new("A001")).unwrap();
        assert_eq!(json, "\"A001\"");
    }

    #[test]
    fn test_account_id_ordering() {
        let mut ids = vec![AccountId::new("A003"), AccountId::new("A001"), AccountId::new("A002")];
        ids.sort();
        assert_eq!(ids[0].as_str(), "A001");
        assert_eq!(ids[2].as_str(), "A003");
    }
}
