//! Error types for core banking operations.

use crate::{AccountId, CustomerId};
use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for ledger lookups and postings.
///
/// Every variant is raised before any state is touched, so a caller that
/// receives one can assume the ledger is exactly as it was.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CbsError {
    /// One or more required inputs are absent, empty or zero.
    #[error("Missing {what}")]
    MissingFields {
        what: &'static str,
        required: &'static [&'static str],
    },

    /// Amount is negative.
    #[error("Invalid amount: {0}")]
    InvalidAmount(Decimal),

    /// Posting type is neither credit nor debit.
    #[error("Invalid transaction type: {0}")]
    InvalidTransactionKind(String),

    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// One or both sides of a transfer do not exist.
    #[error("One or more accounts not found: {}", format_ids(.missing))]
    AccountsNotFound {
        from: AccountId,
        to: AccountId,
        missing: Vec<AccountId>,
    },

    /// Customer not found.
    #[error("Customer not found: {0}")]
    CustomerNotFound(CustomerId),

    /// Balance does not cover the requested debit.
    #[error("Insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        available: Decimal,
        requested: Decimal,
    },

    /// Applying the amount would take a balance outside the representable range.
    #[error("Amount out of range: {amount} on account {account} (balance {balance})")]
    AmountOutOfRange {
        account: AccountId,
        balance: Decimal,
        amount: Decimal,
    },
}

fn format_ids(ids: &[AccountId]) -> String {
    ids.iter()
        .map(AccountId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

impl CbsError {
    /// Get error code for logs and diagnostics.
    pub fn error_code(&self) -> &'static str {
        match self {
            CbsError::MissingFields { .. } => "MISSING_FIELDS",
            CbsError::InvalidAmount(_) => "INVALID_AMOUNT",
            CbsError::InvalidTransactionKind(_) => "INVALID_TRANSACTION_KIND",
            CbsError::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            CbsError::AccountsNotFound { .. } => "ACCOUNT_NOT_FOUND",
            CbsError::CustomerNotFound(_) => "CUSTOMER_NOT_FOUND",
            CbsError::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            CbsError::AmountOutOfRange { .. } => "AMOUNT_OUT_OF_RANGE",
        }
    }

    /// Whether the error points at an entity that does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CbsError::AccountNotFound(_)
                | CbsError::AccountsNotFound { .. }
                | CbsError::CustomerNotFound(_)
        )
    }
}

/// Result type alias for core banking operations.
pub type Result<T> = std::result::Result<T, CbsError>;
