//! Account definitions for the ledger.

use cbs_common::{checked_balance, covers, AccountId, CbsError, Currency, CustomerId, Result, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Account category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountCategory {
    /// Current account used for day-to-day payments.
    #[serde(rename = "Compte Courant")]
    Checking,
    /// Savings account.
    #[serde(rename = "Compte Épargne")]
    Savings,
}

/// A customer account held by the bank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Unique account identifier.
    pub id: AccountId,
    /// Owning customer.
    pub customer_id: CustomerId,
    /// Checking or savings.
    #[serde(rename = "type")]
    pub category: AccountCategory,
    /// International bank account number, space separated.
    pub iban: String,
    /// Current balance.
    pub balance: Decimal,
    /// Account currency.
    pub currency: Currency,
    /// When the account was opened.
    pub created_at: Timestamp,
    /// When the balance last changed.
    pub updated_at: Timestamp,
}

impl Account {
    /// Create a new account opened at `created_at`.
    pub fn new(
        id: impl Into<AccountId>,
        customer_id: impl Into<CustomerId>,
        category: AccountCategory,
        iban: impl Into<String>,
        balance: Decimal,
        currency: Currency,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id: id.into(),
            customer_id: customer_id.into(),
            category,
            iban: iban.into(),
            balance,
            currency,
            created_at,
            updated_at: created_at,
        }
    }

    /// Check if the balance covers a debit of `amount`.
    pub fn has_sufficient_funds(&self, amount: Decimal) -> bool {
        covers(self.balance, amount)
    }

    /// Balance after moving by `signed_amount`. Nothing is changed.
    pub fn balance_after(&self, signed_amount: Decimal) -> Result<Decimal> {
        checked_balance(self.balance, signed_amount).ok_or_else(|| CbsError::AmountOutOfRange {
            account: self.id.clone(),
            balance: self.balance,
            amount: signed_amount.abs(),
        })
    }

    /// Store a balance computed with [`Account::balance_after`] and stamp the
    /// update time.
    pub(crate) fn set_balance(&mut self, balance: Decimal, at: Timestamp) {
        self.balance = balance;
        self.updated_at = at;
    }

    /// Check if the account belongs to `customer_id`.
    pub fn is_owned_by(&self, customer_id: &CustomerId) -> bool {
        &self.customer_id == customer_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cbs_common::now;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn checking(balance: Decimal) -> Account {
        Account::new(
            "A001",
            "C001",
            AccountCategory::Checking,
            "TN59 1000 6035 0000 0123 4567 89",
            balance,
            Currency::tnd(),
            now() - Duration::days(365),
        )
    }

    #[test]
    fn test_set_balance_moves_balance_and_timestamp() {
        let mut account = checking(dec!(15850.75));
        let at = now();

        let next = account.balance_after(dec!(-100)).unwrap();
        account.set_balance(next, at);

        assert_eq!(account.balance, dec!(15750.75));
        assert_eq!(account.updated_at, at);
        assert!(account.created_at < at);
    }

    #[test]
    fn test_balance_after_rejects_out_of_range() {
        let account = checking(Decimal::MAX);
        let err = account.balance_after(dec!(10000)).unwrap_err();

        assert_eq!(
            err,
            CbsError::AmountOutOfRange {
                account: AccountId::new("A001"),
                balance: Decimal::MAX,
                amount: dec!(10000),
            }
        );
        assert_eq!(account.balance, Decimal::MAX);
    }

    #[test]
    fn test_sufficient_funds_boundary() {
        let account = checking(dec!(200));
        assert!(account.has_sufficient_funds(dec!(200)));
        assert!(!account.has_sufficient_funds(dec!(200.01)));
    }

    #[test]
    fn test_wire_format() {
        let account = checking(dec!(15850.75));
        let json = serde_json::to_value(&account).unwrap();

        assert_eq!(json["id"], "A001");
        assert_eq!(json["customerId"], "C001");
        assert_eq!(json["type"], "Compte Courant");
        assert_eq!(json["currency"], "TND");
        assert_eq!(json["balance"].as_f64(), Some(15850.75));
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
    }

    #[test]
    fn test_savings_label() {
        let json = serde_json::to_value(AccountCategory::Savings).unwrap();
        assert_eq!(json, "Compte Épargne");
    }

    #[test]
    fn test_ownership() {
        let account = checking(dec!(1));
        assert!(account.is_owned_by(&CustomerId::new("C001")));
        assert!(!account.is_owned_by(&CustomerId::new("C002")));
    }
}
