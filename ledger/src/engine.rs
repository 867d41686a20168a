//! Transfer and posting engine.
//!
//! Both operations follow validate-then-commit: every check runs before the
//! first write, and checks plus writes share one [`LedgerStore::atomically`]
//! section, so a rejected request leaves the ledger untouched and an accepted
//! one is visible all at once.

use std::sync::Arc;

use cbs_common::{covers, now, AccountId, CbsError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::account::Account;
use crate::journal::{LabelStyle, Transaction, TransactionKind};
use crate::store::LedgerStore;

const TRANSFER_FIELDS: &[&str] = &["from", "to", "amount"];
const POSTING_FIELDS: &[&str] = &["accountNumber", "amount", "type"];

/// Transfer request as received from callers. Fields are optional so that
/// absence can be reported as [`CbsError::MissingFields`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransferRequest {
    pub from: Option<String>,
    pub to: Option<String>,
    pub amount: Option<Decimal>,
    pub description: Option<String>,
}

impl TransferRequest {
    pub fn new(from: impl Into<String>, to: impl Into<String>, amount: Decimal) -> Self {
        Self {
            from: Some(from.into()),
            to: Some(to.into()),
            amount: Some(amount),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Outcome of a successful transfer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferReceipt {
    pub source_account: Account,
    pub target_account: Account,
    pub debit_transaction: Transaction,
    pub credit_transaction: Transaction,
}

/// Single credit or debit request as received from callers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostingRequest {
    pub account_number: Option<String>,
    pub amount: Option<Decimal>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub description: Option<String>,
}

impl PostingRequest {
    pub fn new(account_number: impl Into<String>, amount: Decimal, kind: impl Into<String>) -> Self {
        Self {
            account_number: Some(account_number.into()),
            amount: Some(amount),
            kind: Some(kind.into()),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Outcome of a successful posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostingReceipt {
    pub transaction: Transaction,
    pub account: Account,
}

struct ValidTransfer {
    from: AccountId,
    to: AccountId,
    amount: Decimal,
    description: Option<String>,
}

struct ValidPosting {
    account: AccountId,
    amount: Decimal,
    kind: TransactionKind,
    description: Option<String>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn present_amount(value: Option<Decimal>) -> Option<Decimal> {
    value.filter(|amount| !amount.is_zero())
}

fn ensure_positive(amount: Decimal) -> Result<Decimal> {
    if amount.is_sign_negative() {
        return Err(CbsError::InvalidAmount(amount));
    }
    Ok(amount)
}

impl TransferRequest {
    fn validate(&self) -> Result<ValidTransfer> {
        let (Some(from), Some(to), Some(amount)) = (
            present(&self.from),
            present(&self.to),
            present_amount(self.amount),
        ) else {
            return Err(CbsError::MissingFields {
                what: "transfer details",
                required: TRANSFER_FIELDS,
            });
        };

        Ok(ValidTransfer {
            from: AccountId::new(from),
            to: AccountId::new(to),
            amount: ensure_positive(amount)?,
            description: present(&self.description).map(str::to_string),
        })
    }
}

impl PostingRequest {
    fn validate(&self) -> Result<ValidPosting> {
        let (Some(account), Some(amount), Some(kind)) = (
            present(&self.account_number),
            present_amount(self.amount),
            present(&self.kind),
        ) else {
            return Err(CbsError::MissingFields {
                what: "required fields",
                required: POSTING_FIELDS,
            });
        };

        let kind: TransactionKind = kind.parse()?;

        Ok(ValidPosting {
            account: AccountId::new(account),
            amount: ensure_positive(amount)?,
            kind,
            description: present(&self.description).map(str::to_string),
        })
    }
}

/// Executes money movements against a shared [`LedgerStore`].
#[derive(Clone)]
pub struct LedgerEngine {
    store: Arc<LedgerStore>,
}

impl LedgerEngine {
    /// Create an engine over the given store.
    pub fn new(store: Arc<LedgerStore>) -> Self {
        Self { store }
    }

    /// The store this engine writes to.
    pub fn store(&self) -> &Arc<LedgerStore> {
        &self.store
    }

    /// Move `amount` from one account to another.
    ///
    /// Produces a debit on the source and a credit on the target. Checks run
    /// in order: required fields, amount sign, account existence, funds.
    #[instrument(skip(self, request), fields(from = ?request.from, to = ?request.to, amount = ?request.amount))]
    pub fn transfer(&self, request: TransferRequest) -> Result<TransferReceipt> {
        let result = request
            .validate()
            .and_then(|transfer| self.store.atomically(|ledger| -> Result<TransferReceipt> {
                let mut missing: Vec<AccountId> = [&transfer.from, &transfer.to]
                    .into_iter()
                    .filter(|id| !ledger.contains_account(id))
                    .cloned()
                    .collect();
                missing.dedup();
                if !missing.is_empty() {
                    return Err(CbsError::AccountsNotFound {
                        from: transfer.from.clone(),
                        to: transfer.to.clone(),
                        missing,
                    });
                }

                let source = ledger.account(&transfer.from)?;
                let available = source.balance;
                if !covers(available, transfer.amount) {
                    return Err(CbsError::InsufficientFunds {
                        available,
                        requested: transfer.amount,
                    });
                }

                // Both balances are computed before either is written.
                let source_balance = source.balance_after(-transfer.amount)?;
                let target_balance = if transfer.from == transfer.to {
                    available
                } else {
                    ledger.account(&transfer.to)?.balance_after(transfer.amount)?
                };

                let at = now();
                ledger.account_mut(&transfer.from)?.set_balance(source_balance, at);
                ledger.account_mut(&transfer.to)?.set_balance(target_balance, at);

                let debit = Transaction::debit(
                    ledger.next_transaction_id(),
                    transfer.amount,
                    transfer
                        .description
                        .clone()
                        .unwrap_or_else(|| format!("Virement à {}", transfer.to)),
                    at,
                );
                let credit = Transaction::credit(
                    ledger.next_transaction_id(),
                    transfer.amount,
                    transfer
                        .description
                        .clone()
                        .unwrap_or_else(|| format!("Virement de {}", transfer.from)),
                    at,
                );
                ledger.append_transaction(&transfer.from, debit.clone())?;
                ledger.append_transaction(&transfer.to, credit.clone())?;

                Ok(TransferReceipt {
                    source_account: ledger.account(&transfer.from)?.clone(),
                    target_account: ledger.account(&transfer.to)?.clone(),
                    debit_transaction: debit,
                    credit_transaction: credit,
                })
            }));

        match &result {
            Ok(receipt) => info!(
                debit_id = %receipt.debit_transaction.id,
                credit_id = %receipt.credit_transaction.id,
                source_balance = %receipt.source_account.balance,
                target_balance = %receipt.target_account.balance,
                "Transfer completed"
            ),
            Err(e) => warn!(code = e.error_code(), error = %e, "Transfer rejected"),
        }

        result
    }

    /// Credit or debit a single account.
    #[instrument(skip(self, request), fields(account = ?request.account_number, kind = ?request.kind, amount = ?request.amount))]
    pub fn post_transaction(&self, request: PostingRequest) -> Result<PostingReceipt> {
        let result = request
            .validate()
            .and_then(|posting| self.store.atomically(|ledger| -> Result<PostingReceipt> {
                let account = ledger.account(&posting.account)?;
                if posting.kind == TransactionKind::Debit
                    && !account.has_sufficient_funds(posting.amount)
                {
                    return Err(CbsError::InsufficientFunds {
                        available: account.balance,
                        requested: posting.amount,
                    });
                }

                let signed = posting.kind.direction().signed(posting.amount);
                let balance = account.balance_after(signed)?;

                let at = now();
                ledger.account_mut(&posting.account)?.set_balance(balance, at);

                let transaction = Transaction::new(
                    ledger.next_transaction_id(),
                    posting.kind,
                    posting.amount,
                    posting
                        .description
                        .clone()
                        .unwrap_or_else(|| format!("{} transaction", posting.kind)),
                    at,
                )
                .with_style(LabelStyle::Posting);
                ledger.append_transaction(&posting.account, transaction.clone())?;

                Ok(PostingReceipt {
                    transaction,
                    account: ledger.account(&posting.account)?.clone(),
                })
            }));

        match &result {
            Ok(receipt) => info!(
                transaction_id = %receipt.transaction.id,
                balance = %receipt.account.balance,
                "Transaction posted"
            ),
            Err(e) => warn!(code = e.error_code(), error = %e, "Transaction rejected"),
        }

        result
    }
}
