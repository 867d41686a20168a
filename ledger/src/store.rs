//! In-memory ledger store.
//!
//! All customers, accounts, histories and the transaction counter live in one
//! [`LedgerState`] behind a single mutex. Readers get owned snapshots; writers
//! go through [`LedgerStore::atomically`] so that a balance change and the
//! history entry that explains it are never observed apart.

use std::collections::{BTreeMap, HashMap};

use cbs_common::{AccountId, CbsError, CustomerId, Result, TransactionId};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::account::Account;
use crate::customer::{Customer, CustomerProfile};
use crate::journal::Transaction;

/// An account together with its full history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountStatement {
    pub account: Account,
    pub transactions: Vec<Transaction>,
}

/// The mutable contents of a ledger.
#[derive(Debug, Clone)]
pub struct LedgerState {
    customers: BTreeMap<CustomerId, Customer>,
    accounts: BTreeMap<AccountId, Account>,
    history: HashMap<AccountId, Vec<Transaction>>,
    next_sequence: u64,
}

impl LedgerState {
    /// Create an empty ledger whose first transaction will be `TRN001`.
    pub fn new() -> Self {
        Self {
            customers: BTreeMap::new(),
            accounts: BTreeMap::new(),
            history: HashMap::new(),
            next_sequence: 1,
        }
    }

    /// Register a customer, replacing any previous record with the same ID.
    pub fn insert_customer(&mut self, customer: Customer) {
        self.customers.insert(customer.id.clone(), customer);
    }

    /// Register an account, replacing any previous record with the same ID.
    pub fn insert_account(&mut self, account: Account) {
        self.accounts.insert(account.id.clone(), account);
    }

    /// Load a historical transaction without touching the balance, and move
    /// the counter past its sequence number.
    pub fn seed_transaction(&mut self, account_id: &AccountId, transaction: Transaction) -> Result<()> {
        if let Some(sequence) = transaction.id.sequence() {
            self.next_sequence = self.next_sequence.max(sequence + 1);
        }
        self.append_transaction(account_id, transaction)
    }

    pub fn customer(&self, id: &CustomerId) -> Result<&Customer> {
        self.customers
            .get(id)
            .ok_or_else(|| CbsError::CustomerNotFound(id.clone()))
    }

    pub fn account(&self, id: &AccountId) -> Result<&Account> {
        self.accounts
            .get(id)
            .ok_or_else(|| CbsError::AccountNotFound(id.clone()))
    }

    pub(crate) fn account_mut(&mut self, id: &AccountId) -> Result<&mut Account> {
        self.accounts
            .get_mut(id)
            .ok_or_else(|| CbsError::AccountNotFound(id.clone()))
    }

    pub fn contains_account(&self, id: &AccountId) -> bool {
        self.accounts.contains_key(id)
    }

    /// Accounts owned by `customer_id`, in account ID order.
    pub fn accounts_for_customer(&self, customer_id: &CustomerId) -> Vec<Account> {
        self.accounts
            .values()
            .filter(|account| account.is_owned_by(customer_id))
            .cloned()
            .collect()
    }

    /// History of an existing account; empty when nothing was ever booked.
    pub fn history(&self, account_id: &AccountId) -> Result<&[Transaction]> {
        if !self.contains_account(account_id) {
            return Err(CbsError::AccountNotFound(account_id.clone()));
        }
        Ok(self
            .history
            .get(account_id)
            .map(Vec::as_slice)
            .unwrap_or_default())
    }

    /// Append to an account's history. The balance is left alone.
    pub fn append_transaction(&mut self, account_id: &AccountId, transaction: Transaction) -> Result<()> {
        if !self.contains_account(account_id) {
            return Err(CbsError::AccountNotFound(account_id.clone()));
        }
        self.history
            .entry(account_id.clone())
            .or_default()
            .push(transaction);
        Ok(())
    }

    /// Allocate the next transaction identifier.
    pub fn next_transaction_id(&mut self) -> TransactionId {
        let id = TransactionId::from_sequence(self.next_sequence);
        self.next_sequence += 1;
        id
    }

    /// Sequence number the next allocated identifier will carry.
    pub fn peek_sequence(&self) -> u64 {
        self.next_sequence
    }

    pub fn customers(&self) -> impl Iterator<Item = &Customer> {
        self.customers.values()
    }

    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }

    /// Number of transactions across every history.
    pub fn transaction_count(&self) -> usize {
        self.history.values().map(Vec::len).sum()
    }
}

impl Default for LedgerState {
    fn default() -> Self {
        Self::new()
    }
}

/// Thread-safe handle to a ledger.
pub struct LedgerStore {
    state: Mutex<LedgerState>,
}

impl LedgerStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::from_state(LedgerState::new())
    }

    /// Wrap a prepared ledger state.
    pub fn from_state(state: LedgerState) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }

    /// Run `f` with exclusive access to the whole ledger.
    ///
    /// Everything `f` reads and writes is seen by other callers as a single
    /// step. The lock is released when `f` returns, whatever it returns.
    pub fn atomically<R>(&self, f: impl FnOnce(&mut LedgerState) -> R) -> R {
        let mut state = self.state.lock();
        f(&mut *state)
    }

    fn read<R>(&self, f: impl FnOnce(&LedgerState) -> R) -> R {
        let state = self.state.lock();
        f(&*state)
    }

    pub fn get_customer(&self, id: &CustomerId) -> Result<Customer> {
        self.read(|ledger| ledger.customer(id).cloned())
    }

    /// Customer record with every account they own embedded.
    pub fn get_customer_profile(&self, id: &CustomerId) -> Result<CustomerProfile> {
        self.read(|ledger| {
            let customer = ledger.customer(id)?.clone();
            let accounts = ledger.accounts_for_customer(id);
            Ok(CustomerProfile { customer, accounts })
        })
    }

    pub fn get_account(&self, id: &AccountId) -> Result<Account> {
        self.read(|ledger| ledger.account(id).cloned())
    }

    pub fn get_accounts_for_customer(&self, customer_id: &CustomerId) -> Vec<Account> {
        self.read(|ledger| ledger.accounts_for_customer(customer_id))
    }

    pub fn get_history(&self, account_id: &AccountId) -> Result<Vec<Transaction>> {
        self.read(|ledger| ledger.history(account_id).map(<[Transaction]>::to_vec))
    }

    /// Account and history read under the same lock.
    pub fn get_statement(&self, account_id: &AccountId) -> Result<AccountStatement> {
        self.read(|ledger| {
            Ok(AccountStatement {
                account: ledger.account(account_id)?.clone(),
                transactions: ledger.history(account_id)?.to_vec(),
            })
        })
    }

    pub fn list_customers(&self) -> Vec<Customer> {
        self.read(|ledger| ledger.customers().cloned().collect())
    }

    pub fn list_accounts(&self) -> Vec<Account> {
        self.read(|ledger| ledger.accounts().cloned().collect())
    }

    /// Append to an account's history without touching its balance.
    ///
    /// Callers that also move money should use [`LedgerStore::atomically`]
    /// instead so both writes land together.
    pub fn append_transaction(&self, account_id: &AccountId, transaction: Transaction) -> Result<()> {
        debug!(account = %account_id, transaction = %transaction.id, "Appending transaction");
        self.atomically(|ledger| ledger.append_transaction(account_id, transaction))
    }

    pub fn next_transaction_id(&self) -> TransactionId {
        self.atomically(LedgerState::next_transaction_id)
    }

    pub fn transaction_count(&self) -> usize {
        self.read(LedgerState::transaction_count)
    }
}

impl Default for LedgerStore {
    fn default() -> Self {
        Self::new()
    }
}
