//! CBS Ledger
//!
//! In-memory core banking ledger: customers, accounts and per-account
//! transaction histories, with a transfer engine and a single-account posting
//! engine that keep balances and histories in step.

pub mod account;
pub mod customer;
pub mod engine;
pub mod fixtures;
pub mod journal;
pub mod store;

pub use account::{Account, AccountCategory};
pub use customer::{Customer, CustomerProfile};
pub use engine::{LedgerEngine, PostingReceipt, PostingRequest, TransferReceipt, TransferRequest};
pub use fixtures::seed_state;
pub use journal::{net_movement, LabelStyle, Transaction, TransactionKind};
pub use store::{AccountStatement, LedgerState, LedgerStore};
