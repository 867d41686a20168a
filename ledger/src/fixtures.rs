//! Seed data loaded at start-up.
//!
//! Every timestamp is derived from one reference instant: an account opened
//! 365 days ago is `reference - 365 days`, regardless of the order entities
//! are built in.

use cbs_common::{days_before, AccountId, Currency, CustomerId, Result, Timestamp, TransactionId};
use rust_decimal::Decimal;

use crate::account::{Account, AccountCategory};
use crate::customer::Customer;
use crate::journal::{Transaction, TransactionKind};
use crate::store::{LedgerState, LedgerStore};

struct CustomerSeed {
    id: &'static str,
    first_name: &'static str,
    last_name: &'static str,
    address: &'static str,
    email: &'static str,
    phone: &'static str,
}

struct AccountSeed {
    id: &'static str,
    customer_id: &'static str,
    category: AccountCategory,
    iban: &'static str,
    /// Opening balance in hundredths.
    balance_cents: i64,
    opened_days_ago: i64,
}

struct TransactionSeed {
    account_id: &'static str,
    sequence: u64,
    kind: TransactionKind,
    days_ago: i64,
    description: &'static str,
    /// Unsigned amount in hundredths.
    amount_cents: i64,
}

const CUSTOMERS: &[CustomerSeed] = &[
    CustomerSeed {
        id: "C001",
        first_name: "Mohamed",
        last_name: "Ben Ali",
        address: "12 Rue de Carthage, 2000 Le Bardo, Tunis",
        email: "mohamed.benali@email.tn",
        phone: "+216 98 123 456",
    },
    CustomerSeed {
        id: "C002",
        first_name: "Fatima",
        last_name: "El Fihri",
        address: "45 Avenue Habib Bourguiba, 4000 Sousse",
        email: "fatima.elfihri@email.tn",
        phone: "+216 22 789 012",
    },
    CustomerSeed {
        id: "C003",
        first_name: "Ali",
        last_name: "Trabelsi",
        address: "7 Avenue de Paris, 1000 Tunis",
        email: "ali.trabelsi@email.com",
        phone: "+216 55 123 789",
    },
    CustomerSeed {
        id: "C004",
        first_name: "Aisha",
        last_name: "Bouslama",
        address: "3 Rue El Marr, 3000 Sfax",
        email: "aisha.bouslama@email.com",
        phone: "+216 21 987 654",
    },
];

const ACCOUNTS: &[AccountSeed] = &[
    AccountSeed {
        id: "A001",
        customer_id: "C001",
        category: AccountCategory::Checking,
        iban: "TN59 1000 6035 0000 0123 4567 89",
        balance_cents: 1_585_075,
        opened_days_ago: 365,
    },
    AccountSeed {
        id: "A002",
        customer_id: "C001",
        category: AccountCategory::Savings,
        iban: "TN59 1000 6035 0000 0789 0123 45",
        balance_cents: 12_500_000,
        opened_days_ago: 730,
    },
    AccountSeed {
        id: "A003",
        customer_id: "C002",
        category: AccountCategory::Checking,
        iban: "TN59 1400 3051 0000 0987 6543 21",
        balance_cents: 723_050,
        opened_days_ago: 180,
    },
    AccountSeed {
        id: "A004",
        customer_id: "C003",
        category: AccountCategory::Checking,
        iban: "TN59 1200 8091 0000 0543 2167 89",
        balance_cents: 2_150_000,
        opened_days_ago: 90,
    },
    AccountSeed {
        id: "A005",
        customer_id: "C004",
        category: AccountCategory::Checking,
        iban: "TN59 1100 7061 0000 0876 5432 10",
        balance_cents: 980_025,
        opened_days_ago: 45,
    },
    AccountSeed {
        id: "A006",
        customer_id: "C004",
        category: AccountCategory::Savings,
        iban: "TN59 1100 7061 0000 0112 2334 45",
        balance_cents: 5_000_000,
        opened_days_ago: 45,
    },
];

const HISTORY: &[TransactionSeed] = &[
    TransactionSeed { account_id: "A001", sequence: 1, kind: TransactionKind::Debit, days_ago: 5, description: "Paiement Facture STEG", amount_cents: 12_050 },
    TransactionSeed { account_id: "A001", sequence: 2, kind: TransactionKind::Debit, days_ago: 3, description: "Achat en ligne Jumia", amount_cents: 34_500 },
    TransactionSeed { account_id: "A001", sequence: 3, kind: TransactionKind::Credit, days_ago: 1, description: "Virement Salaire", amount_cents: 450_000 },
    TransactionSeed { account_id: "A002", sequence: 4, kind: TransactionKind::Credit, days_ago: 30, description: "Dépôt initial", amount_cents: 10_000_000 },
    TransactionSeed { account_id: "A002", sequence: 5, kind: TransactionKind::Credit, days_ago: 15, description: "Intérêts annuels", amount_cents: 250_000 },
    TransactionSeed { account_id: "A003", sequence: 6, kind: TransactionKind::Credit, days_ago: 10, description: "Virement de \"Ahmed\"", amount_cents: 80_000 },
    TransactionSeed { account_id: "A003", sequence: 7, kind: TransactionKind::Debit, days_ago: 2, description: "Retrait GAB", amount_cents: 20_000 },
    TransactionSeed { account_id: "A004", sequence: 8, kind: TransactionKind::Credit, days_ago: 20, description: "Virement international", amount_cents: 1_500_000 },
    TransactionSeed { account_id: "A004", sequence: 9, kind: TransactionKind::Debit, days_ago: 5, description: "Paiement restaurant", amount_cents: 15_000 },
    TransactionSeed { account_id: "A005", sequence: 10, kind: TransactionKind::Credit, days_ago: 12, description: "Dépôt chèque", amount_cents: 200_000 },
    TransactionSeed { account_id: "A006", sequence: 11, kind: TransactionKind::Credit, days_ago: 40, description: "Dépôt initial", amount_cents: 5_000_000 },
];

fn cents(value: i64) -> Decimal {
    Decimal::new(value, 2)
}

/// Build the demo ledger relative to `reference`.
pub fn seed_state(reference: Timestamp) -> Result<LedgerState> {
    let mut state = LedgerState::new();

    for seed in CUSTOMERS {
        state.insert_customer(Customer {
            id: CustomerId::new(seed.id),
            first_name: seed.first_name.to_string(),
            last_name: seed.last_name.to_string(),
            address: seed.address.to_string(),
            email: seed.email.to_string(),
            phone: seed.phone.to_string(),
        });
    }

    for seed in ACCOUNTS {
        let mut account = Account::new(
            seed.id,
            seed.customer_id,
            seed.category,
            seed.iban,
            cents(seed.balance_cents),
            Currency::tnd(),
            days_before(reference, seed.opened_days_ago),
        );
        account.updated_at = reference;
        state.insert_account(account);
    }

    for seed in HISTORY {
        let transaction = Transaction::new(
            TransactionId::from_sequence(seed.sequence),
            seed.kind,
            cents(seed.amount_cents),
            seed.description,
            days_before(reference, seed.days_ago),
        );
        state.seed_transaction(&AccountId::new(seed.account_id), transaction)?;
    }

    Ok(state)
}

impl LedgerStore {
    /// Store preloaded with the demo customers, accounts and history,
    /// dated relative to now.
    pub fn seeded() -> Result<Self> {
        Ok(Self::from_state(seed_state(cbs_common::now())?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cbs_common::now;
    use rust_decimal_macros::dec;

    #[test]
    fn test_seed_counts() {
        let state = seed_state(now()).unwrap();
        assert_eq!(state.customers().count(), 4);
        assert_eq!(state.accounts().count(), 6);
        assert_eq!(state.transaction_count(), 11);
    }

    #[test]
    fn test_counter_seeded_after_fixtures() {
        let mut state = seed_state(now()).unwrap();
        assert_eq!(state.peek_sequence(), 12);
        assert_eq!(state.next_transaction_id().as_str(), "TRN012");
    }

    #[test]
    fn test_balances_match_fixture_values() {
        let state = seed_state(now()).unwrap();
        let balance = |id: &str| state.account(&AccountId::new(id)).unwrap().balance;

        assert_eq!(balance("A001"), dec!(15850.75));
        assert_eq!(balance("A002"), dec!(125000.00));
        assert_eq!(balance("A003"), dec!(7230.50));
        assert_eq!(balance("A005"), dec!(9800.25));
    }

    #[test]
    fn test_timestamps_offset_from_single_reference() {
        let reference = now();
        let state = seed_state(reference).unwrap();

        let a002 = state.account(&AccountId::new("A002")).unwrap();
        assert_eq!((reference - a002.created_at).num_days(), 730);
        assert_eq!(a002.updated_at, reference);

        let a005 = state.account(&AccountId::new("A005")).unwrap();
        let a006 = state.account(&AccountId::new("A006")).unwrap();
        assert_eq!(a005.created_at, a006.created_at);

        let history = state.history(&AccountId::new("A001")).unwrap();
        assert_eq!((reference - history[0].date).num_days(), 5);
        assert_eq!((reference - history[2].date).num_days(), 1);
    }

    #[test]
    fn test_customer_c004_owns_two_accounts() {
        let state = seed_state(now()).unwrap();
        let accounts = state.accounts_for_customer(&CustomerId::new("C004"));
        let ids: Vec<_> = accounts.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["A005", "A006"]);
    }
}
