//! Transaction records kept in each account's history.

use std::fmt;
use std::str::FromStr;

use cbs_common::{CbsError, Direction, Timestamp, TransactionId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Direction of a transaction relative to the account it is booked on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    /// Money in.
    Credit,
    /// Money out.
    Debit,
}

/// How a transaction's type is labelled on the wire.
///
/// Statement entries (seeded history, both legs of a transfer) carry the
/// accented labels the dashboard matches on; single postings echo the
/// upper-cased request type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LabelStyle {
    /// `CRÉDIT` / `DÉBIT`.
    #[default]
    Statement,
    /// `CREDIT` / `DEBIT`.
    Posting,
}

impl TransactionKind {
    /// Lower-case name, as accepted on posting requests.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Credit => "credit",
            TransactionKind::Debit => "debit",
        }
    }

    /// Balance direction for this kind.
    pub fn direction(&self) -> Direction {
        match self {
            TransactionKind::Credit => Direction::Inflow,
            TransactionKind::Debit => Direction::Outflow,
        }
    }

    /// Wire label in the given style.
    pub fn label(&self, style: LabelStyle) -> &'static str {
        match (self, style) {
            (TransactionKind::Credit, LabelStyle::Statement) => "CRÉDIT",
            (TransactionKind::Debit, LabelStyle::Statement) => "DÉBIT",
            (TransactionKind::Credit, LabelStyle::Posting) => "CREDIT",
            (TransactionKind::Debit, LabelStyle::Posting) => "DEBIT",
        }
    }

    /// Parse an exact wire label back into kind and style.
    pub fn from_label(label: &str) -> Option<(Self, LabelStyle)> {
        match label {
            "CRÉDIT" => Some((TransactionKind::Credit, LabelStyle::Statement)),
            "DÉBIT" => Some((TransactionKind::Debit, LabelStyle::Statement)),
            "CREDIT" => Some((TransactionKind::Credit, LabelStyle::Posting)),
            "DEBIT" => Some((TransactionKind::Debit, LabelStyle::Posting)),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = CbsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "credit" | "crédit" => Ok(TransactionKind::Credit),
            "debit" | "débit" => Ok(TransactionKind::Debit),
            _ => Err(CbsError::InvalidTransactionKind(s.to_string())),
        }
    }
}

/// A single booked movement on one account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "TransactionRecord", try_from = "TransactionRecord")]
pub struct Transaction {
    /// Sequential identifier.
    pub id: TransactionId,
    /// Credit or debit.
    pub kind: TransactionKind,
    /// Label style used for `type` on the wire.
    pub style: LabelStyle,
    /// When the movement was booked.
    pub date: Timestamp,
    /// Free-form label shown on statements.
    pub description: String,
    /// Signed amount: positive for credit, negative for debit.
    pub amount: Decimal,
}

#[derive(Serialize, Deserialize)]
struct TransactionRecord {
    id: TransactionId,
    #[serde(rename = "type")]
    label: String,
    date: Timestamp,
    description: String,
    #[serde(rename = "montant")]
    amount: Decimal,
}

impl From<Transaction> for TransactionRecord {
    fn from(tx: Transaction) -> Self {
        Self {
            label: tx.kind.label(tx.style).to_string(),
            id: tx.id,
            date: tx.date,
            description: tx.description,
            amount: tx.amount,
        }
    }
}

impl TryFrom<TransactionRecord> for Transaction {
    type Error = CbsError;

    fn try_from(record: TransactionRecord) -> Result<Self, Self::Error> {
        let (kind, style) = TransactionKind::from_label(&record.label)
            .ok_or(CbsError::InvalidTransactionKind(record.label))?;
        Ok(Self {
            id: record.id,
            kind,
            style,
            date: record.date,
            description: record.description,
            amount: record.amount,
        })
    }
}

impl Transaction {
    /// Book `amount` (unsigned) in the given direction.
    pub fn new(
        id: TransactionId,
        kind: TransactionKind,
        amount: Decimal,
        description: impl Into<String>,
        date: Timestamp,
    ) -> Self {
        Self {
            id,
            kind,
            style: LabelStyle::Statement,
            date,
            description: description.into(),
            amount: kind.direction().signed(amount),
        }
    }

    /// Create a credit transaction.
    pub fn credit(
        id: TransactionId,
        amount: Decimal,
        description: impl Into<String>,
        date: Timestamp,
    ) -> Self {
        Self::new(id, TransactionKind::Credit, amount, description, date)
    }

    /// Create a debit transaction.
    pub fn debit(
        id: TransactionId,
        amount: Decimal,
        description: impl Into<String>,
        date: Timestamp,
    ) -> Self {
        Self::new(id, TransactionKind::Debit, amount, description, date)
    }

    /// Relabel with `style`.
    pub fn with_style(mut self, style: LabelStyle) -> Self {
        self.style = style;
        self
    }

    /// Unsigned amount.
    pub fn magnitude(&self) -> Decimal {
        self.amount.abs()
    }
}

/// Sum of signed amounts over a history slice.
pub fn net_movement(history: &[Transaction]) -> Decimal {
    history.iter().map(|t| t.amount).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cbs_common::now;
    use rust_decimal_macros::dec;

    #[test]
    fn test_signed_amounts() {
        let debit = Transaction::debit(TransactionId::from_sequence(1), dec!(120.50), "Paiement Facture STEG", now());
        let credit = Transaction::credit(TransactionId::from_sequence(2), dec!(4500), "Virement Salaire", now());

        assert_eq!(debit.amount, dec!(-120.50));
        assert_eq!(debit.magnitude(), dec!(120.50));
        assert_eq!(credit.amount, dec!(4500));
        assert_eq!(net_movement(&[debit, credit]), dec!(4379.50));
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("credit".parse::<TransactionKind>(), Ok(TransactionKind::Credit));
        assert_eq!("DEBIT".parse::<TransactionKind>(), Ok(TransactionKind::Debit));
        assert_eq!("Débit".parse::<TransactionKind>(), Ok(TransactionKind::Debit));
        assert_eq!(
            "refund".parse::<TransactionKind>(),
            Err(CbsError::InvalidTransactionKind("refund".to_string()))
        );
    }

    #[test]
    fn test_wire_format_uses_legacy_keys() {
        let tx = Transaction::debit(TransactionId::from_sequence(12), dec!(100), "Virement à A002", now());
        let json = serde_json::to_value(&tx).unwrap();

        assert_eq!(json["id"], "TRN012");
        assert_eq!(json["type"], "DÉBIT");
        assert_eq!(json["montant"].as_f64(), Some(-100.0));
        assert_eq!(json["description"], "Virement à A002");
    }

    #[test]
    fn test_statement_labels_round_trip_from_input() {
        let json = r#"{"id":"TRN003","type":"CRÉDIT","date":"2024-01-01T00:00:00Z","description":"Virement Salaire","montant":4500.00}"#;
        let tx: Transaction = serde_json::from_str(json).unwrap();

        assert_eq!(tx.kind, TransactionKind::Credit);
        assert_eq!(tx.style, LabelStyle::Statement);
        assert_eq!(tx.amount, dec!(4500));
    }

    #[test]
    fn test_posting_style_keeps_plain_label() {
        let tx = Transaction::credit(TransactionId::from_sequence(12), dec!(50), "credit transaction", now())
            .with_style(LabelStyle::Posting);
        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["type"], "CREDIT");

        let back: Transaction = serde_json::from_value(json).unwrap();
        assert_eq!(back, tx);
    }

    #[test]
    fn test_unknown_label_rejected() {
        let json = r#"{"id":"TRN001","type":"REFUND","date":"2024-01-01T00:00:00Z","description":"x","montant":1}"#;
        assert!(serde_json::from_str::<Transaction>(json).is_err());
    }
}
