use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AccountNumber, Cents};

pub type TransactionId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionKind {
    /// Money entering an account from outside the ledger
    Deposit,
    /// Money leaving an account to outside the ledger
    Withdraw,
    /// Outgoing leg of a transfer
    Debit,
    /// Incoming leg of a transfer
    Credit,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "DEPOSIT",
            TransactionKind::Withdraw => "WITHDRAW",
            TransactionKind::Debit => "DEBIT",
            TransactionKind::Credit => "CREDIT",
        }
    }

    pub fn is_inflow(&self) -> bool {
        matches!(self, TransactionKind::Deposit | TransactionKind::Credit)
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One ledger-affecting event on a single account.
/// Transactions are immutable once appended to the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    /// Position in the ledger log, assigned by the repository
    pub sequence: u64,
    pub account_number: AccountNumber,
    pub kind: TransactionKind,
    /// Always positive
    pub amount_cents: Cents,
    pub timestamp: DateTime<Utc>,
    pub description: String,
}

impl Transaction {
    /// Create a new transaction. Sequence number must be assigned by the repository.
    pub fn new(
        account_number: impl Into<AccountNumber>,
        kind: TransactionKind,
        amount_cents: Cents,
        description: impl Into<String>,
    ) -> Self {
        let id = Uuid::new_v4().simple().to_string();
        Self {
            id: id.get(..8).unwrap_or(&id).to_string(),
            sequence: 0,
            account_number: account_number.into(),
            kind,
            amount_cents,
            timestamp: Utc::now(),
            description: description.into(),
        }
    }

    /// Signed effect of this transaction on its account's balance.
    pub fn signed_amount(&self) -> Cents {
        if self.kind.is_inflow() {
            self.amount_cents
        } else {
            -self.amount_cents
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_transaction() {
        let tx = Transaction::new("ACC001", TransactionKind::Deposit, 5000, "Initial deposit");

        assert_eq!(tx.id.len(), 8);
        assert_eq!(tx.account_number, "ACC001");
        assert_eq!(tx.kind, TransactionKind::Deposit);
        assert_eq!(tx.amount_cents, 5000);
        assert_eq!(tx.sequence, 0);
        assert_eq!(tx.description, "Initial deposit");
    }

    #[test]
    fn test_signed_amount() {
        assert_eq!(
            Transaction::new("A", TransactionKind::Credit, 700, "").signed_amount(),
            700
        );
        assert_eq!(
            Transaction::new("A", TransactionKind::Debit, 700, "").signed_amount(),
            -700
        );
        assert_eq!(
            Transaction::new("A", TransactionKind::Withdraw, 1, "").signed_amount(),
            -1
        );
    }

    #[test]
    fn test_kind_serializes_uppercase() {
        let json = serde_json::to_string(&TransactionKind::Withdraw).unwrap();
        assert_eq!(json, "\"WITHDRAW\"");
        assert_eq!(TransactionKind::Credit.to_string(), "CREDIT");
    }
}
