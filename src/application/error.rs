use thiserror::Error;

use crate::domain::{AccountError, AccountNumber, Cents};

/// Broad failure categories a caller can branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input; retry with corrected values
    Validation,
    /// Unknown account or credentials
    NotFound,
    /// The request clashes with existing state
    Conflict,
    /// Broken internal invariant
    Internal,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Required field is empty: {0}")]
    MissingField(&'static str),

    #[error("Password must be at least {min_len} characters long")]
    WeakPassword { min_len: usize },

    #[error("Cannot transfer to the same account: {0}")]
    SameAccount(AccountNumber),

    #[error("Source account not found: {0}")]
    SourceAccountNotFound(AccountNumber),

    #[error("Destination account not found: {0}")]
    DestinationAccountNotFound(AccountNumber),

    #[error("Account not found: {0}")]
    AccountNotFound(AccountNumber),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Username already exists: {0}")]
    UsernameTaken(String),

    #[error(
        "Insufficient funds in account {account}: balance {balance}, requested {requested}, minimum balance {minimum}"
    )]
    InsufficientFunds {
        account: AccountNumber,
        balance: Cents,
        requested: Cents,
        minimum: Cents,
    },

    #[error("Deposit of {amount} into account {account} would exceed the largest balance ({balance} held)")]
    BalanceLimit {
        account: AccountNumber,
        balance: Cents,
        amount: Cents,
    },

    #[error("Ledger storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::InvalidAmount(_)
            | AppError::MissingField(_)
            | AppError::WeakPassword { .. }
            | AppError::SameAccount(_)
            | AppError::InsufficientFunds { .. }
            | AppError::BalanceLimit { .. } => ErrorKind::Validation,
            AppError::SourceAccountNotFound(_)
            | AppError::DestinationAccountNotFound(_)
            | AppError::AccountNotFound(_)
            | AppError::UserNotFound(_)
            | AppError::InvalidCredentials => ErrorKind::NotFound,
            AppError::UsernameTaken(_) => ErrorKind::Conflict,
            AppError::Storage(_) => ErrorKind::Internal,
        }
    }

    /// Lift a domain rejection on `account` to the service boundary.
    pub(crate) fn from_account(account: &str, err: AccountError) -> Self {
        match err {
            AccountError::NonPositiveAmount(amount) => {
                AppError::InvalidAmount(format!("amount must be positive, got {}", amount))
            }
            AccountError::BelowMinimumBalance {
                balance,
                requested,
                minimum,
            } => AppError::InsufficientFunds {
                account: account.to_string(),
                balance,
                requested,
                minimum,
            },
            AccountError::BalanceOverflow { balance, amount } => AppError::BalanceLimit {
                account: account.to_string(),
                balance,
                amount,
            },
        }
    }
}
