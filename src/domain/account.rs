use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::{Cents, rupees};

pub type AccountNumber = String;

/// Balance and interest policy of an account kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountPolicy {
    /// Lowest balance a withdrawal may leave behind
    pub minimum_balance: Cents,
    /// Annual interest rate in basis points (1% = 100)
    pub interest_bps: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    Savings,
    Current,
}

impl AccountKind {
    pub const ALL: [AccountKind; 2] = [AccountKind::Savings, AccountKind::Current];

    pub const fn policy(&self) -> AccountPolicy {
        match self {
            AccountKind::Savings => AccountPolicy {
                minimum_balance: rupees(100),
                interest_bps: 200,
            },
            AccountKind::Current => AccountPolicy {
                minimum_balance: rupees(5_000),
                interest_bps: 100,
            },
        }
    }

    pub const fn minimum_balance(&self) -> Cents {
        self.policy().minimum_balance
    }

    pub const fn interest_bps(&self) -> i64 {
        self.policy().interest_bps
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountKind::Savings => "Savings",
            AccountKind::Current => "Current",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "savings" | "savings account" => Some(AccountKind::Savings),
            "current" | "current account" => Some(AccountKind::Current),
            _ => None,
        }
    }
}

impl std::fmt::Display for AccountKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Optional personal details captured when an account is opened.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountProfile {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountError {
    #[error("amount must be positive, got {0} cents")]
    NonPositiveAmount(Cents),

    #[error(
        "withdrawing {requested} cents from a balance of {balance} cents would breach the minimum of {minimum} cents"
    )]
    BelowMinimumBalance {
        balance: Cents,
        requested: Cents,
        minimum: Cents,
    },

    #[error("depositing {amount} cents onto a balance of {balance} cents exceeds the largest balance")]
    BalanceOverflow { balance: Cents, amount: Cents },
}

/// A single bank account. The balance only moves through `deposit`,
/// `withdraw` and `transfer_to`, each of which leaves it untouched on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    pub number: AccountNumber,
    pub holder: String,
    pub kind: AccountKind,
    balance: Cents,
    pub created_at: DateTime<Utc>,
    pub profile: AccountProfile,
}

impl Account {
    pub fn open(
        number: impl Into<AccountNumber>,
        holder: impl Into<String>,
        kind: AccountKind,
        opening_balance: Cents,
    ) -> Self {
        Self {
            number: number.into(),
            holder: holder.into(),
            kind,
            balance: opening_balance,
            created_at: Utc::now(),
            profile: AccountProfile::default(),
        }
    }

    pub fn with_profile(mut self, profile: AccountProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Generate a fresh account number: "ACC" followed by eight hex digits.
    pub fn generate_number() -> AccountNumber {
        let id = Uuid::new_v4().simple().to_string();
        format!("ACC{}", id.get(..8).unwrap_or(&id).to_uppercase())
    }

    pub fn balance(&self) -> Cents {
        self.balance
    }

    pub fn minimum_balance(&self) -> Cents {
        self.kind.minimum_balance()
    }

    /// Interest the current balance would earn over a year. Never posted.
    pub fn calculate_interest(&self) -> Cents {
        // The rate never exceeds 100%, so the result fits back into Cents
        (i128::from(self.balance) * i128::from(self.kind.interest_bps()) / 10_000) as Cents
    }

    /// How much can be withdrawn without breaching the minimum balance.
    pub fn available_to_withdraw(&self) -> Cents {
        (self.balance - self.minimum_balance()).max(0)
    }

    pub fn deposit(&mut self, amount: Cents) -> Result<(), AccountError> {
        self.balance = self.balance_after_deposit(amount)?;
        Ok(())
    }

    pub fn withdraw(&mut self, amount: Cents) -> Result<(), AccountError> {
        self.balance = self.balance_after_withdraw(amount)?;
        Ok(())
    }

    /// Move `amount` into `target`. Both legs are checked before either
    /// balance moves, and a rejected withdrawal is reported first.
    pub fn transfer_to(&mut self, target: &mut Account, amount: Cents) -> Result<(), AccountError> {
        let remaining = self.balance_after_withdraw(amount)?;
        let credited = target.balance_after_deposit(amount)?;
        self.balance = remaining;
        target.balance = credited;
        Ok(())
    }

    fn balance_after_deposit(&self, amount: Cents) -> Result<Cents, AccountError> {
        if amount <= 0 {
            return Err(AccountError::NonPositiveAmount(amount));
        }
        self.balance
            .checked_add(amount)
            .ok_or(AccountError::BalanceOverflow {
                balance: self.balance,
                amount,
            })
    }

    fn balance_after_withdraw(&self, amount: Cents) -> Result<Cents, AccountError> {
        if amount <= 0 {
            return Err(AccountError::NonPositiveAmount(amount));
        }
        let minimum = self.minimum_balance();
        match self.balance.checked_sub(amount) {
            Some(remaining) if remaining >= minimum => Ok(remaining),
            _ => Err(AccountError::BelowMinimumBalance {
                balance: self.balance,
                requested: amount,
                minimum,
            }),
        }
    }
}

impl std::fmt::Display for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Account[{}, Holder: {}, Balance: Rs {}, Type: {}]",
            self.number,
            self.holder,
            super::format_cents(self.balance),
            self.kind
        )
    }
}
