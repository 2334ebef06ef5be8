use std::collections::{BTreeMap, HashMap};

use anyhow::{Result, bail};

use crate::domain::{
    Account, AccountNumber, IntegrityReport, Transaction, User, UserId, build_integrity_report,
};

/// In-memory store for users, the account index and the transaction log.
///
/// The repository does no locking of its own; `LedgerService` wraps it in a
/// single lock so that multi-step changes are never observed half-applied.
#[derive(Debug, Default)]
pub struct Repository {
    users: BTreeMap<UserId, User>,
    accounts: HashMap<AccountNumber, Account>,
    transactions: Vec<Transaction>,
    next_sequence: u64,
}

impl Repository {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================
    // Users
    // ========================

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    pub fn get_user(&self, id: &str) -> Option<&User> {
        self.users.get(id)
    }

    pub fn get_user_by_username(&self, username: &str) -> Option<&User> {
        self.users.values().find(|u| u.username == username)
    }

    pub fn find_user_by_credentials(&self, username: &str, password: &str) -> Option<&User> {
        self.users.values().find(|u| u.matches(username, password))
    }

    /// All users ordered by user id.
    pub fn list_users(&self) -> Vec<User> {
        self.users.values().cloned().collect()
    }

    /// Insert a user together with its first account. Either both land or neither does.
    pub fn save_user_with_account(&mut self, mut user: User, account: Account) -> Result<()> {
        if self.users.contains_key(&user.id) {
            bail!("User id {} is already taken", user.id);
        }
        if self.get_user_by_username(&user.username).is_some() {
            bail!("Username {} is already taken", user.username);
        }
        if self.accounts.contains_key(&account.number) {
            bail!("Account number {} is already indexed", account.number);
        }

        user.add_account(account.number.clone());
        self.accounts.insert(account.number.clone(), account);
        self.users.insert(user.id.clone(), user);
        Ok(())
    }

    /// Attach another account to an existing user.
    pub fn save_account(&mut self, owner: &str, account: Account) -> Result<()> {
        if self.accounts.contains_key(&account.number) {
            bail!("Account number {} is already indexed", account.number);
        }
        let Some(user) = self.users.get_mut(owner) else {
            bail!("Owner {} does not exist", owner);
        };

        user.add_account(account.number.clone());
        self.accounts.insert(account.number.clone(), account);
        Ok(())
    }

    // ========================
    // Accounts
    // ========================

    pub fn contains_account(&self, number: &str) -> bool {
        self.accounts.contains_key(number)
    }

    pub fn get_account(&self, number: &str) -> Option<&Account> {
        self.accounts.get(number)
    }

    /// Replace an indexed account with an updated copy of itself.
    pub fn update_account(&mut self, account: Account) -> Result<()> {
        match self.accounts.get_mut(&account.number) {
            Some(slot) => {
                *slot = account;
                Ok(())
            }
            None => bail!("Account {} is not indexed", account.number),
        }
    }

    /// All indexed accounts, ordered by account number.
    pub fn list_accounts(&self) -> Vec<Account> {
        let mut accounts: Vec<Account> = self.accounts.values().cloned().collect();
        accounts.sort_by(|a, b| a.number.cmp(&b.number));
        accounts
    }

    /// Accounts owned by a user, in opening order.
    pub fn list_accounts_for_user(&self, user_id: &str) -> Vec<Account> {
        self.users
            .get(user_id)
            .map(|user| {
                user.accounts
                    .iter()
                    .filter_map(|n| self.accounts.get(n).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    // ========================
    // Transactions
    // ========================

    /// Append a transaction to the log, assigning the next sequence number.
    pub fn save_transaction(&mut self, mut transaction: Transaction) -> Transaction {
        self.next_sequence += 1;
        transaction.sequence = self.next_sequence;
        self.transactions.push(transaction.clone());
        transaction
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    pub fn list_transactions(&self) -> Vec<Transaction> {
        self.transactions.clone()
    }

    /// Transactions touching one account, in log order.
    pub fn list_transactions_for_account(&self, number: &str) -> Vec<Transaction> {
        self.transactions
            .iter()
            .filter(|t| t.account_number == number)
            .cloned()
            .collect()
    }

    // ========================
    // Integrity
    // ========================

    pub fn integrity_report(&self) -> IntegrityReport {
        build_integrity_report(self.users.values(), &self.accounts, &self.transactions)
    }
}
