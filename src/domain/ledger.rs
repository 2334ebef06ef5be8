use std::collections::HashMap;

use super::{Account, AccountNumber, Cents, Transaction, User};

/// Compute the balance of a single account from the transaction log.
/// Balance = sum of inflows (DEPOSIT, CREDIT) - sum of outflows (WITHDRAW, DEBIT)
pub fn compute_balance(account_number: &str, transactions: &[Transaction]) -> Cents {
    transactions
        .iter()
        .filter(|t| t.account_number == account_number)
        .map(Transaction::signed_amount)
        .fold(0, Cents::saturating_add)
}

/// Compute log-derived balances for every account that appears in the log.
pub fn compute_all_balances(transactions: &[Transaction]) -> HashMap<AccountNumber, Cents> {
    let mut balances: HashMap<AccountNumber, Cents> = HashMap::new();

    for transaction in transactions {
        let balance = balances
            .entry(transaction.account_number.clone())
            .or_insert(0);
        *balance = balance.saturating_add(transaction.signed_amount());
    }

    balances
}

/// Result of checking the ledger's structural invariants.
#[derive(Debug, Clone, Default)]
pub struct IntegrityReport {
    pub user_count: usize,
    pub account_count: usize,
    pub transaction_count: usize,
    pub total_balance: Cents,
    pub issues: Vec<String>,
}

impl IntegrityReport {
    pub fn is_healthy(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Check ownership, log references, minimum balances and log reconciliation.
///
/// `users` and `accounts` are the repository's two views of the same accounts:
/// every owned number must be indexed, and every indexed account must be owned
/// by exactly one user.
pub fn build_integrity_report<'a>(
    users: impl IntoIterator<Item = &'a User>,
    accounts: &HashMap<AccountNumber, Account>,
    transactions: &[Transaction],
) -> IntegrityReport {
    let mut report = IntegrityReport {
        account_count: accounts.len(),
        transaction_count: transactions.len(),
        // Saturates at Cents::MAX
        total_balance: accounts
            .values()
            .map(Account::balance)
            .fold(0, Cents::saturating_add),
        ..Default::default()
    };

    let mut owners: HashMap<&str, usize> = HashMap::new();
    for user in users {
        report.user_count += 1;
        for number in &user.accounts {
            *owners.entry(number.as_str()).or_insert(0) += 1;
            if !accounts.contains_key(number) {
                report.issues.push(format!(
                    "Account {} owned by {} is missing from the index",
                    number, user.username
                ));
            }
        }
    }

    let log_balances = compute_all_balances(transactions);

    let mut numbers: Vec<&AccountNumber> = accounts.keys().collect();
    numbers.sort();
    for number in numbers {
        let Some(account) = accounts.get(number) else {
            continue;
        };

        match owners.get(number.as_str()).copied().unwrap_or(0) {
            0 => report
                .issues
                .push(format!("Account {} has no owner", number)),
            1 => {}
            n => report
                .issues
                .push(format!("Account {} is owned by {} users", number, n)),
        }

        if account.balance() < account.minimum_balance() {
            report.issues.push(format!(
                "Account {} is below its minimum balance ({} < {})",
                number,
                account.balance(),
                account.minimum_balance()
            ));
        }

        let from_log = log_balances.get(number).copied().unwrap_or(0);
        if from_log != account.balance() {
            report.issues.push(format!(
                "Account {} balance {} does not match its transaction log ({})",
                number,
                account.balance(),
                from_log
            ));
        }
    }

    let mut dangling: Vec<&AccountNumber> = log_balances
        .keys()
        .filter(|n| !accounts.contains_key(*n))
        .collect();
    dangling.sort();
    for number in dangling {
        report.issues.push(format!(
            "Transactions reference unknown account {}",
            number
        ));
    }

    report
}
