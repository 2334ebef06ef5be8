use anyhow::Result;

use crate::domain::{Account, AccountKind, Cents, Transaction, TransactionKind, User, rupees};
use crate::storage::Repository;

struct DemoUser {
    id: &'static str,
    username: &'static str,
    password: &'static str,
    email: &'static str,
    phone: &'static str,
    account_number: &'static str,
    kind: AccountKind,
    opening_balance: Cents,
}

const DEMO_USERS: [DemoUser; 2] = [
    DemoUser {
        id: "U001",
        username: "srisha",
        password: "password123",
        email: "sri@email.com",
        phone: "1234567890",
        account_number: "ACC001",
        kind: AccountKind::Savings,
        opening_balance: rupees(50_000),
    },
    DemoUser {
        id: "U002",
        username: "shilki",
        password: "password456",
        email: "shilki@email.com",
        phone: "0987654321",
        account_number: "ACC002",
        kind: AccountKind::Current,
        opening_balance: rupees(100_000),
    },
];

/// Populate `repo` with the deterministic demo ledger: two users, one account
/// each, and an initial DEPOSIT matching every opening balance.
pub fn seed_demo_data(repo: &mut Repository) -> Result<()> {
    for demo in &DEMO_USERS {
        let user = User::new(
            demo.id,
            demo.username,
            demo.password,
            demo.email,
            demo.phone,
        );
        let account = Account::open(
            demo.account_number,
            demo.username,
            demo.kind,
            demo.opening_balance,
        );
        repo.save_user_with_account(user, account)?;
    }

    for demo in &DEMO_USERS {
        repo.save_transaction(Transaction::new(
            demo.account_number,
            TransactionKind::Deposit,
            demo.opening_balance,
            "Initial deposit",
        ));
    }

    Ok(())
}
