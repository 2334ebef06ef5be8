// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use netbank::application::{LedgerService, RegistrationRequest};
use netbank::domain::{AccountKind, AccountProfile, Cents, Transaction};

/// Helper to create a service holding the two demo users
pub fn seeded_service() -> Result<LedgerService> {
    Ok(LedgerService::with_seed_data()?)
}

/// Helper to create a service with no users, accounts or transactions
pub fn empty_service() -> LedgerService {
    LedgerService::new()
}

/// Helper to build a valid registration request
pub fn registration(username: &str, kind: AccountKind) -> RegistrationRequest {
    RegistrationRequest {
        username: username.to_string(),
        password: format!("{}-secret", username),
        email: format!("{}@mail.test", username),
        phone: "9876543210".to_string(),
        holder_name: format!("{} Holder", username),
        kind,
        profile: AccountProfile {
            address: Some("12 Lake Road".to_string()),
            date_of_birth: Some("1990-04-12".to_string()),
            gender: Some("Female".to_string()),
            ..Default::default()
        },
    }
}

/// Current balance of an account, failing the test if it does not exist
pub fn balance_of(service: &LedgerService, number: &str) -> Result<Cents> {
    Ok(service.get_account(number)?.balance())
}

/// The account's history as (type, amount, description) triples
pub fn history_of(service: &LedgerService, number: &str) -> Vec<(String, Cents, String)> {
    service
        .transaction_history(number)
        .into_iter()
        .map(|t: Transaction| (t.kind.to_string(), t.amount_cents, t.description))
        .collect()
}
