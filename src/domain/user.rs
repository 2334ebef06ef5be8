use serde::Serialize;

use super::AccountNumber;

pub type UserId = String;

/// Build the user id for the n-th registered user (1-based): "U001", "U002", ...
///
/// Derived from the user count, so it would collide if users were ever removed.
/// Users are never removed.
pub fn user_id_for(ordinal: usize) -> UserId {
    format!("U{:03}", ordinal)
}

/// An account owner. Accounts themselves live in the repository's index;
/// the user holds their numbers in opening order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    #[serde(skip_serializing)]
    password: String,
    pub email: String,
    pub phone: String,
    pub accounts: Vec<AccountNumber>,
}

impl User {
    pub fn new(
        id: impl Into<UserId>,
        username: impl Into<String>,
        password: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            password: password.into(),
            email: email.into(),
            phone: phone.into(),
            accounts: Vec::new(),
        }
    }

    /// Exact, case-sensitive credential match.
    pub fn matches(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }

    pub fn add_account(&mut self, number: AccountNumber) {
        self.accounts.push(number);
    }

    pub fn owns(&self, number: &str) -> bool {
        self.accounts.iter().any(|n| n == number)
    }
}
