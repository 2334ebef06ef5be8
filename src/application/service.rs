use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::domain::{
    Account, AccountError, AccountKind, AccountNumber, AccountProfile, Cents, IntegrityReport,
    Transaction, TransactionKind, User, UserId, compute_balance, format_cents, rupees,
    user_id_for,
};
use crate::storage::Repository;

use super::{AppError, seed};

/// Amount credited to every account opened through registration.
pub const OPENING_BONUS: Cents = rupees(10_000);

/// Shortest password accepted at registration.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Application service providing high-level operations for the ledger.
/// This is the primary interface for any client (CLI, tests, embedding code).
///
/// All state sits behind one lock: mutations hold the write guard for their
/// whole duration, queries hold the read guard and return owned snapshots.
pub struct LedgerService {
    state: RwLock<Repository>,
}

/// Everything needed to register a user and open their first account.
#[derive(Debug, Clone)]
pub struct RegistrationRequest {
    pub username: String,
    pub password: String,
    pub email: String,
    pub phone: String,
    pub holder_name: String,
    pub kind: AccountKind,
    pub profile: AccountProfile,
}

/// Result of a successful registration
#[derive(Debug, Clone)]
pub struct Registration {
    pub user_id: UserId,
    pub account_number: AccountNumber,
    pub opening_balance: Cents,
}

/// Result of a successful transfer
#[derive(Debug, Clone)]
pub struct TransferReceipt {
    pub debit: Transaction,
    pub credit: Transaction,
    pub from_balance: Cents,
    pub to_balance: Cents,
}

/// Balance details for a single account
#[derive(Debug, Clone)]
pub struct AccountSummary {
    pub account: Account,
    pub minimum_balance: Cents,
    pub available: Cents,
    pub interest: Cents,
    /// Balance replayed from the transaction log
    pub logged_balance: Cents,
}

impl Default for LedgerService {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerService {
    /// Create a service over an empty ledger.
    pub fn new() -> Self {
        Self::from_repository(Repository::new())
    }

    pub fn from_repository(repo: Repository) -> Self {
        Self {
            state: RwLock::new(repo),
        }
    }

    /// Create a service populated with the two demo users.
    pub fn with_seed_data() -> Result<Self, AppError> {
        let mut repo = Repository::new();
        seed::seed_demo_data(&mut repo)?;
        info!(
            users = repo.user_count(),
            transactions = repo.transaction_count(),
            "Seeded demo ledger"
        );
        Ok(Self::from_repository(repo))
    }

    // ========================
    // Users
    // ========================

    /// Find the user with exactly this username and password.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<User, AppError> {
        let state = self.state.read();
        match state.find_user_by_credentials(username, password) {
            Some(user) => {
                info!(user_id = %user.id, %username, "User authenticated");
                Ok(user.clone())
            }
            None => {
                warn!(%username, "Authentication failed");
                Err(AppError::InvalidCredentials)
            }
        }
    }

    /// Register a new user with one freshly opened account carrying the opening bonus.
    pub fn register(&self, request: RegistrationRequest) -> Result<Registration, AppError> {
        let username = request.username.clone();
        let mut state = self.state.write();
        register_locked(&mut state, request)
            .inspect(|r| {
                info!(
                    user_id = %r.user_id,
                    %username,
                    account = %r.account_number,
                    "User registered"
                )
            })
            .inspect_err(|e| warn!(%username, error = %e, "Registration rejected"))
    }

    /// Open an additional account for an existing user, funded by `initial_deposit`.
    pub fn open_account(
        &self,
        user_id: &str,
        kind: AccountKind,
        initial_deposit: Cents,
    ) -> Result<Account, AppError> {
        let mut state = self.state.write();
        open_account_locked(&mut state, user_id, kind, initial_deposit)
            .inspect(|a| info!(%user_id, account = %a.number, %kind, "Account opened"))
            .inspect_err(|e| warn!(%user_id, %kind, error = %e, "Account opening rejected"))
    }

    pub fn user(&self, user_id: &str) -> Option<User> {
        self.state.read().get_user(user_id).cloned()
    }

    /// Accounts owned by a user in opening order; empty for an unknown user.
    pub fn accounts_of(&self, user_id: &str) -> Vec<Account> {
        debug!(%user_id, "Listing user accounts");
        self.state.read().list_accounts_for_user(user_id)
    }

    // ========================
    // Accounts
    // ========================

    /// Snapshot of every indexed account, ordered by account number.
    pub fn all_accounts(&self) -> Vec<Account> {
        self.state.read().list_accounts()
    }

    pub fn lookup_account(&self, number: &str) -> Option<Account> {
        self.state.read().get_account(number).cloned()
    }

    /// Like `lookup_account`, but an unknown number is an error.
    pub fn get_account(&self, number: &str) -> Result<Account, AppError> {
        self.lookup_account(number)
            .ok_or_else(|| AppError::AccountNotFound(number.to_string()))
    }

    /// Balance details plus the balance replayed from the account's own log,
    /// both read under one guard.
    pub fn account_summary(&self, number: &str) -> Result<AccountSummary, AppError> {
        let state = self.state.read();
        let account = state
            .get_account(number)
            .cloned()
            .ok_or_else(|| AppError::AccountNotFound(number.to_string()))?;
        let logged_balance = compute_balance(number, &state.list_transactions_for_account(number));

        Ok(AccountSummary {
            minimum_balance: account.minimum_balance(),
            available: account.available_to_withdraw(),
            interest: account.calculate_interest(),
            logged_balance,
            account,
        })
    }

    // ========================
    // Balance-changing operations
    // ========================

    pub fn deposit(
        &self,
        number: &str,
        amount: Cents,
        description: &str,
    ) -> Result<Transaction, AppError> {
        let mut state = self.state.write();
        apply_single_locked(&mut state, number, TransactionKind::Deposit, amount, description)
            .inspect(|t| info!(account = %number, amount_cents = amount, tx = %t.id, "Deposit posted"))
            .inspect_err(|e| warn!(account = %number, amount_cents = amount, error = %e, "Deposit rejected"))
    }

    pub fn withdraw(
        &self,
        number: &str,
        amount: Cents,
        description: &str,
    ) -> Result<Transaction, AppError> {
        let mut state = self.state.write();
        apply_single_locked(&mut state, number, TransactionKind::Withdraw, amount, description)
            .inspect(|t| info!(account = %number, amount_cents = amount, tx = %t.id, "Withdrawal posted"))
            .inspect_err(|e| warn!(account = %number, amount_cents = amount, error = %e, "Withdrawal rejected"))
    }

    /// Move money between two indexed accounts, posting a DEBIT and a CREDIT.
    /// On any failure neither balance nor the log changes.
    pub fn transfer(
        &self,
        from: &str,
        to: &str,
        amount: Cents,
        description: &str,
    ) -> Result<TransferReceipt, AppError> {
        let mut state = self.state.write();
        transfer_locked(&mut state, from, to, amount, description)
            .inspect(|r| {
                info!(
                    %from,
                    %to,
                    amount_cents = amount,
                    from_balance = r.from_balance,
                    to_balance = r.to_balance,
                    "Transfer completed"
                )
            })
            .inspect_err(|e| warn!(%from, %to, amount_cents = amount, error = %e, "Transfer rejected"))
    }

    // ========================
    // Queries
    // ========================

    /// Transactions for one account in the order they were posted.
    pub fn transaction_history(&self, number: &str) -> Vec<Transaction> {
        debug!(account = %number, "Reading transaction history");
        self.state.read().list_transactions_for_account(number)
    }

    /// An account together with its history, read under one guard.
    pub fn account_with_history(
        &self,
        number: &str,
    ) -> Result<(Account, Vec<Transaction>), AppError> {
        let state = self.state.read();
        let account = state
            .get_account(number)
            .cloned()
            .ok_or_else(|| AppError::AccountNotFound(number.to_string()))?;
        Ok((account, state.list_transactions_for_account(number)))
    }

    /// Users, accounts and the transaction log, read under one guard.
    pub fn snapshot(&self) -> (Vec<User>, Vec<Account>, Vec<Transaction>) {
        let state = self.state.read();
        (
            state.list_users(),
            state.list_accounts(),
            state.list_transactions(),
        )
    }

    /// The whole transaction log in posting order.
    pub fn all_transactions(&self) -> Vec<Transaction> {
        self.state.read().list_transactions()
    }

    pub fn check_integrity(&self) -> IntegrityReport {
        self.state.read().integrity_report()
    }
}

fn require(field: &'static str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::MissingField(field));
    }
    Ok(())
}

fn fresh_account_number(repo: &Repository) -> AccountNumber {
    loop {
        let number = Account::generate_number();
        if !repo.contains_account(&number) {
            return number;
        }
    }
}

fn register_locked(
    repo: &mut Repository,
    request: RegistrationRequest,
) -> Result<Registration, AppError> {
    require("username", &request.username)?;
    require("password", &request.password)?;
    require("full name", &request.holder_name)?;
    require("email", &request.email)?;
    require("phone", &request.phone)?;
    if request.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::WeakPassword {
            min_len: MIN_PASSWORD_LEN,
        });
    }

    if repo.get_user_by_username(&request.username).is_some() {
        return Err(AppError::UsernameTaken(request.username));
    }

    let user_id = user_id_for(repo.user_count() + 1);
    let account = Account::open(
        fresh_account_number(repo),
        request.holder_name,
        request.kind,
        OPENING_BONUS,
    )
    .with_profile(request.profile);
    let account_number = account.number.clone();

    let user = User::new(
        user_id.clone(),
        request.username,
        request.password,
        request.email,
        request.phone,
    );
    repo.save_user_with_account(user, account)?;
    repo.save_transaction(Transaction::new(
        account_number.clone(),
        TransactionKind::Deposit,
        OPENING_BONUS,
        "Account opening bonus",
    ));

    Ok(Registration {
        user_id,
        account_number,
        opening_balance: OPENING_BONUS,
    })
}

fn open_account_locked(
    repo: &mut Repository,
    user_id: &str,
    kind: AccountKind,
    initial_deposit: Cents,
) -> Result<Account, AppError> {
    let holder = repo
        .get_user(user_id)
        .map(|u| u.username.clone())
        .ok_or_else(|| AppError::UserNotFound(user_id.to_string()))?;

    if initial_deposit < kind.minimum_balance() {
        return Err(AppError::InvalidAmount(format!(
            "a {} account needs an initial deposit of at least {}",
            kind,
            format_cents(kind.minimum_balance())
        )));
    }

    let account = Account::open(fresh_account_number(repo), holder, kind, initial_deposit);
    repo.save_account(user_id, account.clone())?;
    repo.save_transaction(Transaction::new(
        account.number.clone(),
        TransactionKind::Deposit,
        initial_deposit,
        "Initial deposit",
    ));
    Ok(account)
}

fn apply_single_locked(
    repo: &mut Repository,
    number: &str,
    kind: TransactionKind,
    amount: Cents,
    description: &str,
) -> Result<Transaction, AppError> {
    let mut account = repo
        .get_account(number)
        .cloned()
        .ok_or_else(|| AppError::AccountNotFound(number.to_string()))?;

    let outcome = match kind {
        TransactionKind::Deposit => account.deposit(amount),
        _ => account.withdraw(amount),
    };
    outcome.map_err(|e| AppError::from_account(number, e))?;

    repo.update_account(account)?;
    Ok(repo.save_transaction(Transaction::new(number, kind, amount, description)))
}

fn transfer_locked(
    repo: &mut Repository,
    from: &str,
    to: &str,
    amount: Cents,
    description: &str,
) -> Result<TransferReceipt, AppError> {
    let mut source = repo
        .get_account(from)
        .cloned()
        .ok_or_else(|| AppError::SourceAccountNotFound(from.to_string()))?;
    let mut destination = repo
        .get_account(to)
        .cloned()
        .ok_or_else(|| AppError::DestinationAccountNotFound(to.to_string()))?;

    if from == to {
        return Err(AppError::SameAccount(from.to_string()));
    }

    // Both legs run on copies; nothing is written back unless both succeed.
    source
        .transfer_to(&mut destination, amount)
        .map_err(|e| match e {
            AccountError::BalanceOverflow { .. } => AppError::from_account(to, e),
            e => AppError::from_account(from, e),
        })?;

    let from_balance = source.balance();
    let to_balance = destination.balance();
    repo.update_account(source)?;
    repo.update_account(destination)?;

    let debit = repo.save_transaction(Transaction::new(
        from,
        TransactionKind::Debit,
        amount,
        format!("Transfer to {} - {}", to, description),
    ));
    let credit = repo.save_transaction(Transaction::new(
        to,
        TransactionKind::Credit,
        amount,
        format!("Transfer from {} - {}", from, description),
    ));

    Ok(TransferReceipt {
        debit,
        credit,
        from_balance,
        to_balance,
    })
}
