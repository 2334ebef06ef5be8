use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;

use crate::application::LedgerService;
use crate::domain::{Account, Transaction, User, format_cents};

/// Statement for a single account: the account as it stands plus its history.
#[derive(Debug, Clone, Serialize)]
pub struct Statement {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub account: Account,
    pub transactions: Vec<Transaction>,
}

/// Point-in-time copy of the whole ledger
#[derive(Debug, Clone, Serialize)]
pub struct LedgerSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub users: Vec<User>,
    pub accounts: Vec<Account>,
    pub transactions: Vec<Transaction>,
}

/// Exporter for converting ledger data to CSV or JSON
pub struct Exporter<'a> {
    service: &'a LedgerService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a LedgerService) -> Self {
        Self { service }
    }

    /// Export one account's transaction history to CSV format
    pub fn export_history_csv<W: Write>(&self, account_number: &str, writer: W) -> Result<usize> {
        // Fail on unknown accounts instead of writing an empty file
        let (_, transactions) = self.service.account_with_history(account_number)?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record([
            "id",
            "sequence",
            "timestamp",
            "account",
            "type",
            "amount",
            "description",
        ])?;

        for tx in &transactions {
            csv_writer.write_record([
                tx.id.clone(),
                tx.sequence.to_string(),
                tx.timestamp.to_rfc3339(),
                tx.account_number.clone(),
                tx.kind.to_string(),
                format_cents(tx.amount_cents),
                tx.description.clone(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(transactions.len())
    }

    /// Export every indexed account with its balance to CSV format
    pub fn export_accounts_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let accounts = self.service.all_accounts();
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["account", "holder", "type", "balance", "minimum_balance"])?;

        for account in &accounts {
            csv_writer.write_record([
                account.number.clone(),
                account.holder.clone(),
                account.kind.to_string(),
                format_cents(account.balance()),
                format_cents(account.minimum_balance()),
            ])?;
        }

        csv_writer.flush()?;
        Ok(accounts.len())
    }

    /// Export one account's statement as pretty JSON
    pub fn export_statement_json<W: Write>(
        &self,
        account_number: &str,
        mut writer: W,
    ) -> Result<Statement> {
        let (account, transactions) = self.service.account_with_history(account_number)?;
        let statement = Statement {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            account,
            transactions,
        };

        let json = serde_json::to_string_pretty(&statement)?;
        writer.write_all(json.as_bytes())?;
        writer.flush().context("Failed to flush statement")?;

        Ok(statement)
    }

    /// Export the full ledger as a JSON snapshot. Passwords are never written.
    pub fn export_full_json<W: Write>(&self, mut writer: W) -> Result<LedgerSnapshot> {
        let (users, accounts, transactions) = self.service.snapshot();

        let snapshot = LedgerSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            users,
            accounts,
            transactions,
        };

        let json = serde_json::to_string_pretty(&snapshot)?;
        writer.write_all(json.as_bytes())?;
        writer.flush().context("Failed to flush snapshot")?;

        Ok(snapshot)
    }
}
