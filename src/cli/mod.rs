use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{BufRead, Write};

use crate::application::{LedgerService, RegistrationRequest};
use crate::domain::{AccountKind, AccountProfile, Cents, Transaction, format_cents, parse_cents};

/// NetBank - in-memory account ledger
#[derive(Parser)]
#[command(name = "netbank")]
#[command(about = "An in-memory account ledger with minimum-balance policies")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Start from an empty ledger instead of the demo users
    #[arg(long, global = true)]
    pub no_seed: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// One line typed into the interactive shell
#[derive(Parser)]
#[command(name = "netbank", no_binary_name = true, disable_version_flag = true)]
struct ShellLine {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List accounts (all, or those owned by one user)
    Accounts {
        /// User id, e.g. U001
        #[arg(long)]
        user: Option<String>,
    },

    /// Show balance, minimum balance and projected interest for an account
    Balance {
        /// Account number
        account: String,
    },

    /// Show the transaction history of an account
    History {
        /// Account number
        account: String,

        /// Output format: table, csv, json
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Transfer money between two accounts
    Transfer {
        /// Amount to transfer (e.g., "50.00" or "50")
        amount: String,

        /// Source account number
        #[arg(long)]
        from: String,

        /// Destination account number
        #[arg(long)]
        to: String,

        /// Description of the transfer
        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Deposit money into an account
    Deposit {
        /// Account number
        account: String,

        /// Amount to deposit
        amount: String,

        #[arg(short, long, default_value = "Cash deposit")]
        description: String,
    },

    /// Withdraw money from an account
    Withdraw {
        /// Account number
        account: String,

        /// Amount to withdraw
        amount: String,

        #[arg(short, long, default_value = "Cash withdrawal")]
        description: String,
    },

    /// Check a username and password
    Login { username: String, password: String },

    /// Register a new user with a fresh account
    Register {
        username: String,

        #[arg(long)]
        password: String,

        /// Account holder's full name
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        phone: String,

        /// Account type: savings, current
        #[arg(short = 't', long = "type", default_value = "savings")]
        account_type: String,

        #[arg(long)]
        address: Option<String>,

        /// Date of birth
        #[arg(long)]
        dob: Option<String>,

        #[arg(long)]
        gender: Option<String>,
    },

    /// Open another account for an existing user
    Open {
        /// User id, e.g. U001
        user: String,

        /// Account type: savings, current
        #[arg(short = 't', long = "type")]
        account_type: String,

        /// Initial deposit; must cover the account type's minimum balance
        #[arg(long)]
        deposit: String,
    },

    /// Export data to CSV or JSON
    Export {
        /// What to export: accounts, history, statement, full
        export_type: String,

        /// Account number (for history and statement)
        #[arg(long)]
        account: Option<String>,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Verify ledger integrity
    Check,

    /// Run commands interactively against one ledger
    Shell,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let service = if self.no_seed {
            LedgerService::new()
        } else {
            LedgerService::with_seed_data()?
        };

        match self.command {
            Commands::Shell => {
                let stdin = std::io::stdin();
                run_shell(&service, stdin.lock(), std::io::stdout())
            }
            command => execute(&service, command),
        }
    }
}

/// Read commands line by line until EOF or `exit`. Errors are reported and the
/// shell keeps going; the ledger lives as long as the shell does.
pub fn run_shell<R: BufRead, W: Write>(
    service: &LedgerService,
    input: R,
    mut prompt: W,
) -> Result<()> {
    write!(prompt, "netbank> ")?;
    prompt.flush()?;

    for line in input.lines() {
        let line = line.context("Failed to read command")?;
        let words = split_words(&line);

        match words.first().map(String::as_str) {
            None => {}
            Some("exit") | Some("quit") => break,
            Some(_) => match ShellLine::try_parse_from(&words) {
                Ok(ShellLine {
                    command: Commands::Shell,
                }) => eprintln!("Already in a shell."),
                Ok(parsed) => {
                    if let Err(e) = execute(service, parsed.command) {
                        eprintln!("Error: {:#}", e);
                    }
                }
                Err(e) => eprintln!("{}", e),
            },
        }

        write!(prompt, "netbank> ")?;
        prompt.flush()?;
    }

    Ok(())
}

/// Split a shell line on whitespace, keeping double-quoted runs together.
fn split_words(line: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut has_word = false;

    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                has_word = true;
            }
            c if c.is_whitespace() && !quoted => {
                if has_word {
                    words.push(std::mem::take(&mut current));
                    has_word = false;
                }
            }
            c => {
                current.push(c);
                has_word = true;
            }
        }
    }
    if has_word {
        words.push(current);
    }

    words
}

fn parse_kind(input: &str) -> Result<AccountKind> {
    AccountKind::from_str(input).with_context(|| {
        format!(
            "Invalid account type '{}'. Valid types: savings, current",
            input
        )
    })
}

fn parse_amount(input: &str) -> Result<Cents> {
    parse_cents(input).with_context(|| format!("Invalid amount '{}'. Use '50.00' or '50'", input))
}

fn execute(service: &LedgerService, command: Commands) -> Result<()> {
    match command {
        Commands::Accounts { user } => run_accounts_command(service, user.as_deref())?,

        Commands::Balance { account } => {
            let summary = service.account_summary(&account)?;
            let account = &summary.account;

            println!("Account: {}", account.number);
            println!("  Holder:          {}", account.holder);
            println!("  Type:            {}", account.kind);
            println!(
                "  Opened:          {}",
                account.created_at.format("%Y-%m-%d %H:%M:%S")
            );
            println!("  Balance:         Rs {}", format_cents(account.balance()));
            println!(
                "  Minimum balance: Rs {}",
                format_cents(summary.minimum_balance)
            );
            println!("  Available:       Rs {}", format_cents(summary.available));
            println!("  Yearly interest: Rs {}", format_cents(summary.interest));
            if summary.logged_balance != account.balance() {
                println!(
                    "  WARNING: transaction log gives Rs {}",
                    format_cents(summary.logged_balance)
                );
            }
        }

        Commands::History { account, format } => match format.as_str() {
            "table" => {
                let (_, transactions) = service.account_with_history(&account)?;
                print_transactions(&transactions);
            }
            "csv" => {
                crate::io::Exporter::new(service)
                    .export_history_csv(&account, std::io::stdout())?;
            }
            "json" => {
                crate::io::Exporter::new(service)
                    .export_statement_json(&account, std::io::stdout())?;
                println!();
            }
            other => anyhow::bail!(
                "Invalid format '{}'. Valid formats: table, csv, json",
                other
            ),
        },

        Commands::Transfer {
            amount,
            from,
            to,
            description,
        } => {
            let amount_cents = parse_amount(&amount)?;
            let receipt = service.transfer(&from, &to, amount_cents, &description)?;

            println!(
                "Transferred Rs {} {} -> {} ({}, {})",
                format_cents(amount_cents),
                from,
                to,
                receipt.debit.id,
                receipt.credit.id
            );
            println!("New balance of {}: Rs {}", from, format_cents(receipt.from_balance));
        }

        Commands::Deposit {
            account,
            amount,
            description,
        } => {
            let tx = service.deposit(&account, parse_amount(&amount)?, &description)?;
            println!(
                "Deposited Rs {} into {} ({})",
                format_cents(tx.amount_cents),
                account,
                tx.id
            );
        }

        Commands::Withdraw {
            account,
            amount,
            description,
        } => {
            let tx = service.withdraw(&account, parse_amount(&amount)?, &description)?;
            println!(
                "Withdrew Rs {} from {} ({})",
                format_cents(tx.amount_cents),
                account,
                tx.id
            );
        }

        Commands::Login { username, password } => {
            let user = service.authenticate(&username, &password)?;
            println!("Welcome, {}! (user id {})", user.username, user.id);
            run_accounts_command(service, Some(&user.id))?;
        }

        Commands::Register {
            username,
            password,
            name,
            email,
            phone,
            account_type,
            address,
            dob,
            gender,
        } => {
            let kind = parse_kind(&account_type)?;
            let request = RegistrationRequest {
                username,
                password,
                holder_name: name,
                profile: AccountProfile {
                    email: Some(email.clone()),
                    phone: Some(phone.clone()),
                    address,
                    date_of_birth: dob,
                    gender,
                },
                email,
                phone,
                kind,
            };

            let registration = service.register(request)?;
            println!("Registration successful!");
            println!("  User id:         {}", registration.user_id);
            println!("  Account number:  {}", registration.account_number);
            println!(
                "  Initial balance: Rs {}",
                format_cents(registration.opening_balance)
            );
        }

        Commands::Open {
            user,
            account_type,
            deposit,
        } => {
            let account =
                service.open_account(&user, parse_kind(&account_type)?, parse_amount(&deposit)?)?;
            println!(
                "Opened {} account {} for {}",
                account.kind, account.number, user
            );
        }

        Commands::Export {
            export_type,
            account,
            output,
        } => run_export_command(service, &export_type, account.as_deref(), output.as_deref())?,

        Commands::Check => run_check_command(service)?,

        Commands::Shell => anyhow::bail!("The shell cannot be nested"),
    }

    Ok(())
}

fn run_accounts_command(service: &LedgerService, user: Option<&str>) -> Result<()> {
    let accounts = match user {
        Some(user_id) => service.accounts_of(user_id),
        None => service.all_accounts(),
    };

    if accounts.is_empty() {
        println!("No accounts found.");
        return Ok(());
    }

    println!(
        "{:<12} {:<20} {:<8} {:>14}",
        "ACCOUNT", "HOLDER", "TYPE", "BALANCE"
    );
    println!("{}", "-".repeat(57));
    for account in accounts {
        println!(
            "{:<12} {:<20} {:<8} {:>14}",
            account.number,
            account.holder,
            account.kind,
            format_cents(account.balance())
        );
    }
    Ok(())
}

fn print_transactions(transactions: &[Transaction]) {
    if transactions.is_empty() {
        println!("No transactions found.");
        return;
    }

    println!(
        "{:<20} {:<9} {:>14}  {}",
        "DATE", "TYPE", "AMOUNT", "DESCRIPTION"
    );
    println!("{}", "-".repeat(70));
    // Newest first
    for tx in transactions.iter().rev() {
        println!(
            "{:<20} {:<9} {:>14}  {}",
            tx.timestamp.format("%Y-%m-%d %H:%M:%S"),
            tx.kind,
            format_cents(tx.amount_cents),
            tx.description
        );
    }
}

fn run_export_command(
    service: &LedgerService,
    export_type: &str,
    account: Option<&str>,
    output: Option<&str>,
) -> Result<()> {
    use crate::io::Exporter;
    use std::fs::File;
    use std::io::stdout;

    let exporter = Exporter::new(service);

    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    let require_account = || {
        account.with_context(|| format!("--account is required for '{}' exports", export_type))
    };

    match export_type {
        "accounts" => {
            let count = exporter.export_accounts_csv(writer)?;
            if output.is_some() {
                eprintln!("Exported {} accounts", count);
            }
        }
        "history" => {
            let count = exporter.export_history_csv(require_account()?, writer)?;
            if output.is_some() {
                eprintln!("Exported {} transactions", count);
            }
        }
        "statement" => {
            let statement = exporter.export_statement_json(require_account()?, writer)?;
            if output.is_some() {
                eprintln!(
                    "Exported statement for {} with {} transactions",
                    statement.account.number,
                    statement.transactions.len()
                );
            }
        }
        "full" => {
            let snapshot = exporter.export_full_json(writer)?;
            if output.is_some() {
                eprintln!(
                    "Exported full ledger: {} users, {} accounts, {} transactions",
                    snapshot.users.len(),
                    snapshot.accounts.len(),
                    snapshot.transactions.len()
                );
            }
        }
        _ => {
            anyhow::bail!(
                "Invalid export type '{}'. Valid types: accounts, history, statement, full",
                export_type
            );
        }
    }

    Ok(())
}

fn run_check_command(service: &LedgerService) -> Result<()> {
    println!("Checking ledger integrity...\n");

    let report = service.check_integrity();

    println!("Users:        {}", report.user_count);
    println!("Accounts:     {}", report.account_count);
    println!("Transactions: {}", report.transaction_count);
    println!("Total held:   Rs {}", format_cents(report.total_balance));
    println!();

    if report.is_healthy() {
        println!("Ledger is consistent.");
    } else {
        println!("Issues found:");
        for issue in &report.issues {
            println!("  - {}", issue);
        }
        anyhow::bail!("Ledger integrity check failed");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_words_keeps_quoted_runs() {
        assert_eq!(
            split_words(r#"transfer 1000 --from ACC001 --to ACC002 -d "monthly rent""#),
            vec![
                "transfer",
                "1000",
                "--from",
                "ACC001",
                "--to",
                "ACC002",
                "-d",
                "monthly rent"
            ]
        );
        assert_eq!(split_words("   "), Vec::<String>::new());
        assert_eq!(split_words(r#"deposit ACC001 5 -d """#), vec!["deposit", "ACC001", "5", "-d", ""]);
    }

    #[test]
    fn test_cli_parses_transfer() {
        let cli = Cli::try_parse_from([
            "netbank", "transfer", "1000", "--from", "ACC001", "--to", "ACC002", "-d", "rent",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Transfer { ref amount, ref description, .. }
                if amount == "1000" && description == "rent"
        ));
    }

    #[test]
    fn test_shell_runs_commands_against_one_ledger() {
        let service = LedgerService::with_seed_data().unwrap();
        let script = "transfer 1000 --from ACC001 --to ACC002 -d rent\n\
                      bogus-command\n\
                      transfer 5 --from ACC001 --to ACC001\n\
                      exit\n\
                      deposit ACC001 1\n";

        let mut prompt = Vec::new();
        run_shell(&service, script.as_bytes(), &mut prompt).unwrap();

        assert_eq!(service.get_account("ACC001").unwrap().balance(), 4_900_000);
        assert_eq!(service.get_account("ACC002").unwrap().balance(), 10_100_000);
        // Seed deposits plus one transfer; nothing after `exit` runs
        assert_eq!(service.all_transactions().len(), 4);
        assert!(String::from_utf8(prompt).unwrap().starts_with("netbank> "));
    }

    #[test]
    fn test_parse_amount_yields_cents() {
        let amount: Cents = parse_amount("50.25").unwrap();
        assert_eq!(amount, 5_025);
        assert!(parse_amount("1.234").is_err());
    }

    #[test]
    fn test_shell_survives_oversized_deposit() {
        let service = LedgerService::with_seed_data().unwrap();
        let script = "deposit ACC001 92233720368547758.07
                      balance ACC001
                      deposit ACC001 10
";

        run_shell(&service, script.as_bytes(), Vec::new()).unwrap();

        assert_eq!(service.get_account("ACC001").unwrap().balance(), 5_001_000);
        assert_eq!(service.all_transactions().len(), 3);
    }

    #[test]
    fn test_parse_kind_rejects_unknown() {
        assert!(parse_kind("fixed").is_err());
        assert_eq!(parse_kind("Current").unwrap(), AccountKind::Current);
    }
}
