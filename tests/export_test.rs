mod common;

use anyhow::Result;
use common::seeded_service;
use netbank::domain::rupees;
use netbank::io::Exporter;
use tempfile::TempDir;

#[test]
fn test_export_history_csv() -> Result<()> {
    let service = seeded_service()?;
    service.transfer("ACC001", "ACC002", rupees(1_000), "rent")?;

    let mut buf = Vec::new();
    let count = Exporter::new(&service).export_history_csv("ACC001", &mut buf)?;
    assert_eq!(count, 2);

    let mut reader = csv::Reader::from_reader(buf.as_slice());
    let headers = reader.headers()?.clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec!["id", "sequence", "timestamp", "account", "type", "amount", "description"]
    );

    let rows: Vec<csv::StringRecord> = reader.records().collect::<Result<_, _>>()?;
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][4], "DEPOSIT");
    assert_eq!(&rows[0][5], "50000.00");
    assert_eq!(&rows[1][4], "DEBIT");
    assert_eq!(&rows[1][5], "1000.00");
    assert_eq!(&rows[1][6], "Transfer to ACC002 - rent");

    Ok(())
}

#[test]
fn test_export_history_unknown_account_fails() -> Result<()> {
    let service = seeded_service()?;
    let mut buf = Vec::new();

    assert!(
        Exporter::new(&service)
            .export_history_csv("ACC404", &mut buf)
            .is_err()
    );
    assert!(buf.is_empty());

    Ok(())
}

#[test]
fn test_export_accounts_to_file() -> Result<()> {
    let service = seeded_service()?;
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("accounts.csv");

    let file = std::fs::File::create(&path)?;
    let count = Exporter::new(&service).export_accounts_csv(file)?;
    assert_eq!(count, 2);

    let contents = std::fs::read_to_string(&path)?;
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines[0], "account,holder,type,balance,minimum_balance");
    assert_eq!(lines[1], "ACC001,srisha,Savings,50000.00,100.00");
    assert_eq!(lines[2], "ACC002,shilki,Current,100000.00,5000.00");

    Ok(())
}

#[test]
fn test_full_json_export_omits_passwords() -> Result<()> {
    let service = seeded_service()?;

    let mut buf = Vec::new();
    let snapshot = Exporter::new(&service).export_full_json(&mut buf)?;
    assert_eq!(snapshot.users.len(), 2);
    assert_eq!(snapshot.accounts.len(), 2);
    assert_eq!(snapshot.transactions.len(), 2);

    let json = String::from_utf8(buf)?;
    assert!(!json.contains("password123"));
    assert!(!json.contains("password456"));

    let value: serde_json::Value = serde_json::from_str(&json)?;
    assert_eq!(value["users"][0]["username"], "srisha");
    assert_eq!(value["accounts"][1]["kind"], "current");
    assert_eq!(value["transactions"][0]["kind"], "DEPOSIT");

    Ok(())
}

#[test]
fn test_statement_json() -> Result<()> {
    let service = seeded_service()?;
    service.deposit("ACC002", rupees(250), "refund")?;

    let mut buf = Vec::new();
    let statement = Exporter::new(&service).export_statement_json("ACC002", &mut buf)?;

    assert_eq!(statement.account.number, "ACC002");
    assert_eq!(statement.transactions.len(), 2);

    let value: serde_json::Value = serde_json::from_slice(&buf)?;
    assert_eq!(value["account"]["balance"], rupees(100_250));
    assert_eq!(value["transactions"][1]["description"], "refund");

    Ok(())
}
