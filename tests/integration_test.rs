mod common;

use anyhow::Result;
use common::{balance_of, empty_service, seeded_service};
use netbank::application::{AppError, ErrorKind};
use netbank::domain::{AccountKind, TransactionKind, parse_cents, rupees};

#[test]
fn test_seed_data() -> Result<()> {
    let service = seeded_service()?;

    let accounts = service.all_accounts();
    assert_eq!(accounts.len(), 2);

    let acc1 = service.get_account("ACC001")?;
    assert_eq!(acc1.holder, "srisha");
    assert_eq!(acc1.kind, AccountKind::Savings);
    assert_eq!(acc1.balance(), rupees(50_000));

    let acc2 = service.get_account("ACC002")?;
    assert_eq!(acc2.holder, "shilki");
    assert_eq!(acc2.kind, AccountKind::Current);
    assert_eq!(acc2.balance(), rupees(100_000));

    for (number, amount) in [("ACC001", rupees(50_000)), ("ACC002", rupees(100_000))] {
        let history = service.transaction_history(number);
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].kind, TransactionKind::Deposit);
        assert_eq!(history[0].amount_cents, amount);
    }

    assert!(service.check_integrity().is_healthy());
    Ok(())
}

#[test]
fn test_services_are_isolated() -> Result<()> {
    let first = seeded_service()?;
    let second = seeded_service()?;

    first.transfer("ACC001", "ACC002", rupees(500), "")?;

    assert_eq!(balance_of(&first, "ACC001")?, rupees(49_500));
    assert_eq!(balance_of(&second, "ACC001")?, rupees(50_000));
    assert!(empty_service().all_accounts().is_empty());

    Ok(())
}

#[test]
fn test_authenticate() -> Result<()> {
    let service = seeded_service()?;

    let user = service.authenticate("shilki", "password456")?;
    assert_eq!(user.id, "U002");
    assert_eq!(user.phone, "0987654321");

    for (username, password) in [
        ("shilki", "password123"),
        ("SHILKI", "password456"),
        ("nobody", "password456"),
        ("", ""),
    ] {
        let err = service.authenticate(username, password).unwrap_err();
        assert!(matches!(err, AppError::InvalidCredentials));
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    Ok(())
}

#[test]
fn test_account_queries() -> Result<()> {
    let service = seeded_service()?;

    let accounts = service.accounts_of("U001");
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0].number, "ACC001");

    assert!(service.accounts_of("U999").is_empty());
    assert!(service.lookup_account("ACC003").is_none());
    assert!(matches!(
        service.get_account("ACC003"),
        Err(AppError::AccountNotFound(_))
    ));
    assert!(service.transaction_history("ACC003").is_empty());

    Ok(())
}

#[test]
fn test_savings_withdrawal_scenario() -> Result<()> {
    let service = empty_service();
    let result = service.register(common::registration("asha", AccountKind::Savings))?;
    let number = result.account_number;

    // Bring the balance down to 150
    service.withdraw(&number, rupees(9_850), "setup")?;
    assert_eq!(balance_of(&service, &number)?, rupees(150));

    assert!(matches!(
        service.withdraw(&number, rupees(60), "too much"),
        Err(AppError::InsufficientFunds { .. })
    ));
    assert_eq!(balance_of(&service, &number)?, rupees(150));

    service.withdraw(&number, rupees(40), "ok")?;
    assert_eq!(balance_of(&service, &number)?, rupees(110));

    Ok(())
}

#[test]
fn test_interest_is_computed_not_posted() -> Result<()> {
    let service = seeded_service()?;

    let first = service.account_summary("ACC001")?;
    let second = service.account_summary("ACC001")?;
    assert_eq!(first.interest, rupees(1_000));
    assert_eq!(first.interest, second.interest);
    assert_eq!(service.account_summary("ACC002")?.interest, rupees(1_000));

    assert_eq!(balance_of(&service, "ACC001")?, rupees(50_000));
    assert_eq!(service.all_transactions().len(), 2);

    Ok(())
}

#[test]
fn test_deposit_then_withdraw_reconciles_with_log() -> Result<()> {
    let service = seeded_service()?;

    service.deposit("ACC002", rupees(2_000), "salary")?;
    service.withdraw("ACC002", rupees(500), "groceries")?;
    service.transfer("ACC002", "ACC001", rupees(1_500), "share")?;

    let report = service.check_integrity();
    assert!(report.is_healthy(), "{:?}", report.issues);
    assert_eq!(report.transaction_count, 6);
    assert_eq!(report.total_balance, rupees(151_500));

    Ok(())
}

#[test]
fn test_huge_amounts_are_rejected_or_reported_without_panicking() -> Result<()> {
    let service = seeded_service()?;

    let err = service
        .deposit("ACC001", parse_cents("92233720368547758.07")?, "big")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(balance_of(&service, "ACC001")?, rupees(50_000));

    service.deposit("ACC001", parse_cents("900000000000000")?, "large")?;
    let summary = service.account_summary("ACC001")?;
    assert_eq!(summary.interest, summary.account.balance() / 50);
    assert_eq!(summary.logged_balance, summary.account.balance());
    assert!(service.check_integrity().is_healthy());

    Ok(())
}
