/// renewal - penalties accrue past the due date, then the loan is rolled over
use chrono::{Duration, TimeZone, Utc};
use loan_ledger_rs::{
    ClientDetails, InMemoryStore, Ledger, LedgerConfig, LoanRequest, Money, Pricing, Rate,
    RenewalRequest, SafeTimeProvider, TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    println!("=== renewal example ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2026, 1, 27, 9, 0, 0).unwrap(),
    ));
    let controller = time.test_control().unwrap();
    let mut ledger = Ledger::new(LedgerConfig::standard(), InMemoryStore::new())?;

    let client = ledger.register_client(
        ClientDetails {
            full_name: "Maria Gomez".to_string(),
            national_id: "27999888".to_string(),
            address: "Avenida 9".to_string(),
            phone: "555-0199".to_string(),
            backup_phones: vec!["555-0198".to_string()],
            notes: Some("referred by a previous client".to_string()),
        },
        &time,
    )?;

    let loan = ledger.originate_loan(
        LoanRequest {
            client_id: client.id,
            principal: Money::from_major(1_000),
            term_days: 7,
            pricing: Pricing::Table,
            issued_on: None,
        },
        &time,
    )?;
    println!("issued on {}: owes {} by {}", loan.issued_on, loan.total_owed, loan.due_on);

    // three days late
    controller.advance(Duration::days(10));
    let view = ledger.loan(loan.id, &time)?;
    println!(
        "{}: {} days overdue, penalty {}, now owes {}",
        time.now().format("%Y-%m-%d"),
        view.financial.days_overdue,
        view.financial.penalty_total,
        view.financial.updated_total
    );

    // asking for more than is owed is rejected and changes nothing
    let too_much = RenewalRequest {
        amount: Money::from_major(5_000),
        term_days: 14,
        pricing: Pricing::Explicit(Rate::from_percentage(40)),
    };
    if let Err(e) = ledger.renew_loan(loan.id, too_much, &time) {
        println!("rejected: {}", e);
    }

    // roll the principal into a new 14 day loan
    let outcome = ledger.renew_loan(
        loan.id,
        RenewalRequest {
            amount: Money::from_major(1_000),
            term_days: 14,
            pricing: Pricing::Table,
        },
        &time,
    )?;
    println!(
        "renewed into {}: owes {} by {} (period {})",
        outcome.successor.id,
        outcome.successor.total_owed,
        outcome.successor.due_on,
        outcome.successor.period
    );

    for event in ledger.take_events() {
        println!("event: {:?}", event);
    }

    Ok(())
}
