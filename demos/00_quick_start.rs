/// quick start - minimal example to get started
use loan_ledger_rs::{
    ClientDetails, InMemoryStore, Ledger, LedgerConfig, LoanRequest, Money, Pricing,
    SafeTimeProvider, TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let time = SafeTimeProvider::new(TimeSource::System);
    let mut ledger = Ledger::new(LedgerConfig::standard(), InMemoryStore::new())?;

    // register a borrower
    let client = ledger.register_client(
        ClientDetails {
            full_name: "Juan Perez".to_string(),
            national_id: "20123456".to_string(),
            address: "Calle 1".to_string(),
            phone: "555-0100".to_string(),
            backup_phones: Vec::new(),
            notes: None,
        },
        &time,
    )?;

    // lend 1,000 for 7 days at the standard 20%
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

    // print current state
    println!("{}", ledger.loan(loan.id, &time)?.to_json_pretty()?);

    Ok(())
}
