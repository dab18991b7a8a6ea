/// dashboard - period totals and the investor book
use chrono::{Duration, TimeZone, Utc};
use loan_ledger_rs::{
    ClientDetails, InMemoryStore, InvestorRequest, Ledger, LedgerConfig, LoanFilter, LoanRequest,
    Money, PeriodFilter, Pricing, Rate, SafeTimeProvider, TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    println!("=== dashboard ===\n");

    let start = Utc.with_ymd_and_hms(2026, 1, 5, 10, 0, 0).unwrap();
    let time = SafeTimeProvider::new(TimeSource::Test(start));
    let controller = time.test_control().unwrap();
    let mut ledger = Ledger::new(LedgerConfig::standard(), InMemoryStore::new())?;

    let client = ledger.register_client(
        ClientDetails {
            full_name: "Carlos Diaz".to_string(),
            national_id: "30111222".to_string(),
            address: "Pasaje 3".to_string(),
            phone: "555-0150".to_string(),
            backup_phones: Vec::new(),
            notes: None,
        },
        &time,
    )?;

    let request = |principal: i64, term_days: u32| LoanRequest {
        client_id: client.id,
        principal: Money::from_major(principal),
        term_days,
        pricing: Pricing::Table,
        issued_on: None,
    };

    // january book
    let a = ledger.originate_loan(request(1_000, 7), &time)?;
    let b = ledger.originate_loan(request(2_000, 30), &time)?;
    ledger.originate_loan(request(500, 14), &time)?;
    controller.advance(Duration::days(7));
    ledger.settle_loan(a.id, Money::from_major(1_200), &time)?;

    // february book
    controller.advance(Duration::days(30));
    ledger.originate_loan(request(1_500, 7), &time)?;
    ledger.add_principal(b.id, Money::from_major(250), &time)?;

    ledger.register_investor(
        InvestorRequest {
            name: "Ana".to_string(),
            invested: Money::from_major(10_000),
            daily_rate: Rate::from_percentage(1),
            start,
            end: start + Duration::days(30),
        },
        &time,
    )?;

    println!("as of {}\n", time.now().format("%Y-%m-%d"));
    let mut filters = vec![PeriodFilter::All];
    filters.extend(ledger.periods()?.into_iter().map(PeriodFilter::Only));
    for filter in filters {
        let summary = ledger.summary(filter, &time)?;
        println!("{:?}", filter);
        println!("  lent:        {}", summary.total_lent);
        println!("  receivable:  {}", summary.total_receivable.round_dp(2));
        println!("  recovered:   {}", summary.total_recovered);
        println!("  loans:       {}", summary.loan_count);
        println!("  delinquent:  {}", summary.delinquent_count);
    }

    println!("\ndelinquent loans:");
    for view in ledger.loans_filtered(LoanFilter::Delinquent, &time)? {
        println!(
            "  {} {} days late, owes {}",
            view.id, view.financial.days_overdue, view.financial.updated_total
        );
    }

    println!("\ninvestors:");
    for view in ledger.investors()? {
        println!("{}", view.to_json_pretty()?);
    }
    println!("{:?}", ledger.investor_summary()?);

    Ok(())
}
