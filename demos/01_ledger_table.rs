/// ledger table - per-operation rows with custom rates and deterministic time
use chrono::{TimeZone, Utc};
use lending_ledger_rs::{
    ArrangementRequest, InMemoryRepository, LedgerService, OperationRequest, SafeTimeProvider,
    TimeSource,
};
use serde_json::json;

fn operation(body: serde_json::Value) -> Result<OperationRequest, serde_json::Error> {
    serde_json::from_value(body)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== ledger table example ===\n");

    // fixed clock so created_at stamps are reproducible
    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    ));
    let mut ledger = LedgerService::new(InMemoryRepository::new(), time);

    let loan = ledger.create_arrangement(&serde_json::from_value::<ArrangementRequest>(json!({
        "name": "Samochód",
        "lender": "Jan",
        "borrower": "Ewa",
        "baseRate": "8,5"
    }))?)?;
    println!("created '{}' at {}", loan.name, loan.created_at.format("%Y-%m-%d %H:%M"));

    ledger.add_operation(&loan.id, &operation(json!({
        "date": "2024-01-15", "type": "Wplata", "amount": 25000, "note": "pierwsza transza"
    }))?)?;
    ledger.add_operation(&loan.id, &operation(json!({
        "date": "2024-03-01", "type": "Wplata", "amount": 10000,
        "rateMode": "custom", "customRate": 6, "note": "druga transza, niższa stopa"
    }))?)?;
    ledger.add_operation(&loan.id, &operation(json!({
        "date": "2024-06-30", "type": "Splata", "amount": "5000,00"
    }))?)?;
    let last = ledger.add_operation(&loan.id, &operation(json!({
        "date": "2024-12-31", "type": "Splata", "amount": 12000
    }))?)?;

    println!("{}", ledger.ledger(&loan.id)?.render_table());

    // switch the last repayment to a custom rate and compare
    let before = ledger.summary(&loan.id)?.total_interest;
    ledger.update_operation(&last.id, &operation(json!({
        "rateMode": "custom", "customRate": 10
    }))?)?;
    let after = ledger.summary(&loan.id)?.total_interest;
    println!("total interest: {} -> {}", before.round_dp(2), after.round_dp(2));

    // what happened, in order
    println!("\nevents:");
    for event in ledger.take_events() {
        println!("  {:?}", event);
    }

    Ok(())
}
