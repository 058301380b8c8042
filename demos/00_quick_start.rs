/// quick start - one arrangement, two operations, the summary
use lending_ledger_rs::{
    ArrangementRequest, InMemoryRepository, LedgerService, OperationRequest,
};
use serde_json::json;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut ledger = LedgerService::with_system_time(InMemoryRepository::new());

    // a 12% loan between two people
    let loan = ledger.create_arrangement(&serde_json::from_value::<ArrangementRequest>(json!({
        "name": "Pożyczka na remont",
        "lender": "Anna",
        "borrower": "Piotr",
        "baseRate": 12
    }))?)?;

    // money out, then part of it back
    ledger.add_operation(&loan.id, &serde_json::from_value::<OperationRequest>(json!({
        "date": "2024-01-01", "type": "Wplata", "amount": 1000
    }))?)?;
    ledger.add_operation(&loan.id, &serde_json::from_value::<OperationRequest>(json!({
        "date": "2024-07-01", "type": "Splata", "amount": 200
    }))?)?;

    // print current state
    println!("{}", ledger.summary(&loan.id)?.to_json_pretty()?);

    Ok(())
}
