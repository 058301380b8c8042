/// json store - file-backed ledger loaded from config, with tracing output
use lending_ledger_rs::{
    ArrangementRequest, LedgerConfig, LedgerService, OperationRequest, Result as LedgerResult,
    SafeTimeProvider, TimeSource,
};
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // store under the temp dir so the demo leaves the working tree alone
    let dir = std::env::temp_dir().join("lending-ledger-demo");
    let config = LedgerConfig::with_store_path(dir.join("db.json"));
    let store = config.open_store();
    println!("store: {}", store.path().display());

    let time = SafeTimeProvider::new(TimeSource::System);
    let mut ledger = LedgerService::with_defaults(store, time, config.defaults.clone());

    let loan = ledger.create_arrangement(&serde_json::from_value::<ArrangementRequest>(json!({
        "name": "Mieszkanie",
        "lender": "Rodzice",
        "borrower": "Kasia",
        "baseRate": 3
    }))?)?;
    ledger.add_operation(&loan.id, &serde_json::from_value::<OperationRequest>(json!({
        "date": "2023-09-01", "type": "Deposit", "amount": 150000
    }))?)?;
    ledger.add_operation(&loan.id, &serde_json::from_value::<OperationRequest>(json!({
        "date": "2024-09-01", "type": "Repayment", "amount": 20000
    }))?)?;

    // rejected input never reaches the file
    let rejected: LedgerResult<_> = ledger.add_operation(
        &loan.id,
        &serde_json::from_value::<OperationRequest>(json!({
            "date": "2024-13-01", "type": "Wplata", "amount": 1
        }))?,
    );
    if let Err(e) = rejected {
        println!("rejected: {}", e);
    }

    // a second process would see the same file
    let reopened = LedgerService::with_system_time(config.open_store());
    println!("{}", reopened.summary(&loan.id)?.to_json_pretty()?);

    // cascade delete leaves an empty store behind
    ledger.delete_arrangement(&loan.id)?;
    println!("arrangements left: {}", ledger.list_arrangements()?.len());

    std::fs::remove_dir_all(&dir)?;
    Ok(())
}
