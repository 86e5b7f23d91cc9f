/// quick start - minimal example to get started
use installment_ledger_rs::chrono::NaiveDate;
use installment_ledger_rs::{CollectionLedger, Loan, Money, StatusSummary};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut ledger = CollectionLedger::new();

    // a 100-per-day loan starting new year's day
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let loan_id = ledger.register_loan(Loan::daily(Money::from_major(100), start)?)?;

    // record the first two days' collections
    ledger.record_payment(loan_id, start, Money::from_major(100))?;
    ledger.record_payment(loan_id, start.succ_opt().unwrap(), Money::from_major(100))?;

    // where does the account stand on day three, before today's collection?
    let as_of = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
    let status = ledger.status(loan_id, as_of, Money::ZERO)?;
    println!("{}", status.json());

    // and after the cashier keys in today's 250
    let status = ledger.status(loan_id, as_of, Money::from_major(250))?;
    println!("{}", StatusSummary::from_status(&status).json());

    Ok(())
}
