/// drive "today" from a test clock instead of the wall clock
use installment_ledger_rs::chrono::{NaiveDate, TimeZone, Utc};
use installment_ledger_rs::{CollectionLedger, Loan, Money, SafeTimeProvider, TimeSource};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut ledger = CollectionLedger::new();
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let loan_id = ledger.register_loan(Loan::daily(Money::from_major(100), start)?)?;

    ledger.record_payment(loan_id, start, Money::from_major(300))?;

    // pin the clock to jan 2nd; the account is still a day ahead
    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 2, 9, 0, 0).unwrap(),
    ));
    let status = ledger.status_now(loan_id, Money::ZERO, &time)?;
    println!("jan 2: {:?}, paid through {}", status.state, status.paid_through);

    // advance to jan 5th and the advance has run out
    if let Some(control) = time.test_control() {
        control.advance(installment_ledger_rs::chrono::Duration::days(3));
    }
    let status = ledger.status_now(loan_id, Money::ZERO, &time)?;
    println!("jan 5: {:?}, remaining {}", status.state, status.remaining);

    Ok(())
}
