/// a cashier's collection day across the three loan kinds
use installment_ledger_rs::chrono::NaiveDate;
use installment_ledger_rs::{AccountState, CollectionLedger, Loan, Money};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut ledger = CollectionLedger::new();
    let jan = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();

    let daily = ledger.register_loan(Loan::daily(Money::from_major(100), jan(1))?)?;
    let monthly = ledger.register_loan(Loan::monthly(Money::from_major(3000), jan(15))?)?;
    let pending = ledger.register_loan(Loan::fixed(Money::from_major(25_000), jan(1))?)?;

    // week one of collections on the daily loan
    for day in 1..=5 {
        ledger.record_payment(daily, jan(day), Money::from_major(100))?;
    }
    // the cashier mis-keyed day 5 and corrects it; the day is replaced, not doubled
    ledger.record_payment(daily, jan(5), Money::from_major(150))?;

    // one monthly installment, one lump payment on the pending loan
    ledger.record_payment(monthly, jan(15), Money::from_major(3000))?;
    ledger.record_payment(pending, jan(20), Money::from_major(10_000))?;

    let as_of = NaiveDate::from_ymd_opt(2024, 2, 16).unwrap();
    for (name, id) in [("daily", daily), ("monthly", monthly), ("pending", pending)] {
        let status = ledger.status(id, as_of, Money::ZERO)?;
        let flag = match status.state {
            AccountState::Arrears => "OVERDUE",
            AccountState::Settled => "ok",
            AccountState::Advance => "ahead",
            AccountState::NotStarted => "not started",
        };
        println!(
            "{name:>8}: due {} paid {} remaining {} [{flag}]",
            status.total_due, status.total_paid, status.remaining
        );
    }

    for event in ledger.take_events() {
        println!("event: {event:?}");
    }

    Ok(())
}
