use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::{LedgerError, Result};
use crate::period::{date_after_periods, period_before, periods_elapsed};
use crate::types::{AccountState, Loan, Payment, PeriodUnit};

/// the authoritative answer to "where does this account stand as of a date"
///
/// computed, never persisted. every surface that shows arrears, settlement,
/// or advance-credit figures renders one of these; none of them recompute
/// dates or sums on their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentStatus {
    pub as_of: NaiveDate,
    pub state: AccountState,
    /// installment × periods elapsed, or the fixed target once started
    pub total_due: Money,
    /// ledger sum strictly before `as_of`; today's own ledger entry is
    /// excluded because `today_payment` stands in for it
    pub paid_before_today: Money,
    /// the caller-supplied uncommitted amount for `as_of` itself, which may
    /// differ from any saved entry while the cashier is still editing
    pub today_payment: Money,
    pub total_paid: Money,
    /// signed: positive = arrears, zero = settled, negative = advance credit.
    /// Fixed loans clamp at zero since overpayment has no future period to
    /// roll into.
    pub remaining: Money,
    /// what was outstanding one period before `as_of`, ignoring today's
    /// activity, clamped at zero for display
    pub previous_remaining: Money,
    /// advance credit left over after covering whole future periods, applied
    /// toward the period after `paid_through`
    pub partial_credit: Money,
    /// the last date the ledger fully covers; meaningful for Settled and
    /// Advance, reported as `as_of` otherwise
    pub paid_through: NaiveDate,
    /// due date of the next uncovered installment, when the account is ahead
    /// of or level with its schedule
    pub next_due: Option<NaiveDate>,
}

impl PaymentStatus {
    /// serialize for surfaces that pass status across a process boundary
    pub fn json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// compute an account's standing as of `as_of`.
///
/// `payments` must already be scoped to this loan; entries dated on or after
/// `as_of` are ignored (today is represented by `today_payment`, future
/// entries are not yet relevant). pure: no clock, no storage, no side
/// effects, so every call site gets identical figures for identical inputs.
pub fn compute_status(
    loan: &Loan,
    payments: &[Payment],
    as_of: NaiveDate,
    today_payment: Money,
) -> Result<PaymentStatus> {
    loan.validate()?;
    if today_payment.is_negative() {
        return Err(LedgerError::InvalidPaymentAmount {
            loan_id: loan.id,
            amount: today_payment,
        });
    }

    let paid_before_today = sum_before(payments, as_of);
    let total_paid = paid_before_today + today_payment;

    match loan.unit {
        // a lump target has no schedule that can fail to have started, so it
        // always reports the raw remaining target; only the state label
        // reflects a future start date
        PeriodUnit::Fixed => {
            let mut status = fixed_status(loan, as_of, paid_before_today, today_payment)?;
            if loan.start_date > as_of {
                status.state = if total_paid.is_positive() {
                    AccountState::Advance
                } else {
                    AccountState::NotStarted
                };
                status.previous_remaining = Money::ZERO;
            }
            Ok(status)
        }
        PeriodUnit::Day | PeriodUnit::Month => {
            if loan.start_date > as_of {
                not_yet_started(loan, as_of, paid_before_today, today_payment, total_paid)
            } else {
                periodic_status(loan, payments, as_of, paid_before_today, today_payment)
            }
        }
    }
}

/// convenience for interactive surfaces: derive `as_of` from an injectable
/// clock instead of reading the system time ad hoc
pub fn compute_status_now(
    loan: &Loan,
    payments: &[Payment],
    today_payment: Money,
    time: &SafeTimeProvider,
) -> Result<PaymentStatus> {
    compute_status(loan, payments, time.now().date_naive(), today_payment)
}

fn sum_before(payments: &[Payment], cutoff: NaiveDate) -> Money {
    payments
        .iter()
        .filter(|p| p.date < cutoff)
        .map(|p| p.amount)
        .sum()
}

fn not_yet_started(
    loan: &Loan,
    as_of: NaiveDate,
    paid_before_today: Money,
    today_payment: Money,
    total_paid: Money,
) -> Result<PaymentStatus> {
    let state = if total_paid.is_positive() {
        AccountState::Advance
    } else {
        AccountState::NotStarted
    };

    // advance money banked before the schedule begins pre-pays whole periods
    // counted from the start date
    let paid_through = if total_paid.is_positive() {
        let prepaid = total_paid.whole_units_of(loan.installment);
        date_after_periods(loan.start_date, prepaid, loan.unit)?
    } else {
        as_of
    };
    let partial_credit =
        total_paid - loan.installment * total_paid.whole_units_of(loan.installment);

    Ok(PaymentStatus {
        as_of,
        state,
        total_due: Money::ZERO,
        paid_before_today,
        today_payment,
        total_paid,
        remaining: -total_paid,
        previous_remaining: Money::ZERO,
        partial_credit,
        paid_through,
        next_due: None,
    })
}

fn fixed_status(
    loan: &Loan,
    as_of: NaiveDate,
    paid_before_today: Money,
    today_payment: Money,
) -> Result<PaymentStatus> {
    let total_due = loan.fixed_target;
    let total_paid = paid_before_today + today_payment;
    // no next period exists to absorb an overpayment, so the figure clamps
    let remaining = (total_due - total_paid).max(Money::ZERO);
    let state = if remaining.is_positive() {
        AccountState::Arrears
    } else {
        AccountState::Settled
    };
    let previous_remaining = (total_due - paid_before_today).max(Money::ZERO);

    Ok(PaymentStatus {
        as_of,
        state,
        total_due,
        paid_before_today,
        today_payment,
        total_paid,
        remaining,
        previous_remaining,
        partial_credit: Money::ZERO,
        paid_through: as_of,
        next_due: None,
    })
}

fn periodic_status(
    loan: &Loan,
    payments: &[Payment],
    as_of: NaiveDate,
    paid_before_today: Money,
    today_payment: Money,
) -> Result<PaymentStatus> {
    let (total_due, total_paid, remaining) =
        periodic_balance(loan, payments, as_of, today_payment);

    let (state, paid_through, partial_credit) = if remaining.is_positive() {
        (AccountState::Arrears, as_of, Money::ZERO)
    } else if remaining.is_zero() {
        (AccountState::Settled, as_of, Money::ZERO)
    } else {
        let overpayment = -remaining;
        let whole_periods = overpayment.whole_units_of(loan.installment);
        let paid_through = date_after_periods(as_of, whole_periods, loan.unit)?;
        let partial = overpayment - loan.installment * whole_periods;
        (AccountState::Advance, paid_through, partial)
    };

    let next_due = match state {
        AccountState::Settled | AccountState::Advance => {
            Some(date_after_periods(paid_through, 1, loan.unit)?)
        }
        _ => None,
    };

    // the figure that was already overdue before today's activity: one
    // period back, with no uncommitted amount, clamped for display
    let prior_date = period_before(as_of, loan.unit)?;
    let previous_remaining = if prior_date < loan.start_date {
        Money::ZERO
    } else {
        let (_, _, prior_remaining) = periodic_balance(loan, payments, prior_date, Money::ZERO);
        prior_remaining.max(Money::ZERO)
    };

    Ok(PaymentStatus {
        as_of,
        state,
        total_due,
        paid_before_today,
        today_payment,
        total_paid,
        remaining,
        previous_remaining,
        partial_credit,
        paid_through,
        next_due,
    })
}

/// due / paid / remaining for a periodic loan at a given date. the one place
/// the "paid before today" window is defined: strictly `date < as_of`.
fn periodic_balance(
    loan: &Loan,
    payments: &[Payment],
    as_of: NaiveDate,
    today_payment: Money,
) -> (Money, Money, Money) {
    let periods = periods_elapsed(loan.start_date, as_of, loan.unit);
    let total_due = loan.installment * periods;
    let total_paid = sum_before(payments, as_of) + today_payment;
    (total_due, total_paid, total_due - total_paid)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn day_loan_100() -> Loan {
        Loan::daily(Money::from_major(100), date(2024, 1, 1)).unwrap()
    }

    fn pay(loan: &Loan, y: i32, m: u32, d: u32, amount: i64) -> Payment {
        Payment::new(loan.id, date(y, m, d), Money::from_major(amount))
    }

    #[test]
    fn test_day_loan_first_day_arrears() {
        let loan = day_loan_100();
        let status = compute_status(&loan, &[], date(2024, 1, 1), Money::ZERO).unwrap();

        assert_eq!(status.total_due, Money::from_major(100));
        assert_eq!(status.remaining, Money::from_major(100));
        assert_eq!(status.state, AccountState::Arrears);
        assert_eq!(status.next_due, None);
    }

    #[test]
    fn test_exact_settlement_carries_to_next_day() {
        let loan = day_loan_100();
        let status =
            compute_status(&loan, &[], date(2024, 1, 1), Money::from_major(100)).unwrap();

        assert_eq!(status.remaining, Money::ZERO);
        assert_eq!(status.state, AccountState::Settled);
        assert_eq!(status.paid_through, date(2024, 1, 1));
        assert_eq!(status.next_due, Some(date(2024, 1, 2)));
    }

    #[test]
    fn test_overpayment_rollover() {
        let loan = day_loan_100();
        let status =
            compute_status(&loan, &[], date(2024, 1, 1), Money::from_major(250)).unwrap();

        assert_eq!(status.remaining, -Money::from_major(150));
        assert_eq!(status.state, AccountState::Advance);
        assert_eq!(status.paid_through, date(2024, 1, 2));
        assert_eq!(status.partial_credit, Money::from_major(50));
        assert_eq!(status.next_due, Some(date(2024, 1, 3)));
    }

    #[test]
    fn test_saved_today_entry_is_excluded() {
        // a ledger row already exists for today; the caller's uncommitted
        // amount stands in for it while editing
        let loan = day_loan_100();
        let payments = vec![pay(&loan, 2024, 1, 1, 100), pay(&loan, 2024, 1, 2, 999)];
        let status =
            compute_status(&loan, &payments, date(2024, 1, 2), Money::from_major(70)).unwrap();

        assert_eq!(status.paid_before_today, Money::from_major(100));
        assert_eq!(status.today_payment, Money::from_major(70));
        assert_eq!(status.total_due, Money::from_major(200));
        assert_eq!(status.remaining, Money::from_major(30));
        assert_eq!(status.state, AccountState::Arrears);
    }

    #[test]
    fn test_arrears_accumulate_over_days() {
        let loan = day_loan_100();
        let payments = vec![pay(&loan, 2024, 1, 1, 100), pay(&loan, 2024, 1, 2, 50)];
        let status = compute_status(&loan, &payments, date(2024, 1, 4), Money::ZERO).unwrap();

        assert_eq!(status.total_due, Money::from_major(400));
        assert_eq!(status.total_paid, Money::from_major(150));
        assert_eq!(status.remaining, Money::from_major(250));
        // as of jan 3 with no uncommitted amount: due 300, paid 150
        assert_eq!(status.previous_remaining, Money::from_major(150));
    }

    #[test]
    fn test_previous_remaining_clamps_advance_to_zero() {
        let loan = day_loan_100();
        let payments = vec![pay(&loan, 2024, 1, 1, 500)];
        let status = compute_status(&loan, &payments, date(2024, 1, 3), Money::ZERO).unwrap();

        // due 300, paid 500: still in advance overall
        assert_eq!(status.remaining, -Money::from_major(200));
        // yesterday was also in advance; shown as zero, not negative arrears
        assert_eq!(status.previous_remaining, Money::ZERO);
    }

    #[test]
    fn test_monthly_boundary() {
        let loan = Loan::monthly(Money::from_major(1000), date(2024, 1, 15)).unwrap();

        let before = compute_status(&loan, &[], date(2024, 2, 14), Money::ZERO).unwrap();
        assert_eq!(before.total_due, Money::from_major(1000));

        let on = compute_status(&loan, &[], date(2024, 2, 15), Money::ZERO).unwrap();
        assert_eq!(on.total_due, Money::from_major(2000));
    }

    #[test]
    fn test_monthly_settlement_next_due_is_next_month() {
        let loan = Loan::monthly(Money::from_major(1000), date(2024, 1, 15)).unwrap();
        let payments = vec![pay(&loan, 2024, 1, 15, 1000)];
        let status =
            compute_status(&loan, &payments, date(2024, 2, 15), Money::from_major(1000)).unwrap();

        assert_eq!(status.state, AccountState::Settled);
        assert_eq!(status.next_due, Some(date(2024, 3, 15)));
    }

    #[test]
    fn test_fixed_loan_clamps_at_zero() {
        let loan = Loan::fixed(Money::from_major(1000), date(2024, 1, 1)).unwrap();
        let payments = vec![pay(&loan, 2024, 1, 5, 700), pay(&loan, 2024, 1, 9, 500)];
        let status = compute_status(&loan, &payments, date(2024, 2, 1), Money::ZERO).unwrap();

        assert_eq!(status.total_paid, Money::from_major(1200));
        assert_eq!(status.remaining, Money::ZERO); // not -200
        assert_eq!(status.state, AccountState::Settled);
        assert_eq!(status.paid_through, date(2024, 2, 1));
    }

    #[test]
    fn test_fixed_loan_in_arrears() {
        let loan = Loan::fixed(Money::from_major(1000), date(2024, 1, 1)).unwrap();
        let payments = vec![pay(&loan, 2024, 1, 5, 300)];
        let status =
            compute_status(&loan, &payments, date(2024, 2, 1), Money::from_major(100)).unwrap();

        assert_eq!(status.remaining, Money::from_major(600));
        assert_eq!(status.state, AccountState::Arrears);
        assert_eq!(status.previous_remaining, Money::from_major(700));
    }

    #[test]
    fn test_not_yet_started() {
        let loan = Loan::daily(Money::from_major(100), date(2024, 1, 10)).unwrap();
        let status = compute_status(&loan, &[], date(2024, 1, 8), Money::ZERO).unwrap();

        assert_eq!(status.state, AccountState::NotStarted);
        assert_eq!(status.total_due, Money::ZERO);
        assert_eq!(status.remaining, Money::ZERO);
        assert_eq!(status.previous_remaining, Money::ZERO);
    }

    #[test]
    fn test_not_yet_started_banks_advance_payments() {
        let loan = Loan::daily(Money::from_major(100), date(2024, 1, 10)).unwrap();
        let payments = vec![pay(&loan, 2024, 1, 5, 250)];
        let status = compute_status(&loan, &payments, date(2024, 1, 8), Money::ZERO).unwrap();

        assert_eq!(status.state, AccountState::Advance);
        assert_eq!(status.total_paid, Money::from_major(250));
        // 2 whole installments banked forward from the start date
        assert_eq!(status.paid_through, date(2024, 1, 12));
        assert_eq!(status.partial_credit, Money::from_major(50));
    }

    #[test]
    fn test_early_payment_before_start_counts_once_started() {
        let loan = Loan::daily(Money::from_major(100), date(2024, 1, 10)).unwrap();
        let payments = vec![pay(&loan, 2024, 1, 5, 250)];
        let status = compute_status(&loan, &payments, date(2024, 1, 10), Money::ZERO).unwrap();

        // due 100 on day one, 250 already in the ledger
        assert_eq!(status.remaining, -Money::from_major(150));
        assert_eq!(status.state, AccountState::Advance);
    }

    #[test]
    fn test_fixed_loan_reports_target_before_start() {
        let loan = Loan::fixed(Money::from_major(1000), date(2024, 2, 1)).unwrap();

        let untouched = compute_status(&loan, &[], date(2024, 1, 20), Money::ZERO).unwrap();
        assert_eq!(untouched.state, AccountState::NotStarted);
        assert_eq!(untouched.remaining, Money::from_major(1000));

        let payments = vec![pay(&loan, 2024, 1, 15, 400)];
        let part_paid = compute_status(&loan, &payments, date(2024, 1, 20), Money::ZERO).unwrap();
        assert_eq!(part_paid.state, AccountState::Advance);
        assert_eq!(part_paid.remaining, Money::from_major(600));
        assert_eq!(part_paid.previous_remaining, Money::ZERO);
    }

    #[test]
    fn test_zero_sum_invariant_periodic() {
        let loan = day_loan_100();
        let payments = vec![pay(&loan, 2024, 1, 1, 80), pay(&loan, 2024, 1, 3, 130)];

        for (day, today) in [(1u32, 0i64), (2, 50), (4, 0), (6, 420)] {
            let status = compute_status(
                &loan,
                &payments,
                date(2024, 1, day),
                Money::from_major(today),
            )
            .unwrap();
            assert_eq!(status.total_due - status.total_paid, status.remaining);
        }
    }

    #[test]
    fn test_monotonic_in_today_payment() {
        let loan = day_loan_100();
        let payments = vec![pay(&loan, 2024, 1, 2, 100)];
        let mut last_remaining = None;

        for today in [0i64, 50, 100, 200, 500] {
            let status = compute_status(
                &loan,
                &payments,
                date(2024, 1, 3),
                Money::from_major(today),
            )
            .unwrap();
            if let Some(prev) = last_remaining {
                assert!(status.remaining <= prev);
            }
            last_remaining = Some(status.remaining);
        }
    }

    #[test]
    fn test_determinism() {
        let loan = Loan::monthly(Money::from_major(500), date(2024, 3, 31)).unwrap();
        let payments = vec![pay(&loan, 2024, 4, 2, 500), pay(&loan, 2024, 4, 30, 200)];

        let a = compute_status(&loan, &payments, date(2024, 5, 31), Money::from_major(75)).unwrap();
        let b = compute_status(&loan, &payments, date(2024, 5, 31), Money::from_major(75)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_rejects_invalid_configuration() {
        let mut loan = day_loan_100();
        loan.installment = Money::ZERO;

        let err = compute_status(&loan, &[], date(2024, 1, 1), Money::ZERO);
        assert!(matches!(
            err,
            Err(LedgerError::InvalidInstallment { .. })
        ));
    }

    #[test]
    fn test_rejects_negative_today_payment() {
        let loan = day_loan_100();
        let err = compute_status(&loan, &[], date(2024, 1, 1), -Money::from_major(10));
        assert!(matches!(
            err,
            Err(LedgerError::InvalidPaymentAmount { .. })
        ));
    }

    #[test]
    fn test_status_json_round_trip() {
        let loan = day_loan_100();
        let status =
            compute_status(&loan, &[], date(2024, 1, 1), Money::from_major(250)).unwrap();

        let parsed: PaymentStatus = serde_json::from_str(&status.json()).unwrap();
        assert_eq!(parsed, status);
    }
}
