use chrono::{Datelike, Days, Months, NaiveDate};

use crate::errors::{LedgerError, Result};
use crate::types::PeriodUnit;

/// number of installment periods elapsed from `start` through `as_of`, inclusive.
///
/// day counting is inclusive of both ends: a loan starting today already has
/// its first installment due. month counting adds the current partial month
/// once the anchor day-of-month has been reached, with the anchor clamped to
/// the last day of shorter months (a loan anchored on the 31st falls due on
/// feb 28/29). returns 0 when `as_of` precedes `start`; Fixed loans have no
/// periods and always report 0.
pub fn periods_elapsed(start: NaiveDate, as_of: NaiveDate, unit: PeriodUnit) -> u32 {
    if as_of < start {
        return 0;
    }
    match unit {
        PeriodUnit::Day => (as_of - start).num_days() as u32 + 1,
        PeriodUnit::Month => {
            let whole = (as_of.year() - start.year()) * 12 + as_of.month() as i32
                - start.month() as i32;
            let anchor_day = start.day().min(days_in_month(as_of.year(), as_of.month()));
            let elapsed = if as_of.day() >= anchor_day {
                whole + 1
            } else {
                whole
            };
            elapsed.max(0) as u32
        }
        PeriodUnit::Fixed => 0,
    }
}

/// the calendar date `count` periods after `anchor`.
///
/// month stepping keeps the anchor's day-of-month, clamped to the shorter
/// month's last day. Fixed loans have no period structure, so the anchor is
/// returned unchanged.
pub fn date_after_periods(anchor: NaiveDate, count: u32, unit: PeriodUnit) -> Result<NaiveDate> {
    let stepped = match unit {
        PeriodUnit::Day => anchor.checked_add_days(Days::new(count as u64)),
        PeriodUnit::Month => anchor.checked_add_months(Months::new(count)),
        PeriodUnit::Fixed => Some(anchor),
    };
    stepped.ok_or_else(|| LedgerError::InvalidDate {
        message: format!("{anchor} + {count} periods overflows the calendar"),
    })
}

/// the calendar date one period before `anchor`, used for the
/// previous-period outstanding figure
pub fn period_before(anchor: NaiveDate, unit: PeriodUnit) -> Result<NaiveDate> {
    let stepped = match unit {
        PeriodUnit::Day => anchor.pred_opt(),
        PeriodUnit::Month => anchor.checked_sub_months(Months::new(1)),
        PeriodUnit::Fixed => Some(anchor),
    };
    stepped.ok_or_else(|| LedgerError::InvalidDate {
        message: format!("{anchor} - 1 period underflows the calendar"),
    })
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let first = NaiveDate::from_ymd_opt(year, month, 1);
    let next = first.and_then(|d| d.checked_add_months(Months::new(1)));
    match (first, next) {
        (Some(first), Some(next)) => (next - first).num_days() as u32,
        _ => 31,
    }
}
