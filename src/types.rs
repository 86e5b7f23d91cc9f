use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;
use crate::errors::{LedgerError, Result};

/// unique identifier for a loan
pub type LoanId = Uuid;

/// how a loan's schedule is structured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeriodUnit {
    /// one installment due every calendar day
    Day,
    /// one installment due every calendar month, anchored to the start day
    Month,
    /// a single lump target amount with no periodic schedule ("pending" loans)
    Fixed,
}

/// where an account stands relative to its schedule as of a given date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountState {
    /// start date is in the future and nothing has been paid
    NotStarted,
    /// payments have fallen short of the schedule
    Arrears,
    /// payments exactly cover the schedule
    Settled,
    /// payments exceed the schedule, pre-paying future periods
    Advance,
}

/// a loan as recorded by data entry
///
/// exactly one of `installment` (Day/Month) or `fixed_target` (Fixed) is
/// meaningful, governed by `unit`; the other stays at zero. operators may
/// edit the amounts and start date after creation, so status calculations
/// always take the loan by reference rather than caching its fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub id: LoanId,
    pub unit: PeriodUnit,
    pub installment: Money,
    pub fixed_target: Money,
    pub start_date: NaiveDate,
}

impl Loan {
    /// create a daily-installment loan
    pub fn daily(installment: Money, start_date: NaiveDate) -> Result<Self> {
        Self::periodic(PeriodUnit::Day, installment, start_date)
    }

    /// create a monthly-installment loan
    pub fn monthly(installment: Money, start_date: NaiveDate) -> Result<Self> {
        Self::periodic(PeriodUnit::Month, installment, start_date)
    }

    fn periodic(unit: PeriodUnit, installment: Money, start_date: NaiveDate) -> Result<Self> {
        let loan = Loan {
            id: Uuid::new_v4(),
            unit,
            installment,
            fixed_target: Money::ZERO,
            start_date,
        };
        loan.validate()?;
        Ok(loan)
    }

    /// create a lump-target loan with no periodic schedule
    pub fn fixed(target: Money, start_date: NaiveDate) -> Result<Self> {
        let loan = Loan {
            id: Uuid::new_v4(),
            unit: PeriodUnit::Fixed,
            installment: Money::ZERO,
            fixed_target: target,
            start_date,
        };
        loan.validate()?;
        Ok(loan)
    }

    /// check configuration invariants; callers must not feed an invalid
    /// loan into the status calculator, and the calculator re-checks anyway
    pub fn validate(&self) -> Result<()> {
        match self.unit {
            PeriodUnit::Day | PeriodUnit::Month => {
                if !self.installment.is_positive() {
                    return Err(LedgerError::InvalidInstallment {
                        loan_id: self.id,
                        amount: self.installment,
                    });
                }
            }
            PeriodUnit::Fixed => {
                if self.fixed_target.is_negative() {
                    return Err(LedgerError::InvalidFixedTarget {
                        loan_id: self.id,
                        amount: self.fixed_target,
                    });
                }
            }
        }
        Ok(())
    }

    /// true for Day/Month loans
    pub fn is_periodic(&self) -> bool {
        !matches!(self.unit, PeriodUnit::Fixed)
    }
}

/// one ledger entry: the amount collected for a loan on a calendar day
///
/// the ledger is a sparse map from date to amount, at most one entry per
/// (loan, date); re-recording a day replaces the amount rather than adding
/// a second row
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub loan_id: LoanId,
    pub date: NaiveDate,
    pub amount: Money,
}

impl Payment {
    pub fn new(loan_id: LoanId, date: NaiveDate, amount: Money) -> Self {
        Self {
            loan_id,
            date,
            amount,
        }
    }
}
