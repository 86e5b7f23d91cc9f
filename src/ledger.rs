use std::collections::BTreeMap;

use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;

use crate::decimal::Money;
use crate::errors::{LedgerError, Result};
use crate::events::{Event, EventStore};
use crate::status::{compute_status, PaymentStatus};
use crate::types::{Loan, LoanId, Payment};

/// the storage contract the collection core depends on.
///
/// any persistent backend must key payments by (loan, calendar date) with a
/// uniqueness constraint, and resolve concurrent writes to the same key as
/// replace-not-duplicate. dates are day-granular by type; backends storing
/// timestamps must normalize before comparing.
pub trait LedgerStore {
    fn loan(&self, id: LoanId) -> Option<&Loan>;
    fn put_loan(&mut self, loan: Loan);
    fn remove_loan(&mut self, id: LoanId) -> Option<Loan>;

    /// the saved amount for a (loan, date) pair, if any
    fn payment(&self, loan_id: LoanId, date: NaiveDate) -> Option<Money>;
    /// all of one loan's entries dated on or before `through`
    fn payments_through(&self, loan_id: LoanId, through: NaiveDate) -> Vec<Payment>;
    /// write an entry, returning the amount it replaced if one existed
    fn upsert_payment(&mut self, payment: Payment) -> Option<Money>;
    fn remove_payment(&mut self, loan_id: LoanId, date: NaiveDate) -> Option<Money>;
}

/// compute a loan's standing from whatever store holds its ledger.
///
/// fetches a fresh snapshot on every call; nothing is cached, so callers get
/// current figures even after an operator edits the loan's terms.
pub fn status_of<S: LedgerStore>(
    store: &S,
    loan_id: LoanId,
    as_of: NaiveDate,
    today_payment: Money,
) -> Result<PaymentStatus> {
    let loan = store
        .loan(loan_id)
        .ok_or(LedgerError::LoanNotFound { loan_id })?;
    let payments = store.payments_through(loan_id, as_of);
    compute_status(loan, &payments, as_of, today_payment)
}

/// in-memory reference store carrying the mutation rules every backend must
/// mirror: one entry per (loan, day), replace on re-submit, clear on zero.
///
/// mutations go through `&mut self`, so the per-(loan, date) write ordering
/// a shared backend needs from its uniqueness constraint is given here by
/// exclusive access.
#[derive(Debug, Default)]
pub struct CollectionLedger {
    loans: BTreeMap<LoanId, Loan>,
    payments: BTreeMap<(LoanId, NaiveDate), Money>,
    events: EventStore,
}

impl CollectionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// validate and add a loan
    pub fn register_loan(&mut self, loan: Loan) -> Result<LoanId> {
        loan.validate()?;
        let loan_id = loan.id;
        self.loans.insert(loan_id, loan);
        self.events.emit(Event::LoanRegistered { loan_id });
        Ok(loan_id)
    }

    /// record a collection for a calendar day.
    ///
    /// an existing entry for the day is replaced, never duplicated. a zero
    /// or negative amount clears the day's entry instead of persisting a
    /// no-op row; with no entry present it does nothing.
    pub fn record_payment(
        &mut self,
        loan_id: LoanId,
        date: NaiveDate,
        amount: Money,
    ) -> Result<()> {
        if !self.loans.contains_key(&loan_id) {
            return Err(LedgerError::LoanNotFound { loan_id });
        }

        if !amount.is_positive() {
            if let Some(old_amount) = self.remove_payment(loan_id, date) {
                self.events.emit(Event::PaymentCleared {
                    loan_id,
                    date,
                    old_amount,
                });
            }
            return Ok(());
        }

        match self.upsert_payment(Payment::new(loan_id, date, amount)) {
            Some(old_amount) => self.events.emit(Event::PaymentReplaced {
                loan_id,
                date,
                old_amount,
                new_amount: amount,
            }),
            None => self.events.emit(Event::PaymentRecorded {
                loan_id,
                date,
                amount,
            }),
        }
        Ok(())
    }

    /// reverse an entry; absent entries are a no-op, not an error
    pub fn delete_payment(&mut self, loan_id: LoanId, date: NaiveDate) {
        if let Some(amount) = self.remove_payment(loan_id, date) {
            self.events.emit(Event::PaymentDeleted {
                loan_id,
                date,
                amount,
            });
        }
    }

    /// remove a loan. cascading to its payments is the operator's explicit
    /// choice; without it the entries stay for later cleanup or audit.
    pub fn delete_loan(&mut self, loan_id: LoanId, cascade_payments: bool) -> Result<()> {
        self.remove_loan(loan_id)
            .ok_or(LedgerError::LoanNotFound { loan_id })?;

        let cascaded_payments = if cascade_payments {
            let keys: Vec<_> = self
                .payments
                .range((loan_id, NaiveDate::MIN)..=(loan_id, NaiveDate::MAX))
                .map(|(key, _)| *key)
                .collect();
            for key in &keys {
                self.payments.remove(key);
            }
            keys.len()
        } else {
            0
        };

        self.events.emit(Event::LoanDeleted {
            loan_id,
            cascaded_payments,
        });
        Ok(())
    }

    /// standing of a loan as of an explicit date, with an optional
    /// uncommitted amount for that date
    pub fn status(
        &self,
        loan_id: LoanId,
        as_of: NaiveDate,
        today_payment: Money,
    ) -> Result<PaymentStatus> {
        status_of(self, loan_id, as_of, today_payment)
    }

    /// standing as of the injected clock's today
    pub fn status_now(
        &self,
        loan_id: LoanId,
        today_payment: Money,
        time: &SafeTimeProvider,
    ) -> Result<PaymentStatus> {
        self.status(loan_id, time.now().date_naive(), today_payment)
    }

    /// drain events accumulated by mutations since the last call
    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take_events()
    }

    pub fn events(&self) -> &[Event] {
        self.events.events()
    }

    pub fn loan_count(&self) -> usize {
        self.loans.len()
    }

    pub fn payment_count(&self, loan_id: LoanId) -> usize {
        self.payments
            .range((loan_id, NaiveDate::MIN)..=(loan_id, NaiveDate::MAX))
            .count()
    }
}

impl LedgerStore for CollectionLedger {
    fn loan(&self, id: LoanId) -> Option<&Loan> {
        self.loans.get(&id)
    }

    fn put_loan(&mut self, loan: Loan) {
        self.loans.insert(loan.id, loan);
    }

    fn remove_loan(&mut self, id: LoanId) -> Option<Loan> {
        self.loans.remove(&id)
    }

    fn payment(&self, loan_id: LoanId, date: NaiveDate) -> Option<Money> {
        self.payments.get(&(loan_id, date)).copied()
    }

    fn payments_through(&self, loan_id: LoanId, through: NaiveDate) -> Vec<Payment> {
        self.payments
            .range((loan_id, NaiveDate::MIN)..=(loan_id, through))
            .map(|(&(_, date), &amount)| Payment::new(loan_id, date, amount))
            .collect()
    }

    fn upsert_payment(&mut self, payment: Payment) -> Option<Money> {
        self.payments
            .insert((payment.loan_id, payment.date), payment.amount)
    }

    fn remove_payment(&mut self, loan_id: LoanId, date: NaiveDate) -> Option<Money> {
        self.payments.remove(&(loan_id, date))
    }
}
