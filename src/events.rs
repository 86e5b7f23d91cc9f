use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::LoanId;

/// ledger mutations worth surfacing to an audit trail or sync layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// a new entry was written for a (loan, date) pair
    PaymentRecorded {
        loan_id: LoanId,
        date: NaiveDate,
        amount: Money,
    },
    /// an existing entry's amount was replaced; re-submitting a day never
    /// creates a second row
    PaymentReplaced {
        loan_id: LoanId,
        date: NaiveDate,
        old_amount: Money,
        new_amount: Money,
    },
    /// a zero or negative re-submission cleared the day's entry
    PaymentCleared {
        loan_id: LoanId,
        date: NaiveDate,
        old_amount: Money,
    },
    /// an operator reversed an entry
    PaymentDeleted {
        loan_id: LoanId,
        date: NaiveDate,
        amount: Money,
    },
    LoanRegistered {
        loan_id: LoanId,
    },
    LoanDeleted {
        loan_id: LoanId,
        cascaded_payments: usize,
    },
}

/// event store for collecting events during ledger operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
