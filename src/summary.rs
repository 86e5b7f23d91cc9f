use serde::{Deserialize, Serialize};

use crate::status::PaymentStatus;
use crate::types::AccountState;

/// display strings shared by the payment widget, the print preview, and the
/// collection book.
///
/// a thin formatter over an already-computed status; it never touches dates
/// or sums itself, so the three surfaces cannot drift apart again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSummary {
    pub state_label: String,
    pub due_line: String,
    pub paid_line: String,
    pub balance_line: String,
    /// shown only when the account is ahead of or level with its schedule
    pub paid_through_line: Option<String>,
    /// shown only when advance credit partially covers the next period
    pub partial_credit_line: Option<String>,
    /// what was already overdue before today's activity
    pub carried_over_line: Option<String>,
}

impl StatusSummary {
    pub fn from_status(status: &PaymentStatus) -> Self {
        Self::with_symbol(status, "₹")
    }

    pub fn with_symbol(status: &PaymentStatus, symbol: &str) -> Self {
        let state_label = match status.state {
            AccountState::NotStarted => "Not started".to_string(),
            AccountState::Arrears => "In arrears".to_string(),
            AccountState::Settled => "Settled".to_string(),
            AccountState::Advance => "Paid in advance".to_string(),
        };

        let balance_line = if status.remaining.is_negative() {
            format!("{}{} in advance", symbol, -status.remaining)
        } else if status.remaining.is_positive() {
            match status.state {
                AccountState::Arrears => format!("{}{} overdue", symbol, status.remaining),
                // a positive balance that is not yet due, e.g. a pending
                // loan's target before its start date
                _ => format!("{}{} outstanding", symbol, status.remaining),
            }
        } else {
            format!("{}0 outstanding", symbol)
        };

        let paid_through_line = match status.state {
            AccountState::Settled | AccountState::Advance => Some(format!(
                "Paid through {}",
                status.paid_through.format("%d-%m-%Y")
            )),
            _ => None,
        };

        let partial_credit_line = if status.partial_credit.is_positive() {
            status.next_due.map(|next| {
                format!(
                    "{}{} already applied toward {}",
                    symbol,
                    status.partial_credit,
                    next.format("%d-%m-%Y")
                )
            })
        } else {
            None
        };

        let carried_over_line = if status.previous_remaining.is_positive() {
            Some(format!(
                "{}{} carried over from before today",
                symbol, status.previous_remaining
            ))
        } else {
            None
        };

        Self {
            state_label,
            due_line: format!("{}{} due", symbol, status.total_due),
            paid_line: format!("{}{} paid", symbol, status.total_paid),
            balance_line,
            paid_through_line,
            partial_credit_line,
            carried_over_line,
        }
    }

    /// serialize for surfaces that render outside this process
    pub fn json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}
