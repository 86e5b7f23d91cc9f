use thiserror::Error;

use crate::decimal::Money;
use crate::types::LoanId;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("loan {loan_id}: installment must be positive, got {amount}")]
    InvalidInstallment { loan_id: LoanId, amount: Money },

    #[error("loan {loan_id}: fixed target must not be negative, got {amount}")]
    InvalidFixedTarget { loan_id: LoanId, amount: Money },

    #[error("loan {loan_id}: payment amount must not be negative, got {amount}")]
    InvalidPaymentAmount { loan_id: LoanId, amount: Money },

    #[error("loan not found: {loan_id}")]
    LoanNotFound { loan_id: LoanId },

    #[error("invalid date: {message}")]
    InvalidDate { message: String },
}

pub type Result<T> = std::result::Result<T, LedgerError>;
