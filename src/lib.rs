pub mod decimal;
pub mod errors;
pub mod events;
pub mod ledger;
pub mod period;
pub mod status;
pub mod summary;
pub mod types;

// re-export key types
pub use decimal::Money;
pub use errors::{LedgerError, Result};
pub use events::{Event, EventStore};
pub use ledger::{status_of, CollectionLedger, LedgerStore};
pub use period::{date_after_periods, period_before, periods_elapsed};
pub use status::{compute_status, compute_status_now, PaymentStatus};
pub use summary::StatusSummary;
pub use types::{AccountState, Loan, LoanId, Payment, PeriodUnit};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
