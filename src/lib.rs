pub mod config;
pub mod errors;
pub mod loan;
pub mod payments;
pub mod portfolio;
pub mod types;
pub mod views;

// re-export key types
pub use config::{LoanBuilder, LoanConfig, LumpSumConfig};
pub use errors::{AmortizationError, Result};
pub use loan::{AmortizationSchedule, Loan, ScheduledPayment};
pub use payments::{
    balance_at_period, growth_factor, minimum_repayment, periods_to_zero, round_periods,
    LumpSum, LumpSumCollection,
};
pub use portfolio::LoanCollection;
pub use types::{DatePoint, LumpSumId, Period, Point};
pub use views::{Chart, LoanSummary};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use uuid::Uuid;
