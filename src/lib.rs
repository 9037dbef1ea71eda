pub mod calendar;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod interest;
pub mod loan;
pub mod payments;
pub mod report;
pub mod schedule;
pub mod types;

// re-export key types
pub use config::ScheduleConfig;
pub use decimal::{Money, Rate};
pub use errors::{Result, ScheduleError};
pub use events::{Event, EventStore, RecalculationReason};
pub use interest::{AccrualEngine, AccrualSpan, InterestCalculation};
pub use loan::{LoanTerms, LoanTermsBuilder};
pub use payments::calculate_installment;
pub use report::{ScheduleSummary, ScheduleView};
pub use schedule::{generate_schedule, Schedule, ScheduleEngine};
pub use types::{ExtraRepayment, LoanId, RateChange, RowKind, ScheduleRow};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
