use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calendar::normalize;
use crate::decimal::{Money, Rate};
use crate::errors::{Result, ScheduleError};

/// caller-assigned identifier for a loan
pub type LoanId = Uuid;

/// unscheduled payment that goes towards interest accrued so far, then principal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraRepayment {
    pub date: NaiveDate,
    pub amount: Money,
}

impl ExtraRepayment {
    pub fn new(date: NaiveDate, amount: Money) -> Self {
        Self { date, amount }
    }

    /// build from raw text fields; an unparseable date falls back to today
    pub fn from_fields(date: &str, amount: &str, clock: &SafeTimeProvider) -> Result<Self> {
        let amount = Money::from_str_exact(amount).map_err(|source| ScheduleError::InvalidAmount {
            input: amount.to_string(),
            source,
        })?;

        Ok(Self {
            date: normalize(date, clock),
            amount,
        })
    }
}

/// new nominal annual rate, effective from its date onwards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateChange {
    pub date: NaiveDate,
    pub annual_rate: Rate,
}

impl RateChange {
    pub fn new(date: NaiveDate, annual_rate: Rate) -> Self {
        Self { date, annual_rate }
    }

    /// build from raw text fields; an unparseable date falls back to today
    pub fn from_fields(date: &str, annual_rate: &str, clock: &SafeTimeProvider) -> Result<Self> {
        let annual_rate =
            Rate::from_str_exact(annual_rate).map_err(|source| ScheduleError::InvalidRate {
                input: annual_rate.to_string(),
                source,
            })?;

        Ok(Self {
            date: normalize(date, clock),
            annual_rate,
        })
    }
}

/// what produced a schedule row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RowKind {
    Scheduled,
    ExtraRepayment,
}

impl RowKind {
    pub fn label(&self) -> &'static str {
        match self {
            RowKind::Scheduled => "scheduled",
            RowKind::ExtraRepayment => "extra-repayment",
        }
    }
}

/// one line of the repayment schedule
///
/// Extra repayments share the period number of the installment they precede,
/// so a period may appear more than once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub period: u32,
    pub date: NaiveDate,
    pub payment: Money,
    pub principal: Money,
    pub interest: Money,
    /// balance after this row, never negative
    pub remaining_balance: Money,
    /// amount differs from the plain amortized installment
    pub is_adjusted: bool,
    pub kind: RowKind,
}

impl ScheduleRow {
    pub fn is_scheduled(&self) -> bool {
        self.kind == RowKind::Scheduled
    }

    pub fn is_extra_repayment(&self) -> bool {
        self.kind == RowKind::ExtraRepayment
    }
}
