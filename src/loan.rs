use chrono::{Datelike, NaiveDate};
use hourglass_rs::{SafeTimeProvider, TimeSource};
use serde::{Deserialize, Serialize};

use crate::calendar::add_months_clamped;
use crate::decimal::{Money, Rate};
use crate::errors::{Result, ScheduleError};
use crate::types::LoanId;

/// immutable terms of a single loan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub loan_id: Option<LoanId>,
    pub principal: Money,
    /// nominal annual rate as a fraction, 0.05 for 5%
    pub annual_rate: Rate,
    pub disbursement_date: NaiveDate,
    pub first_installment_date: NaiveDate,
    /// when set, the final installment falls on this date
    pub maturity_date: Option<NaiveDate>,
    pub total_periods: u32,
}

impl LoanTerms {
    pub fn new(
        principal: Money,
        annual_rate: Rate,
        disbursement_date: NaiveDate,
        first_installment_date: NaiveDate,
        maturity_date: Option<NaiveDate>,
        total_periods: u32,
    ) -> Self {
        Self {
            loan_id: None,
            principal,
            annual_rate,
            disbursement_date,
            first_installment_date,
            maturity_date,
            total_periods,
        }
    }

    pub fn builder() -> LoanTermsBuilder {
        LoanTermsBuilder::new()
    }

    /// day of month every installment is anchored to
    pub fn anchor_day(&self) -> u32 {
        self.first_installment_date.day()
    }

    pub fn is_final_period(&self, period: u32) -> bool {
        period == self.total_periods
    }

    /// due date of installment `period` (1-based)
    ///
    /// Periods step from the first installment keeping the anchor day,
    /// clamped to the end of shorter months. The final period falls on the
    /// maturity date when one is given.
    pub fn scheduled_date(&self, period: u32) -> NaiveDate {
        if self.is_final_period(period) {
            if let Some(maturity) = self.maturity_date {
                return maturity;
            }
        }

        add_months_clamped(self.first_installment_date, period.saturating_sub(1))
            .unwrap_or(NaiveDate::MAX)
    }

    pub fn last_scheduled_date(&self) -> Option<NaiveDate> {
        if self.total_periods == 0 {
            None
        } else {
            Some(self.scheduled_date(self.total_periods))
        }
    }
}

/// builder for loan terms with validation of the required fields
#[derive(Debug, Default)]
pub struct LoanTermsBuilder {
    loan_id: Option<LoanId>,
    amount: Option<Money>,
    rate: Option<Rate>,
    periods: Option<u32>,
    disbursement_date: Option<NaiveDate>,
    first_installment_date: Option<NaiveDate>,
    maturity_date: Option<NaiveDate>,
}

impl LoanTermsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn loan_id(mut self, loan_id: LoanId) -> Self {
        self.loan_id = Some(loan_id);
        self
    }

    pub fn amount(mut self, amount: Money) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn rate(mut self, rate: Rate) -> Self {
        self.rate = Some(rate);
        self
    }

    pub fn periods(mut self, periods: u32) -> Self {
        self.periods = Some(periods);
        self
    }

    pub fn disbursement_date(mut self, date: NaiveDate) -> Self {
        self.disbursement_date = Some(date);
        self
    }

    pub fn first_installment_date(mut self, date: NaiveDate) -> Self {
        self.first_installment_date = Some(date);
        self
    }

    pub fn maturity_date(mut self, date: NaiveDate) -> Self {
        self.maturity_date = Some(date);
        self
    }

    /// Build with system time for any missing dates
    pub fn build(self) -> Result<LoanTerms> {
        let time = SafeTimeProvider::new(TimeSource::System);
        self.build_with_time(&time)
    }

    /// Build with an explicit time provider for any missing dates
    pub fn build_with_time(self, time_provider: &SafeTimeProvider) -> Result<LoanTerms> {
        let principal = self.amount.ok_or(ScheduleError::MissingTerm { field: "amount" })?;
        let annual_rate = self.rate.ok_or(ScheduleError::MissingTerm { field: "rate" })?;
        let total_periods = self.periods.ok_or(ScheduleError::MissingTerm { field: "periods" })?;

        if !principal.is_positive() {
            return Err(ScheduleError::InvalidPrincipal { amount: principal });
        }

        if annual_rate < Rate::ZERO {
            return Err(ScheduleError::RateOutOfRange { rate: annual_rate });
        }

        if total_periods == 0 {
            return Err(ScheduleError::InvalidConfiguration {
                message: "loan needs at least one period".to_string(),
            });
        }

        let disbursement_date = self
            .disbursement_date
            .unwrap_or_else(|| time_provider.now().date_naive());

        let first_installment_date = match self.first_installment_date {
            Some(date) => date,
            None => add_months_clamped(disbursement_date, 1).ok_or_else(|| {
                ScheduleError::InvalidDate {
                    input: disbursement_date.to_string(),
                }
            })?,
        };

        if first_installment_date < disbursement_date {
            return Err(ScheduleError::InvalidDate {
                input: format!(
                    "first installment {} precedes disbursement {}",
                    first_installment_date, disbursement_date
                ),
            });
        }

        Ok(LoanTerms {
            loan_id: self.loan_id,
            principal,
            annual_rate,
            disbursement_date,
            first_installment_date,
            maturity_date: self.maturity_date,
            total_periods,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn month_end_loan(maturity: Option<NaiveDate>) -> LoanTerms {
        LoanTerms::new(
            Money::from_major(10_000),
            Rate::from_percentage(6),
            d(2023, 12, 31),
            d(2024, 1, 31),
            maturity,
            6,
        )
    }

    #[test]
    fn test_scheduled_dates_clamp_to_month_end() {
        let terms = month_end_loan(None);
        let dates: Vec<NaiveDate> = (1..=6).map(|i| terms.scheduled_date(i)).collect();

        assert_eq!(
            dates,
            vec![
                d(2024, 1, 31),
                d(2024, 2, 29),
                d(2024, 3, 31),
                d(2024, 4, 30),
                d(2024, 5, 31),
                d(2024, 6, 30),
            ]
        );
        assert_eq!(terms.anchor_day(), 31);
    }

    #[test]
    fn test_maturity_overrides_final_period_only() {
        let terms = month_end_loan(Some(d(2024, 7, 5)));
        assert_eq!(terms.scheduled_date(5), d(2024, 5, 31));
        assert_eq!(terms.scheduled_date(6), d(2024, 7, 5));
        assert_eq!(terms.last_scheduled_date(), Some(d(2024, 7, 5)));
    }

    #[test]
    fn test_builder_requires_terms() {
        let result = LoanTerms::builder().rate(Rate::from_percentage(5)).periods(12).build();
        assert!(matches!(result, Err(ScheduleError::MissingTerm { field: "amount" })));

        let result = LoanTerms::builder()
            .amount(Money::ZERO)
            .rate(Rate::from_percentage(5))
            .periods(12)
            .build();
        assert!(matches!(result, Err(ScheduleError::InvalidPrincipal { .. })));

        let result = LoanTerms::builder()
            .amount(Money::from_major(1_000))
            .rate(Rate::from_percentage(5))
            .periods(0)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_defaults_dates_from_clock() {
        let time = SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2024, 1, 31, 8, 0, 0).unwrap()
        ));

        let terms = LoanTerms::builder()
            .amount(Money::from_major(5_000))
            .rate(Rate::from_percentage(7))
            .periods(24)
            .build_with_time(&time)
            .unwrap();

        assert_eq!(terms.disbursement_date, d(2024, 1, 31));
        assert_eq!(terms.first_installment_date, d(2024, 2, 29));
        assert_eq!(terms.maturity_date, None);
        assert_eq!(terms.loan_id, None);
    }

    #[test]
    fn test_builder_rejects_installment_before_disbursement() {
        let result = LoanTerms::builder()
            .amount(Money::from_major(5_000))
            .rate(Rate::from_percentage(7))
            .periods(24)
            .disbursement_date(d(2024, 3, 1))
            .first_installment_date(d(2024, 2, 1))
            .build();
        assert!(matches!(result, Err(ScheduleError::InvalidDate { .. })));
    }
}
