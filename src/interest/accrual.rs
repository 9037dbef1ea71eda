use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::calendar::{add_months_rollover, days_between};
use crate::config::ScheduleConfig;
use crate::decimal::{Money, Rate};
use crate::interest::InterestCalculation;

/// split of an accrual period into whole months and leftover days
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccrualSpan {
    pub full_months: u32,
    pub extra_days: u32,
}

/// engine for accruing interest with whole months at the monthly rate and
/// the remainder at a daily rate
#[derive(Debug, Clone, Copy)]
pub struct AccrualEngine {
    pub months_per_year: u32,
    pub day_basis: u32,
}

impl AccrualEngine {
    pub fn new(months_per_year: u32, day_basis: u32) -> Self {
        Self {
            months_per_year,
            day_basis,
        }
    }

    /// monthly rate with a 360-day year for the remainder
    pub fn standard() -> Self {
        Self::new(12, 360)
    }

    pub fn from_config(config: &ScheduleConfig) -> Self {
        Self::new(config.months_per_year, config.accrual_day_basis)
    }

    /// count whole months from `start` that fit before `end`, then the days left
    ///
    /// Months are stepped with the rollover rule, so a month-end start can
    /// land past `end` and leave the whole period as extra days.
    pub fn accrual_span(&self, start: NaiveDate, end: NaiveDate) -> AccrualSpan {
        if start >= end {
            return AccrualSpan {
                full_months: 0,
                extra_days: 0,
            };
        }

        let mut full_months = 0;
        while let Some(next) = add_months_rollover(start, full_months + 1) {
            if next > end {
                break;
            }
            full_months += 1;
        }

        let month_end = add_months_rollover(start, full_months).unwrap_or(start);

        AccrualSpan {
            full_months,
            extra_days: days_between(month_end, end),
        }
    }

    /// raw interest on `balance` from `start` to `end`, unrounded
    pub fn accrue(
        &self,
        balance: Money,
        annual_rate: Rate,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Decimal {
        self.calculate(balance, annual_rate, start, end).interest_amount
    }

    /// interest for one standard month, unrounded
    pub fn standard_month(&self, balance: Money, annual_rate: Rate) -> Decimal {
        balance.as_decimal() * annual_rate.per_period(self.months_per_year).as_decimal()
    }

    /// accrue with the full breakdown of how the amount was reached
    pub fn calculate(
        &self,
        balance: Money,
        annual_rate: Rate,
        start: NaiveDate,
        end: NaiveDate,
    ) -> InterestCalculation {
        let span = self.accrual_span(start, end);

        let monthly_rate = annual_rate.per_period(self.months_per_year).as_decimal();
        let daily_rate = annual_rate.per_period(self.day_basis).as_decimal();

        let interest = if span.full_months == 0 && span.extra_days == 0 {
            Decimal::ZERO
        } else {
            balance.as_decimal()
                * (Decimal::from(span.full_months) * monthly_rate
                    + Decimal::from(span.extra_days) * daily_rate)
        };

        InterestCalculation {
            interest_amount: interest,
            full_months: span.full_months,
            extra_days: span.extra_days,
            principal_base: balance,
            annual_rate,
        }
    }
}

impl Default for AccrualEngine {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::round_half_away;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn rounded(value: Decimal) -> Decimal {
        round_half_away(value, 2)
    }

    #[test]
    fn test_empty_or_reversed_period() {
        let engine = AccrualEngine::standard();
        let balance = Money::from_major(10_000);
        let rate = Rate::from_percentage(5);

        assert_eq!(engine.accrue(balance, rate, d(2024, 3, 1), d(2024, 3, 1)), Decimal::ZERO);
        assert_eq!(engine.accrue(balance, rate, d(2024, 3, 2), d(2024, 3, 1)), Decimal::ZERO);
    }

    #[test]
    fn test_whole_month_uses_monthly_rate() {
        let engine = AccrualEngine::standard();
        let balance = Money::from_major(120_000);
        let rate = Rate::from_percentage(5);

        // 31 and 29 day months accrue the same amount
        let january = engine.accrue(balance, rate, d(2024, 1, 1), d(2024, 2, 1));
        let february = engine.accrue(balance, rate, d(2024, 2, 1), d(2024, 3, 1));
        assert_eq!(rounded(january), dec!(500.00));
        assert_eq!(rounded(february), dec!(500.00));
    }

    #[test]
    fn test_months_plus_days() {
        let engine = AccrualEngine::standard();
        let balance = Money::from_major(120_000);
        let rate = Rate::from_percentage(5);

        let calc = engine.calculate(balance, rate, d(2024, 1, 1), d(2024, 2, 16));
        assert_eq!(calc.full_months, 1);
        assert_eq!(calc.extra_days, 15);
        assert_eq!(rounded(calc.interest_amount), dec!(750.00));

        let calc = engine.calculate(balance, rate, d(2024, 1, 10), d(2024, 1, 20));
        assert_eq!(calc.full_months, 0);
        assert_eq!(calc.extra_days, 10);
        assert_eq!(rounded(calc.interest_amount), dec!(166.67));
    }

    #[test]
    fn test_month_end_start_rolls_past_short_month() {
        let engine = AccrualEngine::standard();

        // jan 31 + 1 month rolls to mar 3, so feb 28 is all extra days
        let span = engine.accrual_span(d(2023, 1, 31), d(2023, 2, 28));
        assert_eq!(span, AccrualSpan { full_months: 0, extra_days: 28 });

        let span = engine.accrual_span(d(2023, 1, 31), d(2023, 3, 3));
        assert_eq!(span, AccrualSpan { full_months: 1, extra_days: 0 });

        // leap year rolls one day earlier
        let span = engine.accrual_span(d(2024, 1, 31), d(2024, 3, 2));
        assert_eq!(span, AccrualSpan { full_months: 1, extra_days: 0 });

        // mar 31 + 1 month rolls to may 1
        let span = engine.accrual_span(d(2023, 3, 31), d(2023, 4, 30));
        assert_eq!(span, AccrualSpan { full_months: 0, extra_days: 30 });
    }

    #[test]
    fn test_multi_month_span() {
        let engine = AccrualEngine::standard();
        let span = engine.accrual_span(d(2024, 1, 15), d(2024, 7, 20));
        assert_eq!(span, AccrualSpan { full_months: 6, extra_days: 5 });
    }

    #[test]
    fn test_zero_rate_accrues_nothing() {
        let engine = AccrualEngine::standard();
        let balance = Money::from_major(50_000);
        let interest = engine.accrue(balance, Rate::ZERO, d(2024, 1, 1), d(2024, 6, 9));
        assert_eq!(interest, Decimal::ZERO);
    }

    #[test]
    fn test_standard_month() {
        let engine = AccrualEngine::standard();
        let interest = engine.standard_month(Money::from_major(100_000), Rate::from_percentage(12));
        assert_eq!(interest, dec!(1000));
    }
}
