use chrono::NaiveDate;

use crate::decimal::{Money, Rate};
use crate::loan::LoanTerms;
use crate::payments::calculate_installment;

/// mutable walk state, owned by a single schedule generation
#[derive(Debug, Clone, PartialEq)]
pub struct EngineState {
    /// outstanding principal, may dip below zero before being clamped
    pub balance: Money,
    pub annual_rate: Rate,
    pub installment: Money,
    /// date of the last cash movement, interest accrues from here
    pub last_transaction: NaiveDate,
    pub months_per_year: u32,
}

impl EngineState {
    /// state on the disbursement date, installment sized over the full term
    pub fn open(terms: &LoanTerms, months_per_year: u32) -> Self {
        let mut state = Self {
            balance: terms.principal.round_cents(),
            annual_rate: terms.annual_rate,
            installment: Money::ZERO,
            last_transaction: terms.disbursement_date,
            months_per_year,
        };
        state.installment =
            calculate_installment(state.balance, state.periodic_rate(), terms.total_periods);
        state
    }

    pub fn periodic_rate(&self) -> Rate {
        self.annual_rate.per_period(self.months_per_year)
    }

    /// resize the installment against the current balance and rate,
    /// returning the previous amount
    pub fn recalculate_installment(&mut self, periods_remaining: u32) -> Money {
        let new_installment =
            calculate_installment(self.balance, self.periodic_rate(), periods_remaining);
        std::mem::replace(&mut self.installment, new_installment)
    }

    pub fn is_settled(&self, epsilon: Money) -> bool {
        self.balance <= epsilon
    }

    /// zero out a balance that has fallen to or below `epsilon`
    pub fn settle_if_repaid(&mut self, epsilon: Money) -> bool {
        if self.is_settled(epsilon) {
            self.balance = Money::ZERO;
            true
        } else {
            false
        }
    }

    /// balance as shown on a schedule row
    pub fn reported_balance(&self, epsilon: Money) -> Money {
        if self.is_settled(epsilon) {
            Money::ZERO
        } else {
            self.balance
        }
    }
}
