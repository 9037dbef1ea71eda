pub mod engine;
pub mod state;
pub mod timeline;

use chrono::NaiveDate;

use crate::decimal::Money;
use crate::events::{Event, EventStore};
use crate::loan::LoanTerms;
use crate::types::{ExtraRepayment, LoanId, RateChange, RowKind, ScheduleRow};

pub use engine::ScheduleEngine;
pub use state::EngineState;
pub use timeline::{EventKind, Timeline, TimelineEvent};

/// generated repayment schedule with the events recorded along the way
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    pub loan_id: Option<LoanId>,
    /// installment sized at disbursement, before any event
    pub initial_installment: Money,
    pub rows: Vec<ScheduleRow>,
    pub events: EventStore,
}

impl Schedule {
    pub fn new(
        loan_id: Option<LoanId>,
        initial_installment: Money,
        rows: Vec<ScheduleRow>,
        events: EventStore,
    ) -> Self {
        Self {
            loan_id,
            initial_installment,
            rows,
            events,
        }
    }

    pub fn rows(&self) -> &[ScheduleRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows_of_kind(&self, kind: RowKind) -> impl Iterator<Item = &ScheduleRow> {
        self.rows.iter().filter(move |row| row.kind == kind)
    }

    /// scheduled row for `period`, if the loan lived that long
    pub fn installment(&self, period: u32) -> Option<&ScheduleRow> {
        self.rows
            .iter()
            .find(|row| row.is_scheduled() && row.period == period)
    }

    pub fn total_payment(&self) -> Money {
        self.rows.iter().map(|row| row.payment).sum()
    }

    pub fn total_principal(&self) -> Money {
        self.rows.iter().map(|row| row.principal).sum()
    }

    pub fn total_interest(&self) -> Money {
        self.rows.iter().map(|row| row.interest).sum()
    }

    pub fn final_balance(&self) -> Option<Money> {
        self.rows.last().map(|row| row.remaining_balance)
    }

    /// date the balance reached zero
    pub fn payoff_date(&self) -> Option<NaiveDate> {
        self.rows
            .last()
            .filter(|row| row.remaining_balance.is_zero())
            .map(|row| row.date)
    }

    pub fn events(&self) -> &[Event] {
        self.events.events()
    }
}

/// generate a schedule with the standard configuration
pub fn generate_schedule(
    terms: &LoanTerms,
    extra_repayments: &[ExtraRepayment],
    rate_changes: &[RateChange],
) -> Schedule {
    ScheduleEngine::standard().generate(terms, extra_repayments, rate_changes)
}
