use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::types::LoanId;

/// why the standard installment was recomputed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecalculationReason {
    RateChange,
    ExtraRepayment,
}

/// all events recorded while generating a schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    ScheduleStarted {
        loan_id: Option<LoanId>,
        principal: Money,
        annual_rate: Rate,
        total_periods: u32,
        installment: Money,
    },

    InterestRateChanged {
        period: u32,
        date: NaiveDate,
        old_rate: Rate,
        new_rate: Rate,
    },
    InstallmentRecalculated {
        period: u32,
        old_installment: Money,
        new_installment: Money,
        periods_remaining: u32,
        reason: RecalculationReason,
    },

    ExtraRepaymentApplied {
        period: u32,
        date: NaiveDate,
        amount: Money,
        interest: Money,
        principal: Money,
        new_balance: Money,
    },
    /// a payment that did not cover its accrued interest
    NegativeAmortization {
        period: u32,
        date: NaiveDate,
        shortfall: Money,
    },
    InstallmentPaid {
        period: u32,
        date: NaiveDate,
        payment: Money,
        standard_month: bool,
    },

    LoanSettled {
        period: u32,
        date: NaiveDate,
        periods_unused: u32,
    },
    /// events that fell outside every period window
    EventsNotConsumed {
        rate_changes: usize,
        extra_repayments: usize,
    },
}

/// event store for collecting events during schedule generation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: Event) {
        log::trace!("{:?}", event);
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_store_take_and_clear() {
        let mut store = EventStore::new();
        assert!(store.is_empty());

        store.emit(Event::EventsNotConsumed {
            rate_changes: 1,
            extra_repayments: 0,
        });
        store.emit(Event::EventsNotConsumed {
            rate_changes: 0,
            extra_repayments: 2,
        });
        assert_eq!(store.len(), 2);

        let taken = store.take_events();
        assert_eq!(taken.len(), 2);
        assert!(store.is_empty());

        store.emit(Event::EventsNotConsumed {
            rate_changes: 3,
            extra_repayments: 3,
        });
        store.clear();
        assert!(store.events().is_empty());
    }
}
