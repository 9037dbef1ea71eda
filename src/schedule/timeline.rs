use chrono::NaiveDate;

use crate::types::{ExtraRepayment, RateChange};

/// processing order for events sharing a date
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventKind {
    RateChange,
    ExtraRepayment,
    Scheduled,
}

/// one entry of a period's ordered event list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineEvent {
    RateChange(RateChange),
    ExtraRepayment(ExtraRepayment),
    Scheduled { date: NaiveDate },
}

impl TimelineEvent {
    pub fn date(&self) -> NaiveDate {
        match self {
            TimelineEvent::RateChange(change) => change.date,
            TimelineEvent::ExtraRepayment(extra) => extra.date,
            TimelineEvent::Scheduled { date } => *date,
        }
    }

    pub fn kind(&self) -> EventKind {
        match self {
            TimelineEvent::RateChange(_) => EventKind::RateChange,
            TimelineEvent::ExtraRepayment(_) => EventKind::ExtraRepayment,
            TimelineEvent::Scheduled { .. } => EventKind::Scheduled,
        }
    }
}

/// date-sorted rate changes and extra repayments for one loan
///
/// Sorting is stable, so events on the same date keep the caller's order and
/// duplicates are kept.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    rate_changes: Vec<RateChange>,
    extra_repayments: Vec<ExtraRepayment>,
}

impl Timeline {
    pub fn new(extra_repayments: &[ExtraRepayment], rate_changes: &[RateChange]) -> Self {
        let mut rate_changes = rate_changes.to_vec();
        rate_changes.sort_by_key(|change| change.date);

        let mut extra_repayments = extra_repayments.to_vec();
        extra_repayments.sort_by_key(|extra| extra.date);

        Self {
            rate_changes,
            extra_repayments,
        }
    }

    pub fn rate_change_count(&self) -> usize {
        self.rate_changes.len()
    }

    pub fn extra_repayment_count(&self) -> usize {
        self.extra_repayments.len()
    }

    /// ordered events in the window `(after, scheduled_date]`, ending with the
    /// period's own installment
    pub fn events_for_period(
        &self,
        after: NaiveDate,
        scheduled_date: NaiveDate,
    ) -> Vec<TimelineEvent> {
        let rate_changes = window(&self.rate_changes, after, scheduled_date, |change| change.date);
        let extra_repayments =
            window(&self.extra_repayments, after, scheduled_date, |extra| extra.date);

        let mut events = Vec::with_capacity(rate_changes.len() + extra_repayments.len() + 1);
        events.extend(rate_changes.iter().copied().map(TimelineEvent::RateChange));
        events.extend(extra_repayments.iter().copied().map(TimelineEvent::ExtraRepayment));
        events.push(TimelineEvent::Scheduled {
            date: scheduled_date,
        });

        events.sort_by_key(|event| (event.date(), event.kind()));
        events
    }
}

/// slice of a date-sorted list with `after < date <= until`
fn window<'a, T>(
    sorted: &'a [T],
    after: NaiveDate,
    until: NaiveDate,
    date: impl Fn(&T) -> NaiveDate,
) -> &'a [T] {
    if until <= after {
        return &[];
    }

    let start = sorted.partition_point(|item| date(item) <= after);
    let end = sorted.partition_point(|item| date(item) <= until);
    &sorted[start..end]
}
