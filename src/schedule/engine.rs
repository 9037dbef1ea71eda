use chrono::NaiveDate;
use log::{debug, warn};
use rust_decimal::Decimal;

use crate::calendar::days_between;
use crate::config::ScheduleConfig;
use crate::decimal::{round_half_away, Money, CENT_DP};
use crate::errors::Result;
use crate::events::{Event, EventStore, RecalculationReason};
use crate::interest::AccrualEngine;
use crate::loan::LoanTerms;
use crate::schedule::state::EngineState;
use crate::schedule::timeline::{Timeline, TimelineEvent};
use crate::schedule::Schedule;
use crate::types::{ExtraRepayment, RateChange, RowKind, ScheduleRow};

/// walks a loan's periods and turns its events into schedule rows
#[derive(Debug, Clone)]
pub struct ScheduleEngine {
    config: ScheduleConfig,
    accrual: AccrualEngine,
}

/// where the walk is within the loan term
#[derive(Debug, Clone, Copy)]
struct PeriodContext {
    period: u32,
    total_periods: u32,
    event_count: usize,
}

impl PeriodContext {
    fn periods_remaining(&self) -> u32 {
        self.total_periods - self.period + 1
    }

    fn is_first(&self) -> bool {
        self.period == 1
    }

    fn is_final(&self) -> bool {
        self.period == self.total_periods
    }
}

impl ScheduleEngine {
    pub fn new(config: ScheduleConfig) -> Result<Self> {
        config.validate()?;
        let accrual = AccrualEngine::from_config(&config);
        Ok(Self { config, accrual })
    }

    pub fn standard() -> Self {
        let config = ScheduleConfig::standard();
        let accrual = AccrualEngine::from_config(&config);
        Self { config, accrual }
    }

    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    /// generate the full repayment schedule for one loan
    ///
    /// Never fails: a loan with nothing to amortize yields an empty schedule,
    /// and events outside every period window are ignored.
    pub fn generate(
        &self,
        terms: &LoanTerms,
        extra_repayments: &[ExtraRepayment],
        rate_changes: &[RateChange],
    ) -> Schedule {
        let mut events = EventStore::new();
        let mut rows = Vec::new();

        let principal = terms.principal.round_cents();
        if terms.total_periods == 0 || !principal.is_positive() {
            debug!(
                "nothing to amortize: principal {}, {} periods",
                principal, terms.total_periods
            );
            return Schedule::new(terms.loan_id, Money::ZERO, rows, events);
        }

        let timeline = Timeline::new(extra_repayments, rate_changes);
        let mut state = EngineState::open(terms, self.config.months_per_year);
        let initial_installment = state.installment;

        events.emit(Event::ScheduleStarted {
            loan_id: terms.loan_id,
            principal,
            annual_rate: terms.annual_rate,
            total_periods: terms.total_periods,
            installment: initial_installment,
        });

        let mut rate_changes_seen = 0;
        let mut extra_repayments_seen = 0;

        'periods: for period in 1..=terms.total_periods {
            if state.is_settled(self.config.balance_epsilon) {
                break;
            }

            let scheduled_date = terms.scheduled_date(period);
            let period_events = timeline.events_for_period(state.last_transaction, scheduled_date);
            let ctx = PeriodContext {
                period,
                total_periods: terms.total_periods,
                event_count: period_events.len(),
            };

            for event in &period_events {
                match *event {
                    TimelineEvent::RateChange(change) => {
                        rate_changes_seen += 1;
                        self.apply_rate_change(&mut state, ctx, change, &mut events);
                    }
                    TimelineEvent::ExtraRepayment(extra) => {
                        extra_repayments_seen += 1;
                        let row = self.apply_extra_repayment(&mut state, ctx, extra, &mut events);
                        rows.push(row);
                    }
                    TimelineEvent::Scheduled { date } => {
                        let row = self.apply_installment(&mut state, ctx, date, &mut events);
                        rows.push(row);
                    }
                }

                if state.settle_if_repaid(self.config.balance_epsilon) {
                    debug!("loan repaid in period {} on {}", period, event.date());
                    events.emit(Event::LoanSettled {
                        period,
                        date: event.date(),
                        periods_unused: terms.total_periods - period,
                    });
                    break 'periods;
                }
            }
        }

        let unused_rate_changes = timeline.rate_change_count() - rate_changes_seen;
        let unused_extra_repayments = timeline.extra_repayment_count() - extra_repayments_seen;
        if unused_rate_changes > 0 || unused_extra_repayments > 0 {
            debug!(
                "{} rate changes and {} extra repayments fell outside the schedule",
                unused_rate_changes, unused_extra_repayments
            );
            events.emit(Event::EventsNotConsumed {
                rate_changes: unused_rate_changes,
                extra_repayments: unused_extra_repayments,
            });
        }

        Schedule::new(terms.loan_id, initial_installment, rows, events)
    }

    /// new rate from this date on; no cash moves so no row is produced
    fn apply_rate_change(
        &self,
        state: &mut EngineState,
        ctx: PeriodContext,
        change: RateChange,
        events: &mut EventStore,
    ) {
        let old_rate = std::mem::replace(&mut state.annual_rate, change.annual_rate);

        events.emit(Event::InterestRateChanged {
            period: ctx.period,
            date: change.date,
            old_rate,
            new_rate: change.annual_rate,
        });

        self.recalculate_installment(state, ctx, RecalculationReason::RateChange, events);
    }

    /// unscheduled payment: settles interest accrued so far, the rest reduces principal
    fn apply_extra_repayment(
        &self,
        state: &mut EngineState,
        ctx: PeriodContext,
        extra: ExtraRepayment,
        events: &mut EventStore,
    ) -> ScheduleRow {
        let amount = extra.amount.round_cents();
        let interest = self
            .accrual
            .calculate(state.balance, state.annual_rate, state.last_transaction, extra.date)
            .rounded();

        // a payment short of its interest leaves negative principal and grows the balance
        let principal = amount - interest;
        if principal.is_negative() {
            warn!(
                "extra repayment of {} on {} does not cover accrued interest {}",
                amount, extra.date, interest
            );
            events.emit(Event::NegativeAmortization {
                period: ctx.period,
                date: extra.date,
                shortfall: -principal,
            });
        }

        state.balance -= principal;
        state.last_transaction = extra.date;

        events.emit(Event::ExtraRepaymentApplied {
            period: ctx.period,
            date: extra.date,
            amount,
            interest,
            principal,
            new_balance: state.balance,
        });

        let row = ScheduleRow {
            period: ctx.period,
            date: extra.date,
            payment: amount,
            principal,
            interest,
            remaining_balance: state.reported_balance(self.config.balance_epsilon),
            is_adjusted: true,
            kind: RowKind::ExtraRepayment,
        };

        self.recalculate_installment(state, ctx, RecalculationReason::ExtraRepayment, events);
        row
    }

    /// the period's regular installment
    fn apply_installment(
        &self,
        state: &mut EngineState,
        ctx: PeriodContext,
        date: NaiveDate,
        events: &mut EventStore,
    ) -> ScheduleRow {
        let gap = days_between(state.last_transaction, date);
        let standard_month = !ctx.is_first()
            && !ctx.is_final()
            && ctx.event_count == 1
            && self.config.is_standard_month(gap);

        let interest = if standard_month {
            Money::from_decimal_cents(self.accrual.standard_month(state.balance, state.annual_rate))
        } else {
            self.accrual
                .calculate(state.balance, state.annual_rate, state.last_transaction, date)
                .rounded()
        };

        let principal = self.installment_principal(state, ctx, interest);
        state.balance -= principal;
        state.last_transaction = date;

        let payment = principal + interest;

        events.emit(Event::InstallmentPaid {
            period: ctx.period,
            date,
            payment,
            standard_month,
        });

        ScheduleRow {
            period: ctx.period,
            date,
            payment,
            principal,
            interest,
            remaining_balance: state.reported_balance(self.config.balance_epsilon),
            is_adjusted: ctx.event_count > 1,
            kind: RowKind::Scheduled,
        }
    }

    /// principal portion of an installment, snapped to the full balance when
    /// only a few cents would be left over
    fn installment_principal(
        &self,
        state: &EngineState,
        ctx: PeriodContext,
        interest: Money,
    ) -> Money {
        let balance = state.balance.as_decimal();

        let raw: Decimal = if ctx.is_final() || state.balance < state.installment {
            balance
        } else if ctx.is_first() {
            // the first period is split against a standard month's interest
            let standard_interest = self.accrual.standard_month(state.balance, state.annual_rate);
            state.installment.as_decimal() - standard_interest
        } else {
            state.installment.as_decimal() - interest.as_decimal()
        };

        let rounded = round_half_away(raw, CENT_DP);
        if balance - rounded < self.config.payoff_snap_threshold.as_decimal() {
            state.balance
        } else {
            Money::from_decimal(rounded)
        }
    }

    fn recalculate_installment(
        &self,
        state: &mut EngineState,
        ctx: PeriodContext,
        reason: RecalculationReason,
        events: &mut EventStore,
    ) {
        let periods_remaining = ctx.periods_remaining();
        let old_installment = state.recalculate_installment(periods_remaining);

        events.emit(Event::InstallmentRecalculated {
            period: ctx.period,
            old_installment,
            new_installment: state.installment,
            periods_remaining,
            reason,
        });
    }
}

impl Default for ScheduleEngine {
    fn default() -> Self {
        Self::standard()
    }
}
