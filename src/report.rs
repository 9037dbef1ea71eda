//! summary and export views over a generated schedule
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

use crate::decimal::Money;
use crate::schedule::Schedule;
use crate::types::{LoanId, RowKind, ScheduleRow};

/// headline figures of a schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub loan_id: Option<LoanId>,
    pub initial_installment: Money,
    pub total_payment: Money,
    pub total_principal: Money,
    pub total_interest: Money,
    pub row_count: usize,
    pub installment_count: usize,
    pub extra_repayment_count: usize,
    pub payoff_date: Option<NaiveDate>,
}

impl ScheduleSummary {
    pub fn from_schedule(schedule: &Schedule) -> Self {
        ScheduleSummary {
            loan_id: schedule.loan_id,
            initial_installment: schedule.initial_installment,
            total_payment: schedule.total_payment(),
            total_principal: schedule.total_principal(),
            total_interest: schedule.total_interest(),
            row_count: schedule.len(),
            installment_count: schedule.rows_of_kind(RowKind::Scheduled).count(),
            extra_repayment_count: schedule
                .rows()
                .iter()
                .filter(|row| row.is_extra_repayment())
                .count(),
            payoff_date: schedule.payoff_date(),
        }
    }

    /// interest avoided compared to `baseline`, typically the same loan
    /// without extra repayments; negative when this schedule costs more
    pub fn interest_saved_against(&self, baseline: &ScheduleSummary) -> Money {
        baseline.total_interest - self.total_interest
    }
}

/// serializable view of a whole schedule
#[derive(Debug, Serialize, Deserialize)]
pub struct ScheduleView {
    pub summary: ScheduleSummary,
    pub rows: Vec<ScheduleRow>,
}

impl ScheduleView {
    pub fn from_schedule(schedule: &Schedule) -> Self {
        ScheduleView {
            summary: ScheduleSummary::from_schedule(schedule),
            rows: schedule.rows().to_vec(),
        }
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Schedule {
    pub fn summary(&self) -> ScheduleSummary {
        ScheduleSummary::from_schedule(self)
    }

    /// get json representation
    pub fn json(&self) -> String {
        ScheduleView::from_schedule(self)
            .to_json_pretty()
            .unwrap_or_else(|e| format!("JSON error: {}", e))
    }

    /// fixed-width table, one line per row
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{:>6}  {:<10}  {:<15}  {:>14}  {:>14}  {:>12}  {:>14}",
            "period", "date", "kind", "payment", "principal", "interest", "balance"
        );

        for row in self.rows() {
            let _ = writeln!(
                out,
                "{:>6}  {:<10}  {:<15}  {:>14}  {:>14}  {:>12}  {:>14}",
                row.period,
                row.date.format("%Y-%m-%d").to_string(),
                row.kind.label(),
                cents(row.payment),
                cents(row.principal),
                cents(row.interest),
                cents(row.remaining_balance),
            );
        }

        out
    }
}

fn cents(amount: Money) -> String {
    format!("{:.2}", amount.round_cents())
}
