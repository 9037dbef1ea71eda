pub mod accrual;

use rust_decimal::Decimal;

use crate::decimal::{Money, Rate};

pub use accrual::{AccrualEngine, AccrualSpan};

/// interest calculation result, amount left unrounded
#[derive(Debug, Clone, PartialEq)]
pub struct InterestCalculation {
    pub interest_amount: Decimal,
    pub full_months: u32,
    pub extra_days: u32,
    pub principal_base: Money,
    pub annual_rate: Rate,
}

impl InterestCalculation {
    /// the amount finalized to whole cents
    pub fn rounded(&self) -> Money {
        Money::from_decimal_cents(self.interest_amount)
    }
}
