use rust_decimal::Decimal;

use crate::decimal::{round_half_away, Money, Rate, CENT_DP};

/// level installment that repays `balance` over `periods_remaining` periods
///
/// Returns zero when there is nothing left to amortize. A non-positive
/// periodic rate degrades to straight-line repayment.
pub fn calculate_installment(balance: Money, periodic_rate: Rate, periods_remaining: u32) -> Money {
    if periods_remaining == 0 || !balance.is_positive() {
        return Money::ZERO;
    }

    let principal = balance.as_decimal();
    let n = Decimal::from(periods_remaining);
    let r = periodic_rate.as_decimal();

    if r <= Decimal::ZERO {
        return Money::from_decimal_cents(principal / n);
    }

    // PMT = r * P / (1 - (1 + r)^-n)
    let discount = match compound_factor(Decimal::ONE + r, periods_remaining) {
        Some(factor) => Decimal::ONE / factor,
        // (1 + r)^n beyond decimal range, the discount term is negligible
        None => Decimal::ZERO,
    };

    let denominator = Decimal::ONE - discount;
    if denominator.is_zero() {
        return Money::from_decimal_cents(principal / n);
    }

    Money::from_decimal(round_half_away(r * principal / denominator, CENT_DP))
}

/// base^exponent by squaring, `None` on overflow
fn compound_factor(base: Decimal, exponent: u32) -> Option<Decimal> {
    let mut result = Decimal::ONE;
    let mut square = base;
    let mut remaining = exponent;

    while remaining > 0 {
        if remaining & 1 == 1 {
            result = result.checked_mul(square)?;
        }
        remaining >>= 1;
        if remaining > 0 {
            square = square.checked_mul(square)?;
        }
    }

    Some(result)
}
