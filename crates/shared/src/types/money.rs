//! Money helpers with decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts are `rust_decimal::Decimal` stored with two fractional digits.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of fractional digits persisted for every amount.
pub const MONEY_SCALE: u32 = 2;

/// Rounds an amount to cents, half away from zero.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns true if the amount is zero or positive.
#[must_use]
pub fn is_non_negative(amount: Decimal) -> bool {
    !amount.is_sign_negative() || amount.is_zero()
}
