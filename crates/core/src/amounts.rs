//! Money invariants shared by purchase orders and sales.
//!
//! CRITICAL: all arithmetic uses `rust_decimal::Decimal`. The identity
//! `total == subtotal - discount + taxes` must hold for every persisted row.

use carlot_shared::types::money::{is_non_negative, round_money};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::WorkflowError;

/// Markup applied to the agreed purchase price when stock is received (6%).
pub const MARKUP_RATE: Decimal = Decimal::from_parts(106, 0, 0, false, 2);

/// Resolved amounts of an order or sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amounts {
    /// Sum of line prices before discount and taxes.
    pub subtotal: Decimal,
    /// Discount, never above the subtotal.
    pub discount: Decimal,
    /// Taxes added after the discount.
    pub taxes: Decimal,
    /// `subtotal - discount + taxes`.
    pub total: Decimal,
}

impl Amounts {
    /// Validates the amounts and computes the total when absent.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Validation` if any amount is negative, the
    /// discount exceeds the subtotal, or a supplied total does not match.
    pub fn resolve(
        subtotal: Decimal,
        discount: Decimal,
        taxes: Decimal,
        total: Option<Decimal>,
    ) -> Result<Self, WorkflowError> {
        if !is_non_negative(subtotal) {
            return Err(WorkflowError::validation("subtotal must not be negative"));
        }
        if !is_non_negative(discount) {
            return Err(WorkflowError::validation("discount must not be negative"));
        }
        if !is_non_negative(taxes) {
            return Err(WorkflowError::validation("taxes must not be negative"));
        }
        if discount > subtotal {
            return Err(WorkflowError::validation(
                "discount must not exceed the subtotal",
            ));
        }

        let expected = Self::expected_total(subtotal, discount, taxes);
        let total = match total {
            Some(given) if given != expected => {
                return Err(WorkflowError::Validation(format!(
                    "total {given} does not match subtotal - discount + taxes = {expected}"
                )));
            }
            Some(given) => given,
            None => expected,
        };

        Ok(Self {
            subtotal,
            discount,
            taxes,
            total,
        })
    }

    /// `subtotal - discount + taxes`.
    #[must_use]
    pub fn expected_total(subtotal: Decimal, discount: Decimal, taxes: Decimal) -> Decimal {
        subtotal - discount + taxes
    }

    /// Returns true if the stored total matches the identity.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.total == Self::expected_total(self.subtotal, self.discount, self.taxes)
    }
}

/// Resale price for a received vehicle: `round(agreed * 1.06, 2)`.
#[must_use]
pub fn markup_price(agreed_price: Decimal) -> Decimal {
    round_money(agreed_price * MARKUP_RATE)
}
