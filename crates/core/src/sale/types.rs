//! Sale domain types.

use carlot_shared::types::{SaleId, VehicleId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sale status.
///
/// A sale is recorded as Completed; Completed → Voided is the only
/// transition and Voided is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SaleStatus {
    /// Closed and delivered to the customer.
    Completed,
    /// Annulled after closing.
    Voided,
}

impl SaleStatus {
    /// Returns the stored representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "COMPLETED",
            Self::Voided => "VOIDED",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "COMPLETED" => Some(Self::Completed),
            "VOIDED" => Some(Self::Voided),
            _ => None,
        }
    }

    /// Returns true if the sale can no longer change.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Voided)
    }
}

impl fmt::Display for SaleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A sale being recorded. The seller is the acting account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSale {
    /// Human-readable, unique receipt number.
    pub folio: String,
    /// Vehicle sold.
    pub vehicle_id: VehicleId,
    /// Customer buying the vehicle.
    pub customer_number: String,
    /// Defaults to `Completed`.
    pub status: Option<SaleStatus>,
    /// Price before discount and taxes.
    pub subtotal: Decimal,
    /// Discount granted.
    pub discount: Decimal,
    /// Taxes charged.
    pub taxes: Decimal,
    /// Computed when absent.
    pub total: Option<Decimal>,
}

/// Re-save of an existing sale, possibly voiding it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleChange {
    /// Sale being updated.
    pub sale_id: SaleId,
    /// Customer on the receipt.
    pub customer_number: String,
    /// Target status.
    pub status: SaleStatus,
    /// Price before discount and taxes.
    pub subtotal: Decimal,
    /// Discount granted.
    pub discount: Decimal,
    /// Taxes charged.
    pub taxes: Decimal,
    /// Computed when absent.
    pub total: Option<Decimal>,
    /// Reason recorded when voiding.
    pub annul_reason: Option<String>,
}

/// Lifecycle timestamps of a sale, derived from its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleLifecycle {
    /// Current status.
    pub status: SaleStatus,
    /// When the sale was last closed.
    pub closed_at: Option<DateTime<Utc>>,
    /// When the sale was voided.
    pub annulled_at: Option<DateTime<Utc>>,
    /// Why the sale was voided.
    pub annul_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse() {
        assert_eq!(SaleStatus::parse("completed"), Some(SaleStatus::Completed));
        assert_eq!(SaleStatus::parse("VOIDED"), Some(SaleStatus::Voided));
        assert_eq!(SaleStatus::parse("ANULADA"), None);
    }

    #[test]
    fn test_status_terminal() {
        assert!(SaleStatus::Voided.is_terminal());
        assert!(!SaleStatus::Completed.is_terminal());
    }
}
