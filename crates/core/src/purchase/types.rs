//! Purchase order domain types.

use carlot_shared::types::{PurchaseOrderId, SupplierId, VehicleId};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Purchase order status.
///
/// Valid transitions:
/// - Created → Received (receive)
/// - Created → Cancelled (cancel)
///
/// Received and Cancelled are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PurchaseStatus {
    /// Ordered from the supplier, stock not yet on the lot.
    Created,
    /// Vehicles arrived and were added to inventory.
    Received,
    /// Order abandoned before receipt.
    Cancelled,
}

impl PurchaseStatus {
    /// Returns the stored representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "CREATED",
            Self::Received => "RECEIVED",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "CREATED" => Some(Self::Created),
            "RECEIVED" => Some(Self::Received),
            "CANCELLED" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Returns true if the order can still be edited, received or cancelled.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self, Self::Created)
    }

    /// Returns true if `target` is reachable in one step.
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Created, Self::Received | Self::Cancelled)
        )
    }
}

impl fmt::Display for PurchaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Header of a purchase order being placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPurchaseOrder {
    /// Supplier the vehicles are bought from.
    pub supplier_id: SupplierId,
    /// Promised delivery date.
    pub expected_date: Option<NaiveDate>,
    /// Sum of agreed prices.
    pub subtotal: Decimal,
    /// Negotiated discount.
    pub discount: Decimal,
    /// Taxes charged.
    pub taxes: Decimal,
    /// Computed when absent.
    pub total: Option<Decimal>,
}

/// One vehicle on a purchase order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPurchaseItem {
    /// Vehicle being bought.
    pub vehicle_id: VehicleId,
    /// Price agreed with the supplier.
    pub agreed_price: Decimal,
}

/// Edit of an order that is still `Created`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseOrderChange {
    /// Order being edited.
    pub purchase_id: PurchaseOrderId,
    /// New supplier.
    pub supplier_id: SupplierId,
    /// New promised delivery date.
    pub expected_date: Option<NaiveDate>,
    /// New subtotal; the total is recomputed from the stored discount and taxes.
    pub subtotal: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip() {
        for status in [
            PurchaseStatus::Created,
            PurchaseStatus::Received,
            PurchaseStatus::Cancelled,
        ] {
            assert_eq!(PurchaseStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(PurchaseStatus::parse("received"), Some(PurchaseStatus::Received));
        assert_eq!(PurchaseStatus::parse("CANCELADA"), None);
    }

    #[test]
    fn test_transitions() {
        assert!(PurchaseStatus::Created.can_transition_to(PurchaseStatus::Received));
        assert!(PurchaseStatus::Created.can_transition_to(PurchaseStatus::Cancelled));
        assert!(!PurchaseStatus::Received.can_transition_to(PurchaseStatus::Cancelled));
        assert!(!PurchaseStatus::Cancelled.can_transition_to(PurchaseStatus::Received));
        assert!(!PurchaseStatus::Created.can_transition_to(PurchaseStatus::Created));
    }

    #[test]
    fn test_status_serializes_upper_case() {
        let json = serde_json::to_string(&PurchaseStatus::Cancelled).unwrap();
        assert_eq!(json, "\"CANCELLED\"");
    }
}
