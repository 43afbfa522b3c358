//! Typed before/after snapshots stored as JSON in the audit log.
//!
//! Keys are camelCase and decimals serialize as strings.

use carlot_shared::types::{AccountId, SupplierId};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::WorkflowError;
use crate::inventory::VehicleStatus;
use crate::purchase::PurchaseStatus;
use crate::sale::SaleStatus;
use crate::users::AccountRole;

/// Serializes a snapshot to the JSON text stored in the audit log.
pub fn to_json<T: Serialize>(snapshot: &T) -> Result<String, WorkflowError> {
    serde_json::to_string(snapshot)
        .map_err(|e| WorkflowError::Persistence(format!("failed to encode audit snapshot: {e}")))
}

/// Status of a purchase order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseStatusSnapshot {
    /// Order status.
    pub status: PurchaseStatus,
}

/// A newly placed purchase order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseCreatedSnapshot {
    /// Order status.
    pub status: PurchaseStatus,
    /// Supplier.
    pub supplier_id: SupplierId,
}

/// Editable fields of a purchase order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseEditSnapshot {
    /// Supplier.
    pub supplier_id: SupplierId,
    /// Promised delivery date.
    pub expected_date: Option<NaiveDate>,
    /// Subtotal.
    pub subtotal: Decimal,
    /// Total after recomputation.
    pub total: Decimal,
}

/// Folio, status and amounts of a sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleSnapshot {
    /// Receipt number.
    pub folio: String,
    /// Sale status.
    pub status: SaleStatus,
    /// Subtotal.
    pub subtotal: Decimal,
    /// Discount.
    pub discount: Decimal,
    /// Taxes.
    pub taxes: Decimal,
    /// Total.
    pub total: Decimal,
}

/// Stock status of a vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleStatusSnapshot {
    /// Vehicle status.
    pub status: VehicleStatus,
}

/// Login account, without credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSnapshot {
    /// Account key.
    pub account_id: AccountId,
    /// Login email.
    pub email: String,
    /// Role.
    pub role: AccountRole,
    /// Whether the account may log in.
    pub is_active: bool,
}

/// User profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSnapshot {
    /// Profile key.
    pub personnel_number: String,
    /// Login name.
    pub username: String,
    /// Display name.
    pub full_name: String,
    /// Normalized phone.
    pub phone: String,
}

/// Outcome of a login attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginSnapshot {
    /// Email the attempt was made with.
    pub email: String,
    /// Whether the credentials were accepted.
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_sale_snapshot_json_shape() {
        let snapshot = SaleSnapshot {
            folio: "F-9".to_string(),
            status: SaleStatus::Completed,
            subtotal: dec!(15000.00),
            discount: dec!(1500.00),
            taxes: dec!(500.00),
            total: dec!(14000.00),
        };

        let json = to_json(&snapshot).unwrap();
        assert_eq!(
            json,
            r#"{"folio":"F-9","status":"COMPLETED","subtotal":"15000.00","discount":"1500.00","taxes":"500.00","total":"14000.00"}"#
        );

        let back: SaleSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }

    #[test]
    fn test_account_snapshot_uses_camel_case() {
        let json = to_json(&AccountSnapshot {
            account_id: AccountId::new(5),
            email: "ana@carlot.mx".to_string(),
            role: AccountRole::Administrator,
            is_active: true,
        })
        .unwrap();

        assert_eq!(
            json,
            r#"{"accountId":5,"email":"ana@carlot.mx","role":"ADMINISTRATOR","isActive":true}"#
        );
    }

    #[test]
    fn test_purchase_edit_snapshot_encodes_date() {
        let json = to_json(&PurchaseEditSnapshot {
            supplier_id: SupplierId::new(2),
            expected_date: NaiveDate::from_ymd_opt(2026, 3, 1),
            subtotal: dec!(100.00),
            total: dec!(116.00),
        })
        .unwrap();

        assert!(json.contains(r#""expectedDate":"2026-03-01""#));
        assert!(json.contains(r#""supplierId":2"#));
    }
}
