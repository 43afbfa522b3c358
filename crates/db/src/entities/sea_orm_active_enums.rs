//! String-encoded enumerations stored in status, action, type and role columns.
//!
//! Each one mirrors a `carlot_core` enum; the `From` impls at the bottom
//! convert between the two without a fallible step.

use carlot_core::audit::AuditAction as CoreAuditAction;
use carlot_core::inventory::{MovementType as CoreMovementType, VehicleStatus as CoreVehicleStatus};
use carlot_core::purchase::PurchaseStatus as CorePurchaseStatus;
use carlot_core::sale::SaleStatus as CoreSaleStatus;
use carlot_core::users::AccountRole as CoreAccountRole;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Purchase order status column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum PurchaseStatus {
    /// Awaiting delivery.
    #[sea_orm(string_value = "CREATED")]
    Created,
    /// Delivered and stocked.
    #[sea_orm(string_value = "RECEIVED")]
    Received,
    /// Cancelled before delivery.
    #[sea_orm(string_value = "CANCELLED")]
    Cancelled,
}

/// Sale status column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum SaleStatus {
    /// Closed sale.
    #[sea_orm(string_value = "COMPLETED")]
    Completed,
    /// Annulled sale.
    #[sea_orm(string_value = "VOIDED")]
    Voided,
}

/// Inventory movement type column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum MovementType {
    /// Vehicle entered stock.
    #[sea_orm(string_value = "INTAKE")]
    Intake,
    /// Vehicle written off.
    #[sea_orm(string_value = "WRITE_OFF")]
    WriteOff,
    /// Vehicle sold.
    #[sea_orm(string_value = "SALE")]
    Sale,
}

/// Vehicle stock status column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum VehicleStatus {
    /// On a purchase order, not yet received.
    #[sea_orm(string_value = "ORDERED")]
    Ordered,
    /// In stock and sellable.
    #[sea_orm(string_value = "AVAILABLE")]
    Available,
    /// Sold.
    #[sea_orm(string_value = "SOLD")]
    Sold,
    /// Written off.
    #[sea_orm(string_value = "WRITTEN_OFF")]
    WrittenOff,
}

/// Audit log action column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum AuditAction {
    /// Row created.
    #[sea_orm(string_value = "CREATE")]
    Create,
    /// Row updated.
    #[sea_orm(string_value = "UPDATE")]
    Update,
    /// Row logically deleted.
    #[sea_orm(string_value = "DELETE")]
    Delete,
    /// Successful or failed login.
    #[sea_orm(string_value = "LOGIN")]
    Login,
    /// Logout.
    #[sea_orm(string_value = "LOGOUT")]
    Logout,
}

/// Account role column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum AccountRole {
    /// Administrator.
    #[sea_orm(string_value = "ADMINISTRATOR")]
    Administrator,
    /// Employee.
    #[sea_orm(string_value = "EMPLOYEE")]
    Employee,
}

/// Generates `From` conversions both ways between a stored enum and its core twin.
macro_rules! mirror_core_enum {
    ($db:ident <=> $core:ident { $($variant:ident),+ $(,)? }) => {
        impl From<$db> for $core {
            fn from(value: $db) -> Self {
                match value {
                    $($db::$variant => Self::$variant,)+
                }
            }
        }

        impl From<$core> for $db {
            fn from(value: $core) -> Self {
                match value {
                    $($core::$variant => Self::$variant,)+
                }
            }
        }
    };
}

mirror_core_enum!(PurchaseStatus <=> CorePurchaseStatus {
    Created,
    Received,
    Cancelled,
});
mirror_core_enum!(SaleStatus <=> CoreSaleStatus { Completed, Voided });
mirror_core_enum!(MovementType <=> CoreMovementType {
    Intake,
    WriteOff,
    Sale,
});
mirror_core_enum!(VehicleStatus <=> CoreVehicleStatus {
    Ordered,
    Available,
    Sold,
    WrittenOff,
});
mirror_core_enum!(AuditAction <=> CoreAuditAction {
    Create,
    Update,
    Delete,
    Login,
    Logout,
});
mirror_core_enum!(AccountRole <=> CoreAccountRole {
    Administrator,
    Employee,
});
