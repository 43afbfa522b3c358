//! Audit trail types.
//!
//! Every workflow mutation writes exactly one entry per logical entity it
//! changes, inside the same transaction as the change.

pub mod snapshot;
pub mod types;

pub use snapshot::{
    AccountSnapshot, LoginSnapshot, PurchaseCreatedSnapshot, PurchaseEditSnapshot,
    PurchaseStatusSnapshot, SaleSnapshot, UserSnapshot, VehicleStatusSnapshot, to_json,
};
pub use types::{AuditAction, NewAuditEntry, entity};
