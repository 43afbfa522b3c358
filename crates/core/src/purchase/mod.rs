//! Purchase order lifecycle.
//!
//! # Modules
//!
//! - `types` - PurchaseStatus and order inputs
//! - `service` - Validation and transition rules

pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use service::{DEFAULT_CANCEL_REASON, PurchaseOrderService};
pub use types::{NewPurchaseItem, NewPurchaseOrder, PurchaseOrderChange, PurchaseStatus};
