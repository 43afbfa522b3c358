//! Inventory movements and vehicle stock status.

pub mod service;
pub mod types;

pub use service::{
    DEFAULT_WRITE_OFF_NOTE, InventoryService, REF_PURCHASE_ORDER, REF_SALE, REF_VEHICLE,
};
pub use types::{MovementType, NewMovement, VehicleStatus};
