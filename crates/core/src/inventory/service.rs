//! Inventory rules.

use crate::error::WorkflowError;
use crate::inventory::types::{NewMovement, VehicleStatus};

/// Reference table of intake movements.
pub const REF_PURCHASE_ORDER: &str = "purchase_order";
/// Reference table of sale movements.
pub const REF_SALE: &str = "sale";
/// Reference table of write-off movements.
pub const REF_VEHICLE: &str = "vehicle";

/// Note recorded when a write-off carries none.
pub const DEFAULT_WRITE_OFF_NOTE: &str = "Written off from inventory.";

/// Stateless service for inventory checks.
pub struct InventoryService;

impl InventoryService {
    /// Checks the required fields of a movement.
    pub fn validate_movement(movement: &NewMovement) -> Result<(), WorkflowError> {
        if !movement.vehicle_id.is_valid() {
            return Err(WorkflowError::validation("movement vehicle id must be positive"));
        }
        if !movement.account_id.is_valid() {
            return Err(WorkflowError::validation("movement account id must be positive"));
        }
        Ok(())
    }

    /// Checks that a vehicle can be sold: only AVAILABLE stock leaves through a sale.
    pub fn ensure_sellable(status: VehicleStatus) -> Result<(), WorkflowError> {
        if status == VehicleStatus::Available {
            Ok(())
        } else {
            Err(WorkflowError::IllegalState(format!(
                "vehicle is {status} and cannot be sold"
            )))
        }
    }

    /// Checks that a vehicle can be written off.
    pub fn ensure_write_off(status: VehicleStatus) -> Result<(), WorkflowError> {
        if status.has_left_stock() {
            Err(WorkflowError::IllegalState(format!(
                "vehicle is {status} and cannot be written off"
            )))
        } else {
            Ok(())
        }
    }

    /// Returns the trimmed note, or the default one when blank.
    #[must_use]
    pub fn write_off_note(note: Option<&str>) -> String {
        match note.map(str::trim) {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => DEFAULT_WRITE_OFF_NOTE.to_string(),
        }
    }
}
