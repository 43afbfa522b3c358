//! Inventory domain types.

use carlot_shared::types::{AccountId, VehicleId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of stock-affecting event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementType {
    /// Vehicle received from a supplier.
    Intake,
    /// Vehicle removed from stock without a sale.
    WriteOff,
    /// Vehicle sold to a customer.
    Sale,
}

impl MovementType {
    /// Returns the stored representation of the movement type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Intake => "INTAKE",
            Self::WriteOff => "WRITE_OFF",
            Self::Sale => "SALE",
        }
    }

    /// Parses a movement type from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "INTAKE" => Some(Self::Intake),
            "WRITE_OFF" => Some(Self::WriteOff),
            "SALE" => Some(Self::Sale),
            _ => None,
        }
    }
}

impl fmt::Display for MovementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Stock status of a vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleStatus {
    /// On a purchase order, not yet on the lot.
    Ordered,
    /// On the lot and for sale.
    Available,
    /// Sold to a customer.
    Sold,
    /// Removed from stock.
    WrittenOff,
}

impl VehicleStatus {
    /// Returns the stored representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ordered => "ORDERED",
            Self::Available => "AVAILABLE",
            Self::Sold => "SOLD",
            Self::WrittenOff => "WRITTEN_OFF",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "ORDERED" => Some(Self::Ordered),
            "AVAILABLE" => Some(Self::Available),
            "SOLD" => Some(Self::Sold),
            "WRITTEN_OFF" => Some(Self::WrittenOff),
            _ => None,
        }
    }

    /// Returns true once the vehicle has left stock for good.
    #[must_use]
    pub const fn has_left_stock(&self) -> bool {
        matches!(self, Self::Sold | Self::WrittenOff)
    }
}

impl fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A movement to append to the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMovement {
    /// Vehicle affected.
    pub vehicle_id: VehicleId,
    /// Kind of event.
    pub movement_type: MovementType,
    /// Table of the document that caused the movement.
    pub ref_table: Option<String>,
    /// Key of that document.
    pub ref_id: Option<i32>,
    /// Free-form note.
    pub note: Option<String>,
    /// Acting account.
    pub account_id: AccountId,
}

impl NewMovement {
    /// Creates a movement caused by a row of `ref_table`.
    pub fn referencing(
        vehicle_id: VehicleId,
        movement_type: MovementType,
        ref_table: &str,
        ref_id: i32,
        note: impl Into<String>,
        account_id: AccountId,
    ) -> Self {
        Self {
            vehicle_id,
            movement_type,
            ref_table: Some(ref_table.to_string()),
            ref_id: Some(ref_id),
            note: Some(note.into()),
            account_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movement_type_parse() {
        assert_eq!(MovementType::parse("write_off"), Some(MovementType::WriteOff));
        assert_eq!(MovementType::parse("BAJA"), None);
        assert_eq!(MovementType::Intake.to_string(), "INTAKE");
    }

    #[test]
    fn test_vehicle_status() {
        assert_eq!(VehicleStatus::parse("written_off"), Some(VehicleStatus::WrittenOff));
        assert!(VehicleStatus::Sold.has_left_stock());
        assert!(VehicleStatus::WrittenOff.has_left_stock());
        assert!(!VehicleStatus::Available.has_left_stock());
        assert!(!VehicleStatus::Ordered.has_left_stock());
    }
}
