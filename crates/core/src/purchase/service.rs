//! Purchase order rules.
//!
//! Stateless checks the repository runs before and inside its transaction.

use std::collections::HashSet;

use carlot_shared::types::SupplierId;
use rust_decimal::Decimal;

use crate::amounts::Amounts;
use crate::error::WorkflowError;
use crate::purchase::types::{NewPurchaseItem, NewPurchaseOrder, PurchaseStatus};

/// Reason stored when an order is cancelled without one.
pub const DEFAULT_CANCEL_REASON: &str = "Cancelled from the purchasing module.";

/// Stateless service for purchase order transitions.
pub struct PurchaseOrderService;

impl PurchaseOrderService {
    /// Validates a new order and its items, returning the resolved amounts.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Validation` if:
    /// - the supplier id is not positive
    /// - there are no items
    /// - an item has a non-positive agreed price
    /// - a vehicle appears twice
    /// - the amounts break the total identity
    pub fn validate_new(
        order: &NewPurchaseOrder,
        items: &[NewPurchaseItem],
    ) -> Result<Amounts, WorkflowError> {
        if !order.supplier_id.is_valid() {
            return Err(WorkflowError::validation("a supplier is required"));
        }
        if items.is_empty() {
            return Err(WorkflowError::validation(
                "a purchase order needs at least one vehicle",
            ));
        }

        let mut seen = HashSet::with_capacity(items.len());
        for item in items {
            if !item.vehicle_id.is_valid() {
                return Err(WorkflowError::validation("item vehicle id must be positive"));
            }
            if item.agreed_price <= Decimal::ZERO {
                return Err(WorkflowError::Validation(format!(
                    "agreed price for vehicle {} must be positive",
                    item.vehicle_id
                )));
            }
            if !seen.insert(item.vehicle_id) {
                return Err(WorkflowError::Validation(format!(
                    "vehicle {} appears more than once",
                    item.vehicle_id
                )));
            }
        }

        Amounts::resolve(order.subtotal, order.discount, order.taxes, order.total)
    }

    /// Checks that an order in `current` can move to `target`.
    pub fn transition(
        current: PurchaseStatus,
        target: PurchaseStatus,
    ) -> Result<PurchaseStatus, WorkflowError> {
        if current.can_transition_to(target) {
            Ok(target)
        } else {
            Err(WorkflowError::IllegalState(format!(
                "only CREATED orders can be {}, order is {current}",
                target.as_str().to_lowercase()
            )))
        }
    }

    /// Checks that an order can still be edited.
    pub fn ensure_editable(current: PurchaseStatus) -> Result<(), WorkflowError> {
        if current.is_open() {
            Ok(())
        } else {
            Err(WorkflowError::IllegalState(format!(
                "only CREATED orders can be updated, order is {current}"
            )))
        }
    }

    /// Recomputes amounts after a subtotal edit, keeping the stored discount and taxes.
    pub fn revised_amounts(
        subtotal: Decimal,
        discount: Decimal,
        taxes: Decimal,
    ) -> Result<Amounts, WorkflowError> {
        Amounts::resolve(subtotal, discount, taxes, None)
    }

    /// Returns the trimmed reason, or the default one when blank.
    #[must_use]
    pub fn cancel_reason(reason: Option<&str>) -> String {
        match reason.map(str::trim) {
            Some(r) if !r.is_empty() => r.to_string(),
            _ => DEFAULT_CANCEL_REASON.to_string(),
        }
    }

    /// Note recorded on every intake movement of a received order.
    #[must_use]
    pub fn intake_note(supplier_id: SupplierId) -> String {
        format!("Purchase from supplier {supplier_id}")
    }
}
