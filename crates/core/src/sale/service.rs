//! Sale rules.

use chrono::{DateTime, Utc};

use crate::amounts::Amounts;
use crate::error::WorkflowError;
use crate::sale::types::{NewSale, SaleChange, SaleLifecycle, SaleStatus};

/// Reason stored when a sale is voided without one.
pub const DEFAULT_ANNUL_REASON: &str = "Sale voided from the sales module.";

/// Stateless service for sale validation and lifecycle derivation.
pub struct SaleService;

impl SaleService {
    /// Validates a new sale, returning the resolved amounts.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Validation` for a blank folio or customer,
    /// an invalid vehicle id, a VOIDED initial status, or amounts that
    /// break the total identity.
    pub fn validate_new(sale: &NewSale) -> Result<Amounts, WorkflowError> {
        if sale.folio.trim().is_empty() {
            return Err(WorkflowError::validation("folio is required"));
        }
        if sale.customer_number.trim().is_empty() {
            return Err(WorkflowError::validation("customer number is required"));
        }
        if !sale.vehicle_id.is_valid() {
            return Err(WorkflowError::validation("a vehicle is required"));
        }
        if sale.status == Some(SaleStatus::Voided) {
            return Err(WorkflowError::validation(
                "a sale must be recorded as COMPLETED",
            ));
        }

        Amounts::resolve(sale.subtotal, sale.discount, sale.taxes, sale.total)
    }

    /// Validates an update, returning the resolved amounts.
    pub fn validate_change(change: &SaleChange) -> Result<Amounts, WorkflowError> {
        if change.customer_number.trim().is_empty() {
            return Err(WorkflowError::validation("customer number is required"));
        }

        Amounts::resolve(change.subtotal, change.discount, change.taxes, change.total)
    }

    /// Derives the lifecycle fields for a sale moving to `target`.
    ///
    /// Voiding stamps `annulled_at` and keeps the prior `closed_at`.
    /// Re-saving as completed stamps `closed_at` and keeps the annul fields.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::IllegalState` if the sale is already voided.
    pub fn plan_update(
        current: &SaleLifecycle,
        target: SaleStatus,
        annul_reason: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<SaleLifecycle, WorkflowError> {
        if current.status.is_terminal() {
            return Err(WorkflowError::IllegalState(format!(
                "sale is {} and cannot be changed",
                current.status
            )));
        }

        Ok(match target {
            SaleStatus::Voided => SaleLifecycle {
                status: target,
                closed_at: current.closed_at,
                annulled_at: Some(now),
                annul_reason: Some(Self::annul_reason(annul_reason)),
            },
            SaleStatus::Completed => SaleLifecycle {
                status: target,
                closed_at: Some(now),
                annulled_at: current.annulled_at,
                annul_reason: current.annul_reason.clone(),
            },
        })
    }

    /// Returns the trimmed reason, or the default one when blank.
    #[must_use]
    pub fn annul_reason(reason: Option<&str>) -> String {
        match reason.map(str::trim) {
            Some(r) if !r.is_empty() => r.to_string(),
            _ => DEFAULT_ANNUL_REASON.to_string(),
        }
    }

    /// Note recorded on the movement of a sold vehicle.
    #[must_use]
    pub fn sale_note(folio: &str) -> String {
        format!("Sale folio {}", folio.trim())
    }
}
