//! Repository abstractions for data access.
//!
//! Every public workflow method opens exactly one transaction, runs all of
//! its reads, writes and audit inserts on it, and commits or rolls back as a
//! unit before returning.

pub mod audit;
pub mod auth;
pub mod inventory;
pub mod purchase_order;
pub mod sale;
pub mod user_management;

pub use audit::{AuditFilter, AuditLogRepository, AuditWriter};
pub use auth::AuthRepository;
pub use inventory::InventoryLedger;
pub use purchase_order::{PurchaseOrderRepository, PurchaseOrderSummary};
pub use sale::SaleRepository;
pub use user_management::UserManagementRepository;

use carlot_core::WorkflowError;
use chrono::Utc;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{DatabaseTransaction, DbErr};

/// Current time as stored in timestamp columns.
pub(crate) fn now() -> DateTimeWithTimeZone {
    Utc::now().into()
}

/// Maps a store failure into the workflow taxonomy.
pub(crate) fn db_error(err: DbErr) -> WorkflowError {
    WorkflowError::Persistence(err.to_string())
}

/// Commits on success; on failure rolls back explicitly and returns the error.
pub(crate) async fn finish<T>(
    txn: DatabaseTransaction,
    operation: &'static str,
    result: Result<T, WorkflowError>,
) -> Result<T, WorkflowError> {
    match result {
        Ok(value) => {
            txn.commit().await.map_err(db_error)?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = txn.rollback().await {
                tracing::error!(operation, error = %rollback_err, "rollback failed");
            }
            tracing::warn!(operation, code = err.error_code(), error = %err, "workflow rolled back");
            Err(err)
        }
    }
}
