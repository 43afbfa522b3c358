//! Explicit actor context passed into every workflow call.

use carlot_shared::types::AccountId;
use serde::{Deserialize, Serialize};

use crate::error::WorkflowError;
use crate::users::AccountRole;

/// Who is performing an operation, and from where.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorContext {
    /// Authenticated account performing the operation.
    pub account_id: AccountId,
    /// Role of that account at login time.
    pub role: AccountRole,
    /// Client address recorded on audit entries.
    pub ip_address: String,
}

impl ActorContext {
    /// Creates a new actor context.
    pub fn new(account_id: AccountId, role: AccountRole, ip_address: impl Into<String>) -> Self {
        Self {
            account_id,
            role,
            ip_address: ip_address.into(),
        }
    }

    /// Fails unless the actor carries a valid account id.
    pub fn require_authenticated(&self) -> Result<(), WorkflowError> {
        if self.account_id.is_valid() {
            Ok(())
        } else {
            Err(WorkflowError::Permission(
                "an authenticated account is required".to_string(),
            ))
        }
    }

    /// Fails unless the actor is an authenticated administrator.
    pub fn require_admin(&self) -> Result<(), WorkflowError> {
        self.require_authenticated()?;
        if self.role.is_admin() {
            Ok(())
        } else {
            Err(WorkflowError::Permission(format!(
                "account {} is not an administrator",
                self.account_id
            )))
        }
    }
}
