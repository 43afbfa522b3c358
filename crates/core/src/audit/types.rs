//! Audit log entry types.

use carlot_shared::types::AccountId;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::WorkflowError;

/// Logical entity names recorded in the audit log.
pub mod entity {
    /// Purchase order header.
    pub const PURCHASE_ORDER: &str = "purchase_order";
    /// Sale.
    pub const SALE: &str = "sale";
    /// Vehicle stock record.
    pub const VEHICLE: &str = "vehicle";
    /// Login account.
    pub const ACCOUNT: &str = "account";
    /// User profile.
    pub const USER: &str = "user";
}

/// Kind of audited mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    /// Row inserted.
    Create,
    /// Row changed.
    Update,
    /// Row logically deleted.
    Delete,
    /// Login attempt.
    Login,
    /// Logout.
    Logout,
}

impl AuditAction {
    /// Returns the stored representation of the action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Login => "LOGIN",
            Self::Logout => "LOGOUT",
        }
    }

    /// Parses an action from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "CREATE" => Some(Self::Create),
            "UPDATE" => Some(Self::Update),
            "DELETE" => Some(Self::Delete),
            "LOGIN" => Some(Self::Login),
            "LOGOUT" => Some(Self::Logout),
            _ => None,
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An audit entry about to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAuditEntry {
    /// Acting account; absent only for failed logins.
    pub account_id: Option<AccountId>,
    /// Kind of mutation.
    pub action: AuditAction,
    /// Logical table name.
    pub entity: String,
    /// Key of the affected row.
    pub entity_id: i32,
    /// JSON snapshot before the change.
    pub before_data: Option<String>,
    /// JSON snapshot after the change.
    pub after_data: Option<String>,
    /// Client address.
    pub ip_address: String,
}

impl NewAuditEntry {
    /// Starts an entry for an action taken by `account_id`.
    pub fn new(
        account_id: AccountId,
        action: AuditAction,
        entity: &str,
        entity_id: i32,
        ip_address: &str,
    ) -> Self {
        Self {
            account_id: Some(account_id),
            action,
            entity: entity.to_string(),
            entity_id,
            before_data: None,
            after_data: None,
            ip_address: ip_address.to_string(),
        }
    }

    /// Starts an entry with no acting account (a failed login).
    pub fn anonymous(action: AuditAction, entity: &str, entity_id: i32, ip_address: &str) -> Self {
        Self {
            account_id: None,
            action,
            entity: entity.to_string(),
            entity_id,
            before_data: None,
            after_data: None,
            ip_address: ip_address.to_string(),
        }
    }

    /// Sets the before snapshot.
    #[must_use]
    pub fn before(mut self, json: String) -> Self {
        self.before_data = Some(json);
        self
    }

    /// Sets the after snapshot.
    #[must_use]
    pub fn after(mut self, json: String) -> Self {
        self.after_data = Some(json);
        self
    }

    /// Checks the entry before it is written.
    ///
    /// Only LOGIN entries may omit the account.
    pub fn validate(&self) -> Result<(), WorkflowError> {
        if self.entity.trim().is_empty() {
            return Err(WorkflowError::validation("audit entity is required"));
        }
        match self.account_id {
            None if self.action != AuditAction::Login => Err(WorkflowError::Validation(format!(
                "{} audit entries require an account",
                self.action
            ))),
            Some(id) if !id.is_valid() => Err(WorkflowError::validation(
                "audit account id must be positive",
            )),
            _ => Ok(()),
        }
    }
}
