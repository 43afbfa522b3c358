//! Account and user profile types.

use carlot_shared::types::AccountId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of a login account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountRole {
    /// Manages users, writes off stock.
    Administrator,
    /// Sales floor and purchasing staff.
    Employee,
}

impl AccountRole {
    /// Returns the stored representation of the role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Administrator => "ADMINISTRATOR",
            Self::Employee => "EMPLOYEE",
        }
    }

    /// Parses a role, accepting the short `ADMIN` alias.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "ADMINISTRATOR" | "ADMIN" => Some(Self::Administrator),
            "EMPLOYEE" => Some(Self::Employee),
            _ => None,
        }
    }

    /// Returns true for administrators.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Administrator)
    }

    /// Personnel number prefix for accounts with this role.
    #[must_use]
    pub const fn personnel_prefix(&self) -> char {
        match self {
            Self::Administrator => 'A',
            Self::Employee => 'V',
        }
    }
}

impl fmt::Display for AccountRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Login account fields supplied on create or update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountInput {
    /// Login email, stored trimmed and lower-cased.
    pub email: String,
    /// Role granted to the account.
    pub role: AccountRole,
    /// Whether the account may log in.
    pub is_active: bool,
}

/// User profile fields supplied on create or update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInput {
    /// Unique short login name.
    pub username: String,
    /// Display name.
    pub full_name: String,
    /// Phone as typed; normalized before storage.
    pub phone: String,
}

/// Changes to an existing account and its profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserChange {
    /// Personnel number of the user being edited.
    pub personnel_number: String,
    /// New account fields.
    pub account: AccountInput,
    /// New profile fields.
    pub user: UserInput,
}

/// A user joined with its account, as listed to administrators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    /// Primary key of the user profile.
    pub personnel_number: String,
    /// Owning account.
    pub account_id: AccountId,
    /// Unique short login name.
    pub username: String,
    /// Display name.
    pub full_name: String,
    /// Normalized phone.
    pub phone: String,
    /// Login email.
    pub email: String,
    /// Account role.
    pub role: AccountRole,
    /// Whether the account may log in.
    pub is_active: bool,
}
