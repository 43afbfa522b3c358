//! Account and user profile rules.
//!
//! # Modules
//!
//! - `types` - Roles and account/profile inputs
//! - `validation` - Field rules checked before any I/O
//! - `personnel` - Sequential personnel numbers per role

pub mod personnel;
pub mod types;
pub mod validation;

pub use personnel::{next_personnel_number, prefix_pattern};
pub use types::{AccountInput, AccountRole, UserAccount, UserChange, UserInput};
pub use validation::{ValidatedProfile, validate_password_strength, validate_profile};
