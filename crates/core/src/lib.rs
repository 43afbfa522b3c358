//! Core business rules for Carlot.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `purchase` - Purchase order state machine and validation
//! - `sale` - Sale lifecycle and voiding rules
//! - `inventory` - Inventory movements and vehicle stock status
//! - `audit` - Audit entries and before/after snapshots
//! - `users` - Account/profile validation and personnel numbers
//! - `auth` - Password hashing
//! - `amounts` - Money invariants and the resale markup

pub mod amounts;
pub mod audit;
pub mod auth;
pub mod error;
pub mod inventory;
pub mod purchase;
pub mod sale;
pub mod session;
pub mod users;

#[cfg(test)]
mod amounts_props;

pub use error::WorkflowError;
pub use session::ActorContext;
