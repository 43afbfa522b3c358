//! Sale lifecycle.
//!
//! # Modules
//!
//! - `types` - SaleStatus and sale inputs
//! - `service` - Validation and lifecycle derivation

pub mod service;
pub mod types;

pub use service::{DEFAULT_ANNUL_REASON, SaleService};
pub use types::{NewSale, SaleChange, SaleLifecycle, SaleStatus};
