//! Shared types, configuration, and telemetry for Carlot.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Money rounding helpers with decimal precision
//! - Pagination types for list queries
//! - Configuration management
//! - Tracing subscriber initialization

pub mod config;
pub mod telemetry;
pub mod types;

pub use config::AppConfig;
