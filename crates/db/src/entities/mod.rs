//! `SeaORM` entity definitions.

pub mod account;
pub mod audit_log;
pub mod customer;
pub mod inventory_movement;
pub mod purchase_order;
pub mod purchase_order_item;
pub mod sale;
pub mod sea_orm_active_enums;
pub mod supplier;
pub mod user;
pub mod vehicle;
