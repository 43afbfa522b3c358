//! `SeaORM` Entity for audit_log table.
//!
//! Rows are append-only. `before_data` and `after_data` hold JSON text.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::AuditAction;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "audit_log")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub audit_id: i32,
    pub account_id: Option<i32>,
    pub action: AuditAction,
    pub entity: String,
    pub entity_id: i32,
    #[sea_orm(column_type = "Text", nullable)]
    pub before_data: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub after_data: Option<String>,
    pub ip_address: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
