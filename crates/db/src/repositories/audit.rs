//! Audit log writer and queries.
//!
//! The writer only accepts an open `DatabaseTransaction`, so an audit entry
//! can never commit separately from the mutation it documents.

use carlot_core::WorkflowError;
use carlot_core::audit::{AuditAction, NewAuditEntry};
use carlot_shared::types::{AccountId, AuditId, PageRequest, PageResponse};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    NotSet, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

use super::{db_error, now};
use crate::entities::audit_log;

/// Appends audit entries inside the caller's transaction.
pub struct AuditWriter;

impl AuditWriter {
    /// Inserts one audit row on `txn`.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Validation` if a non-login entry has no
    /// account, or `WorkflowError::Persistence` if the insert fails.
    pub async fn record(
        txn: &DatabaseTransaction,
        entry: NewAuditEntry,
    ) -> Result<AuditId, WorkflowError> {
        entry.validate()?;

        let row = audit_log::ActiveModel {
            audit_id: NotSet,
            account_id: Set(entry.account_id.map(AccountId::into_inner)),
            action: Set(entry.action.into()),
            entity: Set(entry.entity),
            entity_id: Set(entry.entity_id),
            before_data: Set(entry.before_data),
            after_data: Set(entry.after_data),
            ip_address: Set(entry.ip_address),
            created_at: Set(now()),
        }
        .insert(txn)
        .await
        .map_err(db_error)?;

        tracing::debug!(
            audit_id = row.audit_id,
            entity = %row.entity,
            entity_id = row.entity_id,
            "audit entry recorded"
        );
        Ok(AuditId::new(row.audit_id))
    }
}

/// Filter for audit log listings.
#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    /// Only entries for this logical entity.
    pub entity: Option<String>,
    /// Only entries with this action.
    pub action: Option<AuditAction>,
    /// Only entries by this account.
    pub account_id: Option<AccountId>,
}

/// Read side of the audit log.
#[derive(Debug, Clone)]
pub struct AuditLogRepository {
    db: DatabaseConnection,
}

impl AuditLogRepository {
    /// Creates a new audit log repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Returns the history of one entity, oldest first.
    pub async fn for_entity(
        &self,
        entity: &str,
        entity_id: i32,
    ) -> Result<Vec<audit_log::Model>, WorkflowError> {
        audit_log::Entity::find()
            .filter(audit_log::Column::Entity.eq(entity))
            .filter(audit_log::Column::EntityId.eq(entity_id))
            .order_by_asc(audit_log::Column::CreatedAt)
            .order_by_asc(audit_log::Column::AuditId)
            .all(&self.db)
            .await
            .map_err(db_error)
    }

    /// Lists entries matching `filter`, newest first.
    pub async fn list(
        &self,
        filter: &AuditFilter,
        page: &PageRequest,
    ) -> Result<PageResponse<audit_log::Model>, WorkflowError> {
        let mut query = audit_log::Entity::find();

        if let Some(entity) = &filter.entity {
            query = query.filter(audit_log::Column::Entity.eq(entity.as_str()));
        }
        if let Some(action) = filter.action {
            query = query.filter(
                audit_log::Column::Action
                    .eq(crate::entities::sea_orm_active_enums::AuditAction::from(action)),
            );
        }
        if let Some(account_id) = filter.account_id {
            query = query.filter(audit_log::Column::AccountId.eq(account_id.into_inner()));
        }

        let total = query.clone().count(&self.db).await.map_err(db_error)?;

        let data = query
            .order_by_desc(audit_log::Column::CreatedAt)
            .order_by_desc(audit_log::Column::AuditId)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .map_err(db_error)?;

        Ok(PageResponse::new(data, page.page, page.per_page, total))
    }
}
