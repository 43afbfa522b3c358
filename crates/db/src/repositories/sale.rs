//! Sale workflow repository.
//!
//! Recording a sale takes the vehicle out of stock and logs a SALE
//! movement in the same transaction as the sale row and its audit entry.

use carlot_core::amounts::Amounts;
use carlot_core::audit::{AuditAction, NewAuditEntry, SaleSnapshot, entity, to_json};
use carlot_core::inventory::{
    InventoryService, MovementType, NewMovement, REF_SALE, VehicleStatus as CoreVehicleStatus,
};
use carlot_core::sale::{
    NewSale, SaleChange, SaleLifecycle, SaleService, SaleStatus as CoreSaleStatus,
};
use carlot_core::{ActorContext, WorkflowError};
use carlot_shared::types::{SaleId, VehicleId};
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, NotSet,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

use super::audit::AuditWriter;
use super::inventory::InventoryLedger;
use super::{db_error, finish, now};
use crate::entities::{
    sale,
    sea_orm_active_enums::{SaleStatus, VehicleStatus},
    vehicle,
};

/// Sale workflow repository.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    db: DatabaseConnection,
}

impl SaleRepository {
    /// Creates a new sale repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a sale, marks the vehicle SOLD and logs the movement.
    ///
    /// The acting account is the seller.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the sale fails validation or the folio is taken
    /// - the vehicle does not exist
    /// - the vehicle is already sold or written off
    /// - a database operation fails
    pub async fn create_with_inventory_and_audit(
        &self,
        actor: &ActorContext,
        new_sale: NewSale,
    ) -> Result<SaleId, WorkflowError> {
        actor.require_authenticated()?;
        let amounts = SaleService::validate_new(&new_sale)?;

        let txn = self.db.begin().await.map_err(db_error)?;
        let result = create_in(&txn, actor, &new_sale, &amounts).await;
        let sale_id = finish(txn, "sale.create", result).await?;

        tracing::info!(
            sale_id = sale_id.into_inner(),
            folio = %new_sale.folio.trim(),
            vehicle_id = new_sale.vehicle_id.into_inner(),
            seller = actor.account_id.into_inner(),
            "sale recorded"
        );
        Ok(sale_id)
    }

    /// Re-saves a sale, voiding it when the target status is VOIDED.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the amounts break the total identity
    /// - the sale does not exist
    /// - the sale is already voided
    /// - a database operation fails
    pub async fn update_with_audit(
        &self,
        actor: &ActorContext,
        change: SaleChange,
    ) -> Result<sale::Model, WorkflowError> {
        actor.require_authenticated()?;
        SaleService::validate_change(&change)?;

        let txn = self.db.begin().await.map_err(db_error)?;
        let result = update_in(&txn, actor, &change).await;
        let updated = finish(txn, "sale.update", result).await?;

        tracing::info!(
            sale_id = updated.sale_id,
            status = ?updated.status,
            "sale updated"
        );
        Ok(updated)
    }

    /// Voids a sale, keeping its customer and amounts.
    ///
    /// # Errors
    ///
    /// Same as [`Self::update_with_audit`].
    pub async fn void(
        &self,
        actor: &ActorContext,
        sale_id: SaleId,
        reason: Option<&str>,
    ) -> Result<sale::Model, WorkflowError> {
        actor.require_authenticated()?;

        let txn = self.db.begin().await.map_err(db_error)?;
        let result: Result<sale::Model, WorkflowError> = async {
            let current = load_sale(&txn, sale_id).await?;
            let change = SaleChange {
                sale_id,
                customer_number: current.customer_number,
                status: CoreSaleStatus::Voided,
                subtotal: current.subtotal,
                discount: current.discount,
                taxes: current.taxes,
                total: Some(current.total),
                annul_reason: reason.map(str::to_string),
            };
            update_in(&txn, actor, &change).await
        }
        .await;
        let voided = finish(txn, "sale.void", result).await?;

        tracing::info!(sale_id = voided.sale_id, "sale voided");
        Ok(voided)
    }

    /// Finds a sale by id.
    pub async fn find_by_id(&self, sale_id: SaleId) -> Result<Option<sale::Model>, WorkflowError> {
        sale::Entity::find_by_id(sale_id.into_inner())
            .one(&self.db)
            .await
            .map_err(db_error)
    }

    /// Finds a sale by its receipt number.
    pub async fn find_by_folio(&self, folio: &str) -> Result<Option<sale::Model>, WorkflowError> {
        sale::Entity::find()
            .filter(sale::Column::Folio.eq(folio.trim()))
            .one(&self.db)
            .await
            .map_err(db_error)
    }

    /// Lists sales newest first.
    pub async fn list(&self) -> Result<Vec<sale::Model>, WorkflowError> {
        sale::Entity::find()
            .order_by_desc(sale::Column::CreatedAt)
            .order_by_desc(sale::Column::SaleId)
            .all(&self.db)
            .await
            .map_err(db_error)
    }
}

async fn load_sale(txn: &DatabaseTransaction, sale_id: SaleId) -> Result<sale::Model, WorkflowError> {
    sale::Entity::find_by_id(sale_id.into_inner())
        .one(txn)
        .await
        .map_err(db_error)?
        .ok_or_else(|| WorkflowError::not_found(entity::SALE, sale_id))
}

async fn create_in(
    txn: &DatabaseTransaction,
    actor: &ActorContext,
    new_sale: &NewSale,
    amounts: &Amounts,
) -> Result<SaleId, WorkflowError> {
    let folio = new_sale.folio.trim().to_string();

    let taken = sale::Entity::find()
        .filter(sale::Column::Folio.eq(folio.as_str()))
        .one(txn)
        .await
        .map_err(db_error)?;
    if taken.is_some() {
        return Err(WorkflowError::Validation(format!(
            "folio {folio} is already in use"
        )));
    }

    let now = now();
    let status = new_sale.status.unwrap_or(CoreSaleStatus::Completed);
    let row = sale::ActiveModel {
        sale_id: NotSet,
        folio: Set(folio.clone()),
        vehicle_id: Set(new_sale.vehicle_id.into_inner()),
        customer_number: Set(new_sale.customer_number.trim().to_string()),
        seller_account_id: Set(actor.account_id.into_inner()),
        status: Set(status.into()),
        subtotal: Set(amounts.subtotal),
        discount: Set(amounts.discount),
        taxes: Set(amounts.taxes),
        total: Set(amounts.total),
        created_at: Set(now),
        closed_at: Set(Some(now)),
        annulled_at: Set(None),
        annul_reason: Set(None),
    }
    .insert(txn)
    .await
    .map_err(db_error)?;

    if row.sale_id <= 0 {
        return Err(WorkflowError::Persistence(
            "sale insert returned no id".to_string(),
        ));
    }
    let sale_id = SaleId::new(row.sale_id);

    mark_sold(txn, new_sale.vehicle_id).await?;

    InventoryLedger::append(
        txn,
        NewMovement::referencing(
            new_sale.vehicle_id,
            MovementType::Sale,
            REF_SALE,
            row.sale_id,
            SaleService::sale_note(&folio),
            actor.account_id,
        ),
    )
    .await?;

    AuditWriter::record(
        txn,
        NewAuditEntry::new(
            actor.account_id,
            AuditAction::Create,
            entity::SALE,
            row.sale_id,
            &actor.ip_address,
        )
        .after(to_json(&snapshot(&row))?),
    )
    .await?;

    Ok(sale_id)
}

async fn mark_sold(txn: &DatabaseTransaction, vehicle_id: VehicleId) -> Result<(), WorkflowError> {
    let updated = vehicle::Entity::update_many()
        .col_expr(vehicle::Column::Status, Expr::value(VehicleStatus::Sold))
        .col_expr(vehicle::Column::UpdatedAt, Expr::value(now()))
        .filter(vehicle::Column::VehicleId.eq(vehicle_id.into_inner()))
        .filter(vehicle::Column::Status.eq(VehicleStatus::Available))
        .exec(txn)
        .await
        .map_err(db_error)?;
    if updated.rows_affected > 0 {
        return Ok(());
    }

    let existing = vehicle::Entity::find_by_id(vehicle_id.into_inner())
        .one(txn)
        .await
        .map_err(db_error)?;
    match existing {
        None => Err(WorkflowError::Persistence(format!(
            "vehicle {vehicle_id} does not exist"
        ))),
        Some(found) => {
            InventoryService::ensure_sellable(CoreVehicleStatus::from(found.status))?;
            Err(WorkflowError::IllegalState(format!(
                "vehicle {vehicle_id} could not be marked as sold"
            )))
        }
    }
}

async fn update_in(
    txn: &DatabaseTransaction,
    actor: &ActorContext,
    change: &SaleChange,
) -> Result<sale::Model, WorkflowError> {
    let amounts = SaleService::validate_change(change)?;
    let before = load_sale(txn, change.sale_id).await?;

    let current = SaleLifecycle {
        status: before.status.into(),
        closed_at: before.closed_at.map(|t| t.with_timezone(&Utc)),
        annulled_at: before.annulled_at.map(|t| t.with_timezone(&Utc)),
        annul_reason: before.annul_reason.clone(),
    };
    let next = SaleService::plan_update(
        &current,
        change.status,
        change.annul_reason.as_deref(),
        Utc::now(),
    )?;

    let updated = sale::Entity::update_many()
        .col_expr(
            sale::Column::CustomerNumber,
            Expr::value(change.customer_number.trim().to_string()),
        )
        .col_expr(sale::Column::Status, Expr::value(SaleStatus::from(next.status)))
        .col_expr(sale::Column::Subtotal, Expr::value(amounts.subtotal))
        .col_expr(sale::Column::Discount, Expr::value(amounts.discount))
        .col_expr(sale::Column::Taxes, Expr::value(amounts.taxes))
        .col_expr(sale::Column::Total, Expr::value(amounts.total))
        .col_expr(
            sale::Column::ClosedAt,
            Expr::value(next.closed_at.map(|t| t.fixed_offset())),
        )
        .col_expr(
            sale::Column::AnnulledAt,
            Expr::value(next.annulled_at.map(|t| t.fixed_offset())),
        )
        .col_expr(sale::Column::AnnulReason, Expr::value(next.annul_reason))
        .filter(sale::Column::SaleId.eq(before.sale_id))
        .filter(sale::Column::Status.eq(before.status))
        .exec(txn)
        .await
        .map_err(db_error)?;
    if updated.rows_affected == 0 {
        return Err(WorkflowError::IllegalState(format!(
            "sale {} changed status concurrently",
            change.sale_id
        )));
    }

    let after = load_sale(txn, change.sale_id).await?;

    AuditWriter::record(
        txn,
        NewAuditEntry::new(
            actor.account_id,
            AuditAction::Update,
            entity::SALE,
            after.sale_id,
            &actor.ip_address,
        )
        .before(to_json(&snapshot(&before))?)
        .after(to_json(&snapshot(&after))?),
    )
    .await?;

    Ok(after)
}

fn snapshot(row: &sale::Model) -> SaleSnapshot {
    SaleSnapshot {
        folio: row.folio.clone(),
        status: row.status.into(),
        subtotal: row.subtotal,
        discount: row.discount,
        taxes: row.taxes,
        total: row.total,
    }
}
