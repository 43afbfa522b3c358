//! Purchase order workflow repository.
//!
//! Owns the CREATED → RECEIVED | CANCELLED state machine. Terminal
//! transitions are guarded updates (`WHERE status = 'CREATED'`) whose
//! affected-row count decides the winner of concurrent calls.

use carlot_core::amounts::markup_price;
use carlot_core::audit::{
    AuditAction, NewAuditEntry, PurchaseCreatedSnapshot, PurchaseEditSnapshot,
    PurchaseStatusSnapshot, entity, to_json,
};
use carlot_core::inventory::{
    MovementType, NewMovement, REF_PURCHASE_ORDER, VehicleStatus as CoreVehicleStatus,
};
use carlot_core::purchase::{
    NewPurchaseItem, NewPurchaseOrder, PurchaseOrderChange, PurchaseOrderService,
    PurchaseStatus as CorePurchaseStatus,
};
use carlot_core::{ActorContext, WorkflowError};
use carlot_shared::types::{PurchaseOrderId, SupplierId, VehicleId};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, NotSet,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

use super::audit::AuditWriter;
use super::inventory::InventoryLedger;
use super::{db_error, finish, now};
use crate::entities::{
    purchase_order, purchase_order_item,
    sea_orm_active_enums::{PurchaseStatus, VehicleStatus},
    supplier, vehicle,
};

/// A purchase order with its supplier's legal name.
#[derive(Debug, Clone)]
pub struct PurchaseOrderSummary {
    /// Order header.
    pub order: purchase_order::Model,
    /// Supplier name, if the supplier row still exists.
    pub supplier_name: Option<String>,
}

/// Purchase order workflow repository.
#[derive(Debug, Clone)]
pub struct PurchaseOrderRepository {
    db: DatabaseConnection,
}

impl PurchaseOrderRepository {
    /// Creates a new purchase order repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Places a purchase order with its items.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the order or items fail validation
    /// - the insert yields no generated id
    /// - a database operation fails
    pub async fn create(
        &self,
        actor: &ActorContext,
        order: NewPurchaseOrder,
        items: Vec<NewPurchaseItem>,
    ) -> Result<PurchaseOrderId, WorkflowError> {
        actor.require_authenticated()?;
        let amounts = PurchaseOrderService::validate_new(&order, &items)?;

        let txn = self.db.begin().await.map_err(db_error)?;
        let result: Result<PurchaseOrderId, WorkflowError> = async {
            let now = now();
            let header = purchase_order::ActiveModel {
                purchase_id: NotSet,
                supplier_id: Set(order.supplier_id.into_inner()),
                account_id: Set(actor.account_id.into_inner()),
                status: Set(PurchaseStatus::Created),
                subtotal: Set(amounts.subtotal),
                discount: Set(amounts.discount),
                taxes: Set(amounts.taxes),
                total: Set(amounts.total),
                expected_date: Set(order.expected_date),
                created_at: Set(now),
                updated_at: Set(now),
                received_at: Set(None),
                cancelled_at: Set(None),
                cancel_reason: Set(None),
            }
            .insert(&txn)
            .await
            .map_err(db_error)?;

            if header.purchase_id <= 0 {
                return Err(WorkflowError::Persistence(
                    "purchase order insert returned no id".to_string(),
                ));
            }
            let order_id = PurchaseOrderId::new(header.purchase_id);

            purchase_order_item::Entity::insert_many(items.iter().map(|item| {
                purchase_order_item::ActiveModel {
                    purchase_id: Set(header.purchase_id),
                    vehicle_id: Set(item.vehicle_id.into_inner()),
                    agreed_price: Set(item.agreed_price),
                }
            }))
            .exec_without_returning(&txn)
            .await
            .map_err(db_error)?;

            AuditWriter::record(
                &txn,
                NewAuditEntry::new(
                    actor.account_id,
                    AuditAction::Create,
                    entity::PURCHASE_ORDER,
                    header.purchase_id,
                    &actor.ip_address,
                )
                .after(to_json(&PurchaseCreatedSnapshot {
                    status: CorePurchaseStatus::Created,
                    supplier_id: order.supplier_id,
                })?),
            )
            .await?;

            Ok(order_id)
        }
        .await;

        let order_id = finish(txn, "purchase_order.create", result).await?;
        tracing::info!(
            purchase_id = order_id.into_inner(),
            items = items.len(),
            total = %amounts.total,
            "purchase order created"
        );
        Ok(order_id)
    }

    /// Receives an order: stock enters inventory at the marked-up price.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the order does not exist
    /// - the order is not CREATED
    /// - a referenced vehicle is missing
    /// - a referenced vehicle was already sold or written off
    /// - a database operation fails
    pub async fn receive(
        &self,
        actor: &ActorContext,
        order_id: PurchaseOrderId,
    ) -> Result<purchase_order::Model, WorkflowError> {
        actor.require_authenticated()?;

        let txn = self.db.begin().await.map_err(db_error)?;
        let result = receive_in(&txn, actor, order_id).await;
        let received = finish(txn, "purchase_order.receive", result).await?;

        tracing::info!(
            purchase_id = order_id.into_inner(),
            actor = actor.account_id.into_inner(),
            "purchase order received"
        );
        Ok(received)
    }

    /// Cancels an order that has not been received.
    ///
    /// A blank reason is replaced by a default one.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::IllegalState` if no CREATED order matched.
    pub async fn cancel(
        &self,
        actor: &ActorContext,
        order_id: PurchaseOrderId,
        reason: Option<&str>,
    ) -> Result<(), WorkflowError> {
        actor.require_authenticated()?;
        let reason = PurchaseOrderService::cancel_reason(reason);

        let txn = self.db.begin().await.map_err(db_error)?;
        let result: Result<(), WorkflowError> = async {
            let now = now();
            let updated = purchase_order::Entity::update_many()
                .col_expr(
                    purchase_order::Column::Status,
                    Expr::value(PurchaseStatus::Cancelled),
                )
                .col_expr(purchase_order::Column::CancelledAt, Expr::value(now))
                .col_expr(purchase_order::Column::UpdatedAt, Expr::value(now))
                .col_expr(
                    purchase_order::Column::CancelReason,
                    Expr::value(reason.clone()),
                )
                .filter(purchase_order::Column::PurchaseId.eq(order_id.into_inner()))
                .filter(purchase_order::Column::Status.eq(PurchaseStatus::Created))
                .exec(&txn)
                .await
                .map_err(db_error)?;

            if updated.rows_affected == 0 {
                return Err(WorkflowError::IllegalState(format!(
                    "only CREATED orders can be cancelled (order {order_id})"
                )));
            }

            record_status_change(&txn, actor, order_id, CorePurchaseStatus::Cancelled).await
        }
        .await;

        finish(txn, "purchase_order.cancel", result).await?;
        tracing::info!(
            purchase_id = order_id.into_inner(),
            reason = %reason,
            "purchase order cancelled"
        );
        Ok(())
    }

    /// Edits supplier, expected date and subtotal of a CREATED order.
    ///
    /// The total is recomputed from the stored discount and taxes.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the order does not exist
    /// - the order is not CREATED
    /// - the stored discount would exceed the new subtotal
    /// - a database operation fails
    pub async fn update(
        &self,
        actor: &ActorContext,
        change: PurchaseOrderChange,
    ) -> Result<purchase_order::Model, WorkflowError> {
        actor.require_authenticated()?;
        if !change.supplier_id.is_valid() {
            return Err(WorkflowError::validation("a supplier is required"));
        }

        let txn = self.db.begin().await.map_err(db_error)?;
        let result = update_in(&txn, actor, &change).await;
        let updated = finish(txn, "purchase_order.update", result).await?;

        tracing::info!(
            purchase_id = updated.purchase_id,
            total = %updated.total,
            "purchase order updated"
        );
        Ok(updated)
    }

    /// Finds an order by id.
    pub async fn find_by_id(
        &self,
        order_id: PurchaseOrderId,
    ) -> Result<Option<purchase_order::Model>, WorkflowError> {
        purchase_order::Entity::find_by_id(order_id.into_inner())
            .one(&self.db)
            .await
            .map_err(db_error)
    }

    /// Returns the items of an order.
    pub async fn items_of(
        &self,
        order_id: PurchaseOrderId,
    ) -> Result<Vec<purchase_order_item::Model>, WorkflowError> {
        purchase_order_item::Entity::find()
            .filter(purchase_order_item::Column::PurchaseId.eq(order_id.into_inner()))
            .order_by_asc(purchase_order_item::Column::VehicleId)
            .all(&self.db)
            .await
            .map_err(db_error)
    }

    /// Lists orders newest first with their supplier names.
    pub async fn list(&self) -> Result<Vec<PurchaseOrderSummary>, WorkflowError> {
        let rows = purchase_order::Entity::find()
            .find_also_related(supplier::Entity)
            .order_by_desc(purchase_order::Column::CreatedAt)
            .order_by_desc(purchase_order::Column::PurchaseId)
            .all(&self.db)
            .await
            .map_err(db_error)?;

        Ok(rows
            .into_iter()
            .map(|(order, supplier)| PurchaseOrderSummary {
                order,
                supplier_name: supplier.map(|s| s.legal_name),
            })
            .collect())
    }
}

async fn load_order(
    txn: &DatabaseTransaction,
    order_id: PurchaseOrderId,
) -> Result<purchase_order::Model, WorkflowError> {
    purchase_order::Entity::find_by_id(order_id.into_inner())
        .one(txn)
        .await
        .map_err(db_error)?
        .ok_or_else(|| WorkflowError::not_found(entity::PURCHASE_ORDER, order_id))
}

async fn receive_in(
    txn: &DatabaseTransaction,
    actor: &ActorContext,
    order_id: PurchaseOrderId,
) -> Result<purchase_order::Model, WorkflowError> {
    let order = load_order(txn, order_id).await?;
    PurchaseOrderService::transition(order.status.into(), CorePurchaseStatus::Received)?;

    let now = now();
    let updated = purchase_order::Entity::update_many()
        .col_expr(
            purchase_order::Column::Status,
            Expr::value(PurchaseStatus::Received),
        )
        .col_expr(purchase_order::Column::ReceivedAt, Expr::value(now))
        .col_expr(purchase_order::Column::UpdatedAt, Expr::value(now))
        .filter(purchase_order::Column::PurchaseId.eq(order_id.into_inner()))
        .filter(purchase_order::Column::Status.eq(PurchaseStatus::Created))
        .exec(txn)
        .await
        .map_err(db_error)?;
    if updated.rows_affected == 0 {
        return Err(WorkflowError::IllegalState(
            "only CREATED orders can be received".to_string(),
        ));
    }

    let items = purchase_order_item::Entity::find()
        .filter(purchase_order_item::Column::PurchaseId.eq(order_id.into_inner()))
        .all(txn)
        .await
        .map_err(db_error)?;

    let note = PurchaseOrderService::intake_note(SupplierId::new(order.supplier_id));
    for item in &items {
        let vehicle_id = VehicleId::new(item.vehicle_id);
        let current = vehicle::Entity::find_by_id(item.vehicle_id)
            .one(txn)
            .await
            .map_err(db_error)?
            .ok_or_else(|| {
                WorkflowError::Persistence(format!(
                    "vehicle {vehicle_id} on order {order_id} does not exist"
                ))
            })?;
        if CoreVehicleStatus::from(current.status).has_left_stock() {
            return Err(WorkflowError::IllegalState(format!(
                "vehicle {vehicle_id} on order {order_id} has already left stock"
            )));
        }

        InventoryLedger::append(
            txn,
            NewMovement::referencing(
                vehicle_id,
                MovementType::Intake,
                REF_PURCHASE_ORDER,
                order_id.into_inner(),
                note.clone(),
                actor.account_id,
            ),
        )
        .await?;

        let stocked = vehicle::Entity::update_many()
            .col_expr(vehicle::Column::Status, Expr::value(VehicleStatus::Available))
            .col_expr(
                vehicle::Column::Price,
                Expr::value(markup_price(item.agreed_price)),
            )
            .col_expr(vehicle::Column::UpdatedAt, Expr::value(now))
            .filter(vehicle::Column::VehicleId.eq(item.vehicle_id))
            .filter(vehicle::Column::Status.is_not_in([VehicleStatus::Sold, VehicleStatus::WrittenOff]))
            .exec(txn)
            .await
            .map_err(db_error)?;
        if stocked.rows_affected == 0 {
            return Err(WorkflowError::IllegalState(format!(
                "vehicle {vehicle_id} on order {order_id} has already left stock"
            )));
        }
    }

    record_status_change(txn, actor, order_id, CorePurchaseStatus::Received).await?;
    load_order(txn, order_id).await
}

async fn update_in(
    txn: &DatabaseTransaction,
    actor: &ActorContext,
    change: &PurchaseOrderChange,
) -> Result<purchase_order::Model, WorkflowError> {
    let order_id = change.purchase_id;
    let before = load_order(txn, order_id).await?;
    PurchaseOrderService::ensure_editable(before.status.into())?;

    let amounts =
        PurchaseOrderService::revised_amounts(change.subtotal, before.discount, before.taxes)?;

    let updated = purchase_order::Entity::update_many()
        .col_expr(
            purchase_order::Column::SupplierId,
            Expr::value(change.supplier_id.into_inner()),
        )
        .col_expr(
            purchase_order::Column::ExpectedDate,
            Expr::value(change.expected_date),
        )
        .col_expr(purchase_order::Column::Subtotal, Expr::value(amounts.subtotal))
        .col_expr(purchase_order::Column::Total, Expr::value(amounts.total))
        .col_expr(purchase_order::Column::UpdatedAt, Expr::value(now()))
        .filter(purchase_order::Column::PurchaseId.eq(order_id.into_inner()))
        .filter(purchase_order::Column::Status.eq(PurchaseStatus::Created))
        .exec(txn)
        .await
        .map_err(db_error)?;
    if updated.rows_affected == 0 {
        return Err(WorkflowError::IllegalState(
            "only CREATED orders can be updated".to_string(),
        ));
    }

    let after = load_order(txn, order_id).await?;

    AuditWriter::record(
        txn,
        NewAuditEntry::new(
            actor.account_id,
            AuditAction::Update,
            entity::PURCHASE_ORDER,
            order_id.into_inner(),
            &actor.ip_address,
        )
        .before(to_json(&edit_snapshot(&before))?)
        .after(to_json(&edit_snapshot(&after))?),
    )
    .await?;

    Ok(after)
}

async fn record_status_change(
    txn: &DatabaseTransaction,
    actor: &ActorContext,
    order_id: PurchaseOrderId,
    status: CorePurchaseStatus,
) -> Result<(), WorkflowError> {
    AuditWriter::record(
        txn,
        NewAuditEntry::new(
            actor.account_id,
            AuditAction::Update,
            entity::PURCHASE_ORDER,
            order_id.into_inner(),
            &actor.ip_address,
        )
        .before(to_json(&PurchaseStatusSnapshot {
            status: CorePurchaseStatus::Created,
        })?)
        .after(to_json(&PurchaseStatusSnapshot { status })?),
    )
    .await?;
    Ok(())
}

fn edit_snapshot(order: &purchase_order::Model) -> PurchaseEditSnapshot {
    PurchaseEditSnapshot {
        supplier_id: SupplierId::new(order.supplier_id),
        expected_date: order.expected_date,
        subtotal: order.subtotal,
        total: order.total,
    }
}
