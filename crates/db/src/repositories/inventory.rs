//! Inventory movement ledger and vehicle write-offs.

use carlot_core::audit::{
    AuditAction, NewAuditEntry, VehicleStatusSnapshot, entity, to_json,
};
use carlot_core::inventory::{
    InventoryService, MovementType, NewMovement, REF_VEHICLE, VehicleStatus as CoreVehicleStatus,
};
use carlot_core::{ActorContext, WorkflowError};
use carlot_shared::types::{MovementId, VehicleId};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, NotSet, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use super::audit::AuditWriter;
use super::{db_error, finish, now};
use crate::entities::{inventory_movement, sea_orm_active_enums::VehicleStatus, vehicle};

/// Append-only log of stock-affecting events.
#[derive(Debug, Clone)]
pub struct InventoryLedger {
    db: DatabaseConnection,
}

impl InventoryLedger {
    /// Creates a new inventory ledger.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Inserts one movement on `conn` and returns its id.
    ///
    /// Works on a pool connection or inside an open transaction.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Validation` if the vehicle or account id is
    /// not positive, or `WorkflowError::Persistence` if the insert fails.
    pub async fn append<C: ConnectionTrait>(
        conn: &C,
        movement: NewMovement,
    ) -> Result<MovementId, WorkflowError> {
        InventoryService::validate_movement(&movement)?;

        let row = inventory_movement::ActiveModel {
            movement_id: NotSet,
            vehicle_id: Set(movement.vehicle_id.into_inner()),
            movement_type: Set(movement.movement_type.into()),
            ref_table: Set(movement.ref_table),
            ref_id: Set(movement.ref_id),
            note: Set(movement.note),
            account_id: Set(movement.account_id.into_inner()),
            created_at: Set(now()),
        }
        .insert(conn)
        .await
        .map_err(db_error)?;

        Ok(MovementId::new(row.movement_id))
    }

    /// Appends a movement in its own transaction.
    pub async fn record(&self, movement: NewMovement) -> Result<MovementId, WorkflowError> {
        Self::append(&self.db, movement).await
    }

    /// Returns every movement of a vehicle, oldest first.
    pub async fn by_vehicle(
        &self,
        vehicle_id: VehicleId,
    ) -> Result<Vec<inventory_movement::Model>, WorkflowError> {
        inventory_movement::Entity::find()
            .filter(inventory_movement::Column::VehicleId.eq(vehicle_id.into_inner()))
            .order_by_asc(inventory_movement::Column::CreatedAt)
            .order_by_asc(inventory_movement::Column::MovementId)
            .all(&self.db)
            .await
            .map_err(db_error)
    }

    /// Returns the movements of one type for a vehicle, oldest first.
    pub async fn by_vehicle_and_type(
        &self,
        vehicle_id: VehicleId,
        movement_type: MovementType,
    ) -> Result<Vec<inventory_movement::Model>, WorkflowError> {
        inventory_movement::Entity::find()
            .filter(inventory_movement::Column::VehicleId.eq(vehicle_id.into_inner()))
            .filter(
                inventory_movement::Column::MovementType
                    .eq(crate::entities::sea_orm_active_enums::MovementType::from(movement_type)),
            )
            .order_by_asc(inventory_movement::Column::CreatedAt)
            .order_by_asc(inventory_movement::Column::MovementId)
            .all(&self.db)
            .await
            .map_err(db_error)
    }

    /// Returns the most recent movement of a vehicle.
    pub async fn last_by_vehicle(
        &self,
        vehicle_id: VehicleId,
    ) -> Result<Option<inventory_movement::Model>, WorkflowError> {
        inventory_movement::Entity::find()
            .filter(inventory_movement::Column::VehicleId.eq(vehicle_id.into_inner()))
            .order_by_desc(inventory_movement::Column::CreatedAt)
            .order_by_desc(inventory_movement::Column::MovementId)
            .one(&self.db)
            .await
            .map_err(db_error)
    }

    /// Finds a movement by id.
    pub async fn find_by_id(
        &self,
        movement_id: MovementId,
    ) -> Result<Option<inventory_movement::Model>, WorkflowError> {
        inventory_movement::Entity::find_by_id(movement_id.into_inner())
            .one(&self.db)
            .await
            .map_err(db_error)
    }

    /// Lists every movement, newest first.
    pub async fn list(&self) -> Result<Vec<inventory_movement::Model>, WorkflowError> {
        inventory_movement::Entity::find()
            .order_by_desc(inventory_movement::Column::CreatedAt)
            .order_by_desc(inventory_movement::Column::MovementId)
            .all(&self.db)
            .await
            .map_err(db_error)
    }

    /// Removes a vehicle from stock.
    ///
    /// Administrator only. Sets the vehicle to WRITTEN_OFF, appends a
    /// WRITE_OFF movement and one UPDATE audit entry in one transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the actor is not an administrator
    /// - the vehicle does not exist
    /// - the vehicle is already sold or written off
    /// - a database operation fails
    pub async fn write_off_vehicle(
        &self,
        actor: &ActorContext,
        vehicle_id: VehicleId,
        note: Option<&str>,
    ) -> Result<MovementId, WorkflowError> {
        actor.require_admin()?;

        let txn = self.db.begin().await.map_err(db_error)?;
        let result = write_off_in(&txn, actor, vehicle_id, note).await;
        let movement_id = finish(txn, "inventory.write_off_vehicle", result).await?;

        tracing::info!(
            vehicle_id = vehicle_id.into_inner(),
            movement_id = movement_id.into_inner(),
            actor = actor.account_id.into_inner(),
            "vehicle written off"
        );
        Ok(movement_id)
    }
}

async fn write_off_in(
    txn: &DatabaseTransaction,
    actor: &ActorContext,
    vehicle_id: VehicleId,
    note: Option<&str>,
) -> Result<MovementId, WorkflowError> {
    let current = vehicle::Entity::find_by_id(vehicle_id.into_inner())
        .one(txn)
        .await
        .map_err(db_error)?
        .ok_or_else(|| WorkflowError::not_found(entity::VEHICLE, vehicle_id))?;

    let status = CoreVehicleStatus::from(current.status);
    InventoryService::ensure_write_off(status)?;

    let updated = vehicle::Entity::update_many()
        .col_expr(vehicle::Column::Status, Expr::value(VehicleStatus::WrittenOff))
        .col_expr(vehicle::Column::UpdatedAt, Expr::value(now()))
        .filter(vehicle::Column::VehicleId.eq(vehicle_id.into_inner()))
        .filter(vehicle::Column::Status.eq(current.status))
        .exec(txn)
        .await
        .map_err(db_error)?;
    if updated.rows_affected == 0 {
        return Err(WorkflowError::IllegalState(format!(
            "vehicle {vehicle_id} changed status concurrently"
        )));
    }

    let movement_id = InventoryLedger::append(
        txn,
        NewMovement::referencing(
            vehicle_id,
            MovementType::WriteOff,
            REF_VEHICLE,
            vehicle_id.into_inner(),
            InventoryService::write_off_note(note),
            actor.account_id,
        ),
    )
    .await?;

    AuditWriter::record(
        txn,
        NewAuditEntry::new(
            actor.account_id,
            AuditAction::Update,
            entity::VEHICLE,
            vehicle_id.into_inner(),
            &actor.ip_address,
        )
        .before(to_json(&VehicleStatusSnapshot { status })?)
        .after(to_json(&VehicleStatusSnapshot {
            status: CoreVehicleStatus::WrittenOff,
        })?),
    )
    .await?;

    Ok(movement_id)
}
