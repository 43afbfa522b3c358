//! Transactional tables: purchase orders, sales, inventory movements and the audit log.

use sea_orm_migration::prelude::*;

use super::m20261016_000001_reference_tables::{Account, Customer, Supplier, Vehicle};

#[derive(DeriveMigrationName)]
pub struct Migration;

fn money(col: impl IntoIden) -> ColumnDef {
    ColumnDef::new(col).decimal_len(12, 2).not_null().to_owned()
}

fn created_at(col: impl IntoIden) -> ColumnDef {
    ColumnDef::new(col)
        .timestamp_with_time_zone()
        .not_null()
        .default(Expr::current_timestamp())
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ============================================================
        // PURCHASE ORDERS
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(PurchaseOrder::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PurchaseOrder::PurchaseId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PurchaseOrder::SupplierId).integer().not_null())
                    .col(ColumnDef::new(PurchaseOrder::AccountId).integer().not_null())
                    .col(ColumnDef::new(PurchaseOrder::Status).string_len(20).not_null())
                    .col(money(PurchaseOrder::Subtotal))
                    .col(money(PurchaseOrder::Discount))
                    .col(money(PurchaseOrder::Taxes))
                    .col(money(PurchaseOrder::Total))
                    .col(ColumnDef::new(PurchaseOrder::ExpectedDate).date())
                    .col(created_at(PurchaseOrder::CreatedAt))
                    .col(created_at(PurchaseOrder::UpdatedAt))
                    .col(ColumnDef::new(PurchaseOrder::ReceivedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(PurchaseOrder::CancelledAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(PurchaseOrder::CancelReason).text())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_purchase_order_supplier")
                            .from(PurchaseOrder::Table, PurchaseOrder::SupplierId)
                            .to(Supplier::Table, Supplier::SupplierId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_purchase_order_account")
                            .from(PurchaseOrder::Table, PurchaseOrder::AccountId)
                            .to(Account::Table, Account::AccountId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PurchaseOrderItem::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PurchaseOrderItem::PurchaseId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PurchaseOrderItem::VehicleId).integer().not_null())
                    .col(money(PurchaseOrderItem::AgreedPrice))
                    .primary_key(
                        Index::create()
                            .col(PurchaseOrderItem::PurchaseId)
                            .col(PurchaseOrderItem::VehicleId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_purchase_order_item_order")
                            .from(PurchaseOrderItem::Table, PurchaseOrderItem::PurchaseId)
                            .to(PurchaseOrder::Table, PurchaseOrder::PurchaseId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_purchase_order_item_vehicle")
                            .from(PurchaseOrderItem::Table, PurchaseOrderItem::VehicleId)
                            .to(Vehicle::Table, Vehicle::VehicleId),
                    )
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // SALES
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Sale::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Sale::SaleId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Sale::Folio)
                            .string_len(30)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Sale::VehicleId).integer().not_null())
                    .col(ColumnDef::new(Sale::CostumerNumber).string_len(20).not_null())
                    .col(ColumnDef::new(Sale::SellerAccountId).integer().not_null())
                    .col(ColumnDef::new(Sale::Status).string_len(20).not_null())
                    .col(money(Sale::Subtotal))
                    .col(money(Sale::Discount))
                    .col(money(Sale::Taxes))
                    .col(money(Sale::Total))
                    .col(created_at(Sale::CreatedAt))
                    .col(ColumnDef::new(Sale::ClosedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Sale::AnnulledAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Sale::AnnulReason).text())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sale_vehicle")
                            .from(Sale::Table, Sale::VehicleId)
                            .to(Vehicle::Table, Vehicle::VehicleId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sale_customer")
                            .from(Sale::Table, Sale::CostumerNumber)
                            .to(Customer::Table, Customer::CostumerNumber),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sale_seller")
                            .from(Sale::Table, Sale::SellerAccountId)
                            .to(Account::Table, Account::AccountId),
                    )
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // INVENTORY LEDGER (append-only)
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(InventoryMovement::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InventoryMovement::MovementId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(InventoryMovement::VehicleId).integer().not_null())
                    .col(ColumnDef::new(InventoryMovement::Type).string_len(20).not_null())
                    .col(ColumnDef::new(InventoryMovement::RefTable).string_len(40))
                    .col(ColumnDef::new(InventoryMovement::RefId).integer())
                    .col(ColumnDef::new(InventoryMovement::Note).text())
                    .col(ColumnDef::new(InventoryMovement::AccountId).integer().not_null())
                    .col(created_at(InventoryMovement::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inventory_movement_vehicle")
                            .from(InventoryMovement::Table, InventoryMovement::VehicleId)
                            .to(Vehicle::Table, Vehicle::VehicleId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inventory_movement_account")
                            .from(InventoryMovement::Table, InventoryMovement::AccountId)
                            .to(Account::Table, Account::AccountId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_inventory_movement_vehicle")
                    .table(InventoryMovement::Table)
                    .col(InventoryMovement::VehicleId)
                    .col(InventoryMovement::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // AUDIT LOG (append-only)
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(AuditLog::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AuditLog::AuditId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AuditLog::AccountId).integer())
                    .col(ColumnDef::new(AuditLog::Action).string_len(20).not_null())
                    .col(ColumnDef::new(AuditLog::Entity).string_len(40).not_null())
                    .col(ColumnDef::new(AuditLog::EntityId).integer().not_null())
                    .col(ColumnDef::new(AuditLog::BeforeData).text())
                    .col(ColumnDef::new(AuditLog::AfterData).text())
                    .col(ColumnDef::new(AuditLog::IpAddress).string_len(45).not_null())
                    .col(created_at(AuditLog::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_audit_log_entity")
                    .table(AuditLog::Table)
                    .col(AuditLog::Entity)
                    .col(AuditLog::EntityId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AuditLog::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(InventoryMovement::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Sale::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(PurchaseOrderItem::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(PurchaseOrder::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum PurchaseOrder {
    Table,
    PurchaseId,
    SupplierId,
    AccountId,
    Status,
    Subtotal,
    Discount,
    Taxes,
    Total,
    ExpectedDate,
    CreatedAt,
    UpdatedAt,
    ReceivedAt,
    CancelledAt,
    CancelReason,
}

#[derive(DeriveIden)]
enum PurchaseOrderItem {
    Table,
    PurchaseId,
    VehicleId,
    AgreedPrice,
}

#[derive(DeriveIden)]
enum Sale {
    Table,
    SaleId,
    Folio,
    VehicleId,
    CostumerNumber,
    SellerAccountId,
    Status,
    Subtotal,
    Discount,
    Taxes,
    Total,
    CreatedAt,
    ClosedAt,
    AnnulledAt,
    AnnulReason,
}

#[derive(DeriveIden)]
enum InventoryMovement {
    Table,
    MovementId,
    VehicleId,
    Type,
    RefTable,
    RefId,
    Note,
    AccountId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum AuditLog {
    Table,
    AuditId,
    AccountId,
    Action,
    Entity,
    EntityId,
    BeforeData,
    AfterData,
    IpAddress,
    CreatedAt,
}
