//! Reference tables: suppliers, customers, vehicles, accounts and users.
//!
//! Built with the schema builder so the same migration runs on PostgreSQL
//! and on the SQLite databases used by the integration tests.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ============================================================
        // SUPPLIERS & CUSTOMERS
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Supplier::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Supplier::SupplierId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Supplier::LegalName).string_len(200).not_null())
                    .col(
                        ColumnDef::new(Supplier::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Supplier::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Customer::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Customer::CostumerNumber)
                            .string_len(20)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Customer::FullName).string_len(225).not_null())
                    .col(ColumnDef::new(Customer::Email).string_len(120))
                    .col(ColumnDef::new(Customer::Phone).string_len(20))
                    .col(
                        ColumnDef::new(Customer::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Customer::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // VEHICLES
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Vehicle::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Vehicle::VehicleId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Vehicle::Vin)
                            .string_len(17)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Vehicle::Make).string_len(60).not_null())
                    .col(ColumnDef::new(Vehicle::Model).string_len(60).not_null())
                    .col(ColumnDef::new(Vehicle::ModelYear).integer().not_null())
                    .col(ColumnDef::new(Vehicle::Price).decimal_len(12, 2).not_null())
                    .col(ColumnDef::new(Vehicle::Status).string_len(20).not_null())
                    .col(ColumnDef::new(Vehicle::SupplierId).integer())
                    .col(
                        ColumnDef::new(Vehicle::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Vehicle::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vehicle_supplier")
                            .from(Vehicle::Table, Vehicle::SupplierId)
                            .to(Supplier::Table, Supplier::SupplierId),
                    )
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // ACCOUNTS & USERS
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Account::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Account::AccountId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Account::Email)
                            .string_len(120)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Account::PasswordHash).string_len(255).not_null())
                    .col(ColumnDef::new(Account::Role).string_len(20).not_null())
                    .col(
                        ColumnDef::new(Account::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Account::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Account::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Account::DeletedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(User::PersonnelNumber)
                            .string_len(10)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(User::AccountId)
                            .integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(User::Username)
                            .string_len(10)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(User::FullName).string_len(225).not_null())
                    .col(ColumnDef::new(User::Phone).string_len(10).not_null())
                    .col(
                        ColumnDef::new(User::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(User::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(User::DeletedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_account")
                            .from(User::Table, User::AccountId)
                            .to(Account::Table, Account::AccountId),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(User::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Account::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Vehicle::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Customer::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Supplier::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
pub(super) enum Supplier {
    Table,
    SupplierId,
    LegalName,
    IsActive,
    CreatedAt,
}

#[derive(DeriveIden)]
pub(super) enum Customer {
    Table,
    CostumerNumber,
    FullName,
    Email,
    Phone,
    IsActive,
    CreatedAt,
}

#[derive(DeriveIden)]
pub(super) enum Vehicle {
    Table,
    VehicleId,
    Vin,
    Make,
    Model,
    ModelYear,
    Price,
    Status,
    SupplierId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub(super) enum Account {
    Table,
    AccountId,
    Email,
    PasswordHash,
    Role,
    IsActive,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(DeriveIden)]
enum User {
    Table,
    PersonnelNumber,
    AccountId,
    Username,
    FullName,
    Phone,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
