//! Shared fixtures for the workflow integration tests.
//!
//! Each test gets its own in-memory SQLite database with the full schema.
//! The pool holds a single connection so every statement of a workflow
//! runs on the same database.

#![allow(dead_code)]

use carlot_core::ActorContext;
use carlot_core::auth::hash_password;
use carlot_core::users::AccountRole as CoreAccountRole;
use carlot_db::entities::{
    account, customer,
    sea_orm_active_enums::{AccountRole, VehicleStatus},
    supplier, user, vehicle,
};
use carlot_db::migration::{Migrator, MigratorTrait};
use carlot_shared::types::{AccountId, SupplierId, VehicleId};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, NotSet, Set};

/// Password of every seeded account.
pub const SEED_PASSWORD: &str = "Adm1n!pass";

/// Client address recorded by test actors.
pub const TEST_IP: &str = "127.0.0.1";

/// Opens a migrated in-memory database.
pub async fn setup_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

/// Seeds an account with a profile and returns an actor for it.
pub async fn seed_account(
    db: &DatabaseConnection,
    email: &str,
    role: CoreAccountRole,
    personnel_number: &str,
    username: &str,
) -> ActorContext {
    let now = Utc::now().fixed_offset();
    let login = account::ActiveModel {
        account_id: NotSet,
        email: Set(email.to_string()),
        password_hash: Set(hash_password(SEED_PASSWORD).expect("Failed to hash password")),
        role: Set(AccountRole::from(role)),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
    }
    .insert(db)
    .await
    .expect("Failed to seed account");

    user::ActiveModel {
        personnel_number: Set(personnel_number.to_string()),
        account_id: Set(login.account_id),
        username: Set(username.to_string()),
        full_name: Set(format!("Seeded {username}")),
        phone: Set("2281234567".to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
    }
    .insert(db)
    .await
    .expect("Failed to seed user");

    ActorContext::new(AccountId::new(login.account_id), role, TEST_IP)
}

/// Seeds the bootstrap administrator.
pub async fn seed_admin(db: &DatabaseConnection) -> ActorContext {
    seed_account(
        db,
        "admin@carlot.test",
        CoreAccountRole::Administrator,
        "A000000000",
        "admin",
    )
    .await
}

/// Seeds a salesperson.
pub async fn seed_employee(db: &DatabaseConnection) -> ActorContext {
    seed_account(
        db,
        "seller@carlot.test",
        CoreAccountRole::Employee,
        "V000000000",
        "seller",
    )
    .await
}

/// Seeds an active supplier.
pub async fn seed_supplier(db: &DatabaseConnection, legal_name: &str) -> SupplierId {
    let row = supplier::ActiveModel {
        supplier_id: NotSet,
        legal_name: Set(legal_name.to_string()),
        is_active: Set(true),
        created_at: Set(Utc::now().fixed_offset()),
    }
    .insert(db)
    .await
    .expect("Failed to seed supplier");
    SupplierId::new(row.supplier_id)
}

/// Seeds an active customer.
pub async fn seed_customer(db: &DatabaseConnection, customer_number: &str) -> String {
    customer::ActiveModel {
        customer_number: Set(customer_number.to_string()),
        full_name: Set("Test Customer".to_string()),
        email: Set(Some("customer@carlot.test".to_string())),
        phone: Set(None),
        is_active: Set(true),
        created_at: Set(Utc::now().fixed_offset()),
    }
    .insert(db)
    .await
    .expect("Failed to seed customer");
    customer_number.to_string()
}

/// Seeds a vehicle in the given stock status.
pub async fn seed_vehicle(
    db: &DatabaseConnection,
    vin: &str,
    price: Decimal,
    status: VehicleStatus,
    supplier_id: Option<SupplierId>,
) -> VehicleId {
    let now = Utc::now().fixed_offset();
    let row = vehicle::ActiveModel {
        vehicle_id: NotSet,
        vin: Set(vin.to_string()),
        make: Set("Nissan".to_string()),
        model: Set("Versa".to_string()),
        model_year: Set(2025),
        price: Set(price),
        status: Set(status),
        supplier_id: Set(supplier_id.map(SupplierId::into_inner)),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("Failed to seed vehicle");
    VehicleId::new(row.vehicle_id)
}
