//! Database seeder for Carlot development and testing.
//!
//! Seeds the bootstrap administrator, suppliers, customers and vehicles
//! awaiting delivery. Every step is skipped when its rows already exist.
//!
//! Usage: cargo run --bin seeder
//!
//! The administrator password is read from `CARLOT_SEED_ADMIN_PASSWORD`.

use anyhow::{Context, bail};
use carlot_core::ActorContext;
use carlot_core::audit::{AccountSnapshot, AuditAction, NewAuditEntry, entity, to_json};
use carlot_core::auth::hash_password;
use carlot_core::users::{AccountRole as CoreAccountRole, validate_password_strength};
use carlot_db::AuditWriter;
use carlot_db::entities::{
    account, customer,
    sea_orm_active_enums::{AccountRole, VehicleStatus},
    supplier, user, vehicle,
};
use carlot_shared::AppConfig;
use carlot_shared::telemetry::init_tracing;
use carlot_shared::types::AccountId;
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, Set, TransactionTrait,
};
use tracing::info;

/// Login of the bootstrap administrator.
const ADMIN_EMAIL: &str = "admin@carlot.dev";
/// Personnel number of the bootstrap administrator.
const ADMIN_PERSONNEL_NUMBER: &str = "A000000000";

const SUPPLIERS: [&str; 3] = [
    "Autos del Golfo S.A. de C.V.",
    "Distribuidora Automotriz Norte",
    "Importadora Pacifico",
];

const CUSTOMERS: [(&str, &str); 3] = [
    ("C-0001", "Laura Hernandez"),
    ("C-0002", "Ricardo Sanchez"),
    ("C-0003", "Transportes Lopez"),
];

const VEHICLES: [(&str, &str, &str, i32); 4] = [
    ("3N1CN8AE5RL800001", "Nissan", "Versa", 2025),
    ("3VWCB7BU8RM000002", "Volkswagen", "Jetta", 2025),
    ("MR0EX3CB1R1000003", "Toyota", "Hilux", 2024),
    ("3MZBPACL4RM000004", "Mazda", "3", 2025),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(&config.logging);

    let db = carlot_db::connect_with(&config.database)
        .await
        .context("Failed to connect to database")?;

    let password =
        std::env::var("CARLOT_SEED_ADMIN_PASSWORD").unwrap_or_else(|_| "Carl0t!admin".to_string());
    let admin = seed_admin(&db, &password, &config.audit.default_ip_address).await?;
    seed_suppliers(&db).await?;
    seed_customers(&db).await?;
    seed_vehicles(&db).await?;

    info!(admin = admin.into_inner(), "seeding complete");
    Ok(())
}

/// Seeds the first administrator, who can then create every other account.
async fn seed_admin(
    db: &DatabaseConnection,
    password: &str,
    ip_address: &str,
) -> anyhow::Result<AccountId> {
    if let Some(existing) = account::Entity::find()
        .filter(account::Column::Email.eq(ADMIN_EMAIL))
        .one(db)
        .await?
    {
        info!(account_id = existing.account_id, "administrator already exists, skipping");
        return Ok(AccountId::new(existing.account_id));
    }

    if let Err(err) = validate_password_strength(password) {
        bail!("seed administrator password rejected: {err}");
    }
    let password_hash = hash_password(password)?;

    let now = Utc::now().fixed_offset();
    let txn = db.begin().await?;
    let login = account::ActiveModel {
        account_id: NotSet,
        email: Set(ADMIN_EMAIL.to_string()),
        password_hash: Set(password_hash),
        role: Set(AccountRole::Administrator),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
    }
    .insert(&txn)
    .await?;

    user::ActiveModel {
        personnel_number: Set(ADMIN_PERSONNEL_NUMBER.to_string()),
        account_id: Set(login.account_id),
        username: Set("admin".to_string()),
        full_name: Set("Carlot Administrator".to_string()),
        phone: Set("2280000000".to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
    }
    .insert(&txn)
    .await?;

    let account_id = AccountId::new(login.account_id);
    let actor = ActorContext::new(account_id, CoreAccountRole::Administrator, ip_address);
    AuditWriter::record(
        &txn,
        NewAuditEntry::new(
            actor.account_id,
            AuditAction::Create,
            entity::ACCOUNT,
            login.account_id,
            &actor.ip_address,
        )
        .after(to_json(&AccountSnapshot {
            account_id,
            email: login.email.clone(),
            role: CoreAccountRole::Administrator,
            is_active: true,
        })?),
    )
    .await?;
    txn.commit().await?;

    info!(account_id = login.account_id, email = ADMIN_EMAIL, "administrator seeded");
    Ok(account_id)
}

async fn seed_suppliers(db: &DatabaseConnection) -> anyhow::Result<()> {
    if supplier::Entity::find().count(db).await? > 0 {
        info!("suppliers already exist, skipping");
        return Ok(());
    }

    for legal_name in SUPPLIERS {
        supplier::ActiveModel {
            supplier_id: NotSet,
            legal_name: Set(legal_name.to_string()),
            is_active: Set(true),
            created_at: Set(Utc::now().fixed_offset()),
        }
        .insert(db)
        .await?;
    }
    info!(count = SUPPLIERS.len(), "suppliers seeded");
    Ok(())
}

async fn seed_customers(db: &DatabaseConnection) -> anyhow::Result<()> {
    if customer::Entity::find().count(db).await? > 0 {
        info!("customers already exist, skipping");
        return Ok(());
    }

    for (number, name) in CUSTOMERS {
        customer::ActiveModel {
            customer_number: Set(number.to_string()),
            full_name: Set(name.to_string()),
            email: Set(None),
            phone: Set(None),
            is_active: Set(true),
            created_at: Set(Utc::now().fixed_offset()),
        }
        .insert(db)
        .await?;
    }
    info!(count = CUSTOMERS.len(), "customers seeded");
    Ok(())
}

/// Seeds vehicles on order from the first supplier; they enter stock when received.
async fn seed_vehicles(db: &DatabaseConnection) -> anyhow::Result<()> {
    if vehicle::Entity::find().count(db).await? > 0 {
        info!("vehicles already exist, skipping");
        return Ok(());
    }

    let supplier_id = supplier::Entity::find()
        .one(db)
        .await?
        .map(|s| s.supplier_id)
        .context("no supplier to attach vehicles to")?;

    let now = Utc::now().fixed_offset();
    for (vin, make, model, model_year) in VEHICLES {
        vehicle::ActiveModel {
            vehicle_id: NotSet,
            vin: Set(vin.to_string()),
            make: Set(make.to_string()),
            model: Set(model.to_string()),
            model_year: Set(model_year),
            price: Set(Decimal::ZERO),
            status: Set(VehicleStatus::Ordered),
            supplier_id: Set(Some(supplier_id)),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await?;
    }
    info!(count = VEHICLES.len(), "vehicles seeded");
    Ok(())
}
