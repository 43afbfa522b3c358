//! Integration tests for the audit writer and audit queries.

mod common;

use carlot_core::audit::{AuditAction as CoreAuditAction, NewAuditEntry, entity};
use carlot_core::purchase::{NewPurchaseItem, NewPurchaseOrder, PurchaseOrderChange};
use carlot_db::entities::{
    audit_log,
    sea_orm_active_enums::{AuditAction, VehicleStatus},
};
use carlot_db::repositories::AuditFilter;
use carlot_db::{AuditLogRepository, AuditWriter, PurchaseOrderRepository};
use carlot_shared::types::PageRequest;
use rust_decimal_macros::dec;
use sea_orm::{EntityTrait, PaginatorTrait, TransactionTrait};

use common::{seed_admin, seed_supplier, seed_vehicle, setup_db};

#[tokio::test]
async fn test_entity_history_follows_mutation_order() {
    let db = setup_db().await;
    let actor = seed_admin(&db).await;
    let supplier_id = seed_supplier(&db, "Proveedora Norte").await;
    let vehicle_id = seed_vehicle(&db, "VIN-A-1", dec!(0), VehicleStatus::Ordered, None).await;
    let repo = PurchaseOrderRepository::new(db.clone());

    let order_id = repo
        .create(
            &actor,
            NewPurchaseOrder {
                supplier_id,
                expected_date: None,
                subtotal: dec!(15000),
                discount: dec!(0),
                taxes: dec!(0),
                total: Some(dec!(15000)),
            },
            vec![NewPurchaseItem {
                vehicle_id,
                agreed_price: dec!(15000),
            }],
        )
        .await
        .unwrap();
    repo.update(
        &actor,
        PurchaseOrderChange {
            purchase_id: order_id,
            supplier_id,
            expected_date: None,
            subtotal: dec!(14000),
        },
    )
    .await
    .unwrap();
    repo.cancel(&actor, order_id, Some("supplier closed")).await.unwrap();

    let history = AuditLogRepository::new(db.clone())
        .for_entity(entity::PURCHASE_ORDER, order_id.into_inner())
        .await
        .unwrap();

    let actions: Vec<_> = history.iter().map(|entry| entry.action).collect();
    assert_eq!(
        actions,
        vec![AuditAction::Create, AuditAction::Update, AuditAction::Update]
    );
    assert!(history.windows(2).all(|pair| pair[0].created_at <= pair[1].created_at));
    assert!(history.iter().all(|entry| entry.ip_address == actor.ip_address));
    assert!(
        history[2]
            .after_data
            .as_deref()
            .unwrap()
            .contains("CANCELLED")
    );
}

#[tokio::test]
async fn test_writer_rejects_anonymous_mutation() {
    let db = setup_db().await;

    let txn = db.begin().await.unwrap();
    let mut entry = NewAuditEntry::anonymous(CoreAuditAction::Login, entity::SALE, 1, "10.0.0.1");
    entry.action = CoreAuditAction::Update;
    let err = AuditWriter::record(&txn, entry).await.unwrap_err();
    txn.rollback().await.unwrap();

    assert_eq!(err.error_code(), "VALIDATION_ERROR");
    assert_eq!(audit_log::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_rolled_back_entries_are_discarded() {
    let db = setup_db().await;
    let actor = seed_admin(&db).await;

    let txn = db.begin().await.unwrap();
    AuditWriter::record(
        &txn,
        NewAuditEntry::new(
            actor.account_id,
            CoreAuditAction::Update,
            entity::VEHICLE,
            5,
            &actor.ip_address,
        ),
    )
    .await
    .unwrap();
    txn.rollback().await.unwrap();

    assert_eq!(audit_log::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_list_filters_and_paginates_newest_first() {
    let db = setup_db().await;
    let actor = seed_admin(&db).await;

    let txn = db.begin().await.unwrap();
    for entity_id in 1..=5 {
        AuditWriter::record(
            &txn,
            NewAuditEntry::new(
                actor.account_id,
                CoreAuditAction::Update,
                entity::VEHICLE,
                entity_id,
                &actor.ip_address,
            ),
        )
        .await
        .unwrap();
    }
    AuditWriter::record(
        &txn,
        NewAuditEntry::new(
            actor.account_id,
            CoreAuditAction::Create,
            entity::SALE,
            1,
            &actor.ip_address,
        ),
    )
    .await
    .unwrap();
    txn.commit().await.unwrap();

    let repo = AuditLogRepository::new(db.clone());
    let filter = AuditFilter {
        entity: Some(entity::VEHICLE.to_string()),
        ..AuditFilter::default()
    };

    let first_page = repo.list(&filter, &PageRequest::new(1, 2)).await.unwrap();
    assert_eq!(first_page.meta.total, 5);
    assert_eq!(first_page.meta.total_pages, 3);
    assert_eq!(first_page.data.len(), 2);
    assert_eq!(first_page.data[0].entity_id, 5);

    let last_page = repo.list(&filter, &PageRequest::new(3, 2)).await.unwrap();
    assert_eq!(last_page.data.len(), 1);
    assert_eq!(last_page.data[0].entity_id, 1);

    let creates = repo
        .list(
            &AuditFilter {
                action: Some(CoreAuditAction::Create),
                account_id: Some(actor.account_id),
                ..AuditFilter::default()
            },
            &PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(creates.meta.total, 1);
    assert_eq!(creates.data[0].entity, entity::SALE);
}
