//! Integration tests for the sale workflow.

mod common;

use carlot_core::ActorContext;
use carlot_core::audit::{SaleSnapshot, entity};
use carlot_core::inventory::MovementType;
use carlot_core::sale::{DEFAULT_ANNUL_REASON, NewSale, SaleChange, SaleStatus as CoreSaleStatus};
use carlot_db::entities::{
    sea_orm_active_enums::{SaleStatus, VehicleStatus},
    vehicle,
};
use carlot_db::{AuditLogRepository, InventoryLedger, SaleRepository};
use carlot_shared::types::{SaleId, VehicleId};
use rstest::rstest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{DatabaseConnection, EntityTrait};

use common::{seed_customer, seed_employee, seed_vehicle, setup_db};

struct Fixture {
    db: DatabaseConnection,
    seller: ActorContext,
    customer: String,
    vehicle_id: VehicleId,
}

async fn fixture() -> Fixture {
    let db = setup_db().await;
    let seller = seed_employee(&db).await;
    let customer = seed_customer(&db, "C-0001").await;
    let vehicle_id = seed_vehicle(&db, "VIN-S-1", dec!(15000), VehicleStatus::Available, None).await;
    Fixture {
        db,
        seller,
        customer,
        vehicle_id,
    }
}

fn new_sale(fx: &Fixture, folio: &str) -> NewSale {
    NewSale {
        folio: folio.to_string(),
        vehicle_id: fx.vehicle_id,
        customer_number: fx.customer.clone(),
        status: None,
        subtotal: dec!(15000),
        discount: dec!(1500),
        taxes: dec!(500),
        total: None,
    }
}

async fn record_sale(fx: &Fixture) -> SaleId {
    SaleRepository::new(fx.db.clone())
        .create_with_inventory_and_audit(&fx.seller, new_sale(fx, "F-0001"))
        .await
        .expect("Failed to record sale")
}

#[tokio::test]
async fn test_create_sells_vehicle_and_logs_movement() {
    let fx = fixture().await;
    let repo = SaleRepository::new(fx.db.clone());
    let sale_id = record_sale(&fx).await;

    let sale = repo.find_by_id(sale_id).await.unwrap().expect("sale should exist");
    assert_eq!(sale.total, dec!(14000));
    assert_eq!(sale.status, SaleStatus::Completed);
    assert_eq!(sale.seller_account_id, fx.seller.account_id.into_inner());
    assert!(sale.closed_at.is_some());

    let sold = vehicle::Entity::find_by_id(fx.vehicle_id.into_inner())
        .one(&fx.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(sold.status, VehicleStatus::Sold);

    let movements = InventoryLedger::new(fx.db.clone())
        .by_vehicle_and_type(fx.vehicle_id, MovementType::Sale)
        .await
        .unwrap();
    assert_eq!(movements.len(), 1);
    assert_eq!(movements[0].note.as_deref(), Some("Sale folio F-0001"));
    assert_eq!(movements[0].ref_id, Some(sale_id.into_inner()));

    let history = AuditLogRepository::new(fx.db.clone())
        .for_entity(entity::SALE, sale_id.into_inner())
        .await
        .unwrap();
    assert_eq!(history.len(), 1);
    let after: SaleSnapshot =
        serde_json::from_str(history[0].after_data.as_deref().unwrap()).unwrap();
    assert_eq!(after.folio, sale.folio);
    assert_eq!(after.total, sale.total);
    assert_eq!(after.status, CoreSaleStatus::Completed);
}

#[tokio::test]
async fn test_duplicate_folio_is_rejected() {
    let fx = fixture().await;
    record_sale(&fx).await;

    let other = seed_vehicle(&fx.db, "VIN-S-2", dec!(15000), VehicleStatus::Available, None).await;
    let mut sale = new_sale(&fx, "F-0001");
    sale.vehicle_id = other;

    let err = SaleRepository::new(fx.db.clone())
        .create_with_inventory_and_audit(&fx.seller, sale)
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "VALIDATION_ERROR");

    let untouched = vehicle::Entity::find_by_id(other.into_inner())
        .one(&fx.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(untouched.status, VehicleStatus::Available);
}

#[tokio::test]
async fn test_selling_a_sold_vehicle_rolls_back() {
    let fx = fixture().await;
    let repo = SaleRepository::new(fx.db.clone());
    record_sale(&fx).await;

    let err = repo
        .create_with_inventory_and_audit(&fx.seller, new_sale(&fx, "F-0002"))
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "ILLEGAL_STATE");
    assert!(repo.find_by_folio("F-0002").await.unwrap().is_none());
}

#[tokio::test]
async fn test_selling_a_missing_vehicle_is_a_persistence_error() {
    let fx = fixture().await;
    let mut sale = new_sale(&fx, "F-0003");
    sale.vehicle_id = VehicleId::new(4040);

    let err = SaleRepository::new(fx.db.clone())
        .create_with_inventory_and_audit(&fx.seller, sale)
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "PERSISTENCE_ERROR");
}

#[tokio::test]
async fn test_void_keeps_closed_at_and_is_terminal() {
    let fx = fixture().await;
    let repo = SaleRepository::new(fx.db.clone());
    let sale_id = record_sale(&fx).await;
    let before = repo.find_by_id(sale_id).await.unwrap().unwrap();

    let voided = repo.void(&fx.seller, sale_id, None).await.unwrap();
    assert_eq!(voided.status, SaleStatus::Voided);
    assert_eq!(voided.closed_at, before.closed_at);
    assert!(voided.annulled_at.is_some());
    assert_eq!(voided.annul_reason.as_deref(), Some(DEFAULT_ANNUL_REASON));

    let err = repo
        .update_with_audit(
            &fx.seller,
            SaleChange {
                sale_id,
                customer_number: fx.customer.clone(),
                status: CoreSaleStatus::Completed,
                subtotal: dec!(15000),
                discount: dec!(1500),
                taxes: dec!(500),
                total: None,
                annul_reason: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "ILLEGAL_STATE");

    let history = AuditLogRepository::new(fx.db.clone())
        .for_entity(entity::SALE, sale_id.into_inner())
        .await
        .unwrap();
    assert_eq!(history.len(), 2);
    let after: SaleSnapshot =
        serde_json::from_str(history[1].after_data.as_deref().unwrap()).unwrap();
    assert_eq!(after.status, CoreSaleStatus::Voided);
}

#[tokio::test]
async fn test_update_with_wrong_total_changes_nothing() {
    let fx = fixture().await;
    let repo = SaleRepository::new(fx.db.clone());
    let sale_id = record_sale(&fx).await;

    let err = repo
        .update_with_audit(
            &fx.seller,
            SaleChange {
                sale_id,
                customer_number: fx.customer.clone(),
                status: CoreSaleStatus::Completed,
                subtotal: dec!(15000),
                discount: dec!(1500),
                taxes: dec!(500),
                total: Some(dec!(15000)),
                annul_reason: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "VALIDATION_ERROR");

    let sale = repo.find_by_id(sale_id).await.unwrap().unwrap();
    assert_eq!(sale.total, dec!(14000));
}

#[tokio::test]
async fn test_update_missing_sale_is_not_found() {
    let fx = fixture().await;
    let err = SaleRepository::new(fx.db.clone())
        .void(&fx.seller, SaleId::new(77), Some("typo"))
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "NOT_FOUND");
}

#[rstest]
#[case::blank_folio("  ", "C-0001", None)]
#[case::blank_customer("F-0009", "", None)]
#[case::wrong_total("F-0009", "C-0001", Some(dec!(15000)))]
#[tokio::test]
async fn test_invalid_sale_leaves_vehicle_in_stock(
    #[case] folio: &str,
    #[case] customer: &str,
    #[case] total: Option<Decimal>,
) {
    let fx = fixture().await;
    let mut sale = new_sale(&fx, folio);
    sale.customer_number = customer.to_string();
    sale.total = total;

    let err = SaleRepository::new(fx.db.clone())
        .create_with_inventory_and_audit(&fx.seller, sale)
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "VALIDATION_ERROR");

    let row = vehicle::Entity::find_by_id(fx.vehicle_id.into_inner())
        .one(&fx.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.status, VehicleStatus::Available);
}

#[tokio::test]
async fn test_voided_initial_status_is_rejected() {
    let fx = fixture().await;
    let repo = SaleRepository::new(fx.db.clone());
    let mut sale = new_sale(&fx, "F-0010");
    sale.status = Some(CoreSaleStatus::Voided);

    let err = repo
        .create_with_inventory_and_audit(&fx.seller, sale)
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "VALIDATION_ERROR");
    assert!(repo.find_by_folio("F-0010").await.unwrap().is_none());

    let row = vehicle::Entity::find_by_id(fx.vehicle_id.into_inner())
        .one(&fx.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.status, VehicleStatus::Available);
    assert!(
        InventoryLedger::new(fx.db.clone())
            .by_vehicle(fx.vehicle_id)
            .await
            .unwrap()
            .is_empty()
    );
}

#[rstest]
#[case::ordered(VehicleStatus::Ordered)]
#[case::written_off(VehicleStatus::WrittenOff)]
#[tokio::test]
async fn test_only_available_vehicles_can_be_sold(#[case] status: VehicleStatus) {
    let fx = fixture().await;
    let repo = SaleRepository::new(fx.db.clone());
    let other = seed_vehicle(&fx.db, "VIN-S-9", dec!(15000), status, None).await;
    let mut sale = new_sale(&fx, "F-0011");
    sale.vehicle_id = other;

    let err = repo
        .create_with_inventory_and_audit(&fx.seller, sale)
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "ILLEGAL_STATE");
    assert!(repo.find_by_folio("F-0011").await.unwrap().is_none());

    let row = vehicle::Entity::find_by_id(other.into_inner())
        .one(&fx.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.status, status);
}
