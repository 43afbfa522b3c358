//! Property-based tests for PurchaseOrderService.

use carlot_shared::types::{SupplierId, VehicleId};
use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::purchase::service::PurchaseOrderService;
use crate::purchase::types::{NewPurchaseItem, NewPurchaseOrder, PurchaseStatus};

fn arb_status() -> impl Strategy<Value = PurchaseStatus> {
    prop_oneof![
        Just(PurchaseStatus::Created),
        Just(PurchaseStatus::Received),
        Just(PurchaseStatus::Cancelled),
    ]
}

fn arb_price() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn arb_items() -> impl Strategy<Value = Vec<NewPurchaseItem>> {
    prop::collection::vec(arb_price(), 1..6).prop_map(|prices| {
        prices
            .into_iter()
            .zip(1..)
            .map(|(agreed_price, id)| NewPurchaseItem {
                vehicle_id: VehicleId::new(id),
                agreed_price,
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Orders built from item prices always validate with a consistent total.
    #[test]
    fn prop_valid_orders_resolve_consistently(
        items in arb_items(),
        discount_pct in 0u32..=100,
        taxes in arb_price(),
    ) {
        let subtotal: Decimal = items.iter().map(|i| i.agreed_price).sum();
        let discount = (subtotal * Decimal::from(discount_pct) / Decimal::from(100)).round_dp(2);
        let discount = discount.min(subtotal);
        let order = NewPurchaseOrder {
            supplier_id: SupplierId::new(1),
            expected_date: None,
            subtotal,
            discount,
            taxes,
            total: None,
        };

        let amounts = PurchaseOrderService::validate_new(&order, &items).unwrap();
        prop_assert!(amounts.is_consistent());
        prop_assert_eq!(amounts.total, subtotal - discount + taxes);
    }

    /// Repeating any vehicle makes the order invalid.
    #[test]
    fn prop_duplicate_vehicle_rejected(items in arb_items(), pick in any::<prop::sample::Index>()) {
        let mut items = items;
        let dup = items[pick.index(items.len())];
        items.push(dup);
        let subtotal: Decimal = items.iter().map(|i| i.agreed_price).sum();
        let order = NewPurchaseOrder {
            supplier_id: SupplierId::new(1),
            expected_date: None,
            subtotal,
            discount: Decimal::ZERO,
            taxes: Decimal::ZERO,
            total: None,
        };

        prop_assert!(PurchaseOrderService::validate_new(&order, &items).is_err());
    }

    /// Only CREATED orders leave their state, and terminal states never move.
    #[test]
    fn prop_only_created_transitions(from in arb_status(), to in arb_status()) {
        let result = PurchaseOrderService::transition(from, to);
        let allowed = from == PurchaseStatus::Created && to != PurchaseStatus::Created;
        prop_assert_eq!(result.is_ok(), allowed);
    }
}
