//! Property-based tests for amount resolution.

use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::amounts::{Amounts, markup_price};

/// Non-negative amounts with two fractional digits.
fn arb_money() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Resolved amounts always satisfy the total identity.
    #[test]
    fn prop_resolved_total_matches_identity(
        subtotal in arb_money(),
        discount in arb_money(),
        taxes in arb_money(),
    ) {
        match Amounts::resolve(subtotal, discount, taxes, None) {
            Ok(amounts) => {
                prop_assert!(amounts.is_consistent());
                prop_assert!(amounts.discount <= amounts.subtotal);
            }
            Err(_) => prop_assert!(discount > subtotal),
        }
    }

    /// A supplied total is accepted only when it equals the identity.
    #[test]
    fn prop_supplied_total_must_match(
        subtotal in arb_money(),
        taxes in arb_money(),
        delta in 1i64..1_000,
    ) {
        let expected = subtotal + taxes;
        prop_assert!(Amounts::resolve(subtotal, Decimal::ZERO, taxes, Some(expected)).is_ok());

        let off = expected + Decimal::new(delta, 2);
        prop_assert!(Amounts::resolve(subtotal, Decimal::ZERO, taxes, Some(off)).is_err());
    }

    /// Markup prices have two decimals and never fall below the agreed price.
    #[test]
    fn prop_markup_is_rounded_and_not_lower(agreed in arb_money()) {
        let price = markup_price(agreed);
        prop_assert!(price.scale() <= 2);
        prop_assert!(price >= agreed);
    }
}
