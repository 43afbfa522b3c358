//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing a `VehicleId` where a `SaleId` is expected.
//! Every table uses an auto-increment integer key, so the wrappers hold an `i32`.

use serde::{Deserialize, Serialize};

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub i32);

        impl $name {
            /// Creates an ID from a raw key value.
            #[must_use]
            pub const fn new(value: i32) -> Self {
                Self(value)
            }

            /// Returns the raw key value.
            #[must_use]
            pub const fn into_inner(self) -> i32 {
                self.0
            }

            /// Returns true if the key can refer to a stored row.
            #[must_use]
            pub const fn is_valid(self) -> bool {
                self.0 > 0
            }
        }

        impl From<i32> for $name {
            fn from(value: i32) -> Self {
                Self(value)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.trim().parse()?))
            }
        }
    };
}

typed_id!(AccountId, "Unique identifier for a login account.");
typed_id!(PurchaseOrderId, "Unique identifier for a purchase order.");
typed_id!(SaleId, "Unique identifier for a sale.");
typed_id!(VehicleId, "Unique identifier for a vehicle.");
typed_id!(SupplierId, "Unique identifier for a supplier.");
typed_id!(MovementId, "Unique identifier for an inventory movement.");
typed_id!(AuditId, "Unique identifier for an audit log entry.");
