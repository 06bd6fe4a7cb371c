//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing a `ProjectId` where a
//! `ProformaId` is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new random ID using UUID v7 (time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

typed_id!(ProjectId, "Unique identifier for a project.");
typed_id!(UserId, "Unique identifier for a user.");
typed_id!(ReceivableId, "Unique identifier for an accounts-receivable.");
typed_id!(PurchaseOrderId, "Unique identifier for a purchase order.");

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_typed_ids_are_distinct_types() {
        let project = ProjectId::new();
        let user = UserId::new();
        // Same inner representation, different types; this only checks the
        // accessors line up.
        assert_ne!(project.into_inner(), user.into_inner());
    }

    #[test]
    fn test_roundtrip_through_string() {
        let id = PurchaseOrderId::new();
        let parsed = PurchaseOrderId::from_str(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_ids_are_time_ordered() {
        let a = ReceivableId::new();
        let b = ReceivableId::new();
        // UUIDv7 is time-ordered, so consecutive IDs sort in creation order.
        assert!(a.into_inner() <= b.into_inner());
    }
}
