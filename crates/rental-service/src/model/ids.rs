//! Typed identifiers.
//!
//! Every identifier is a UUID v4 wrapped in its own newtype so a rental id can never be passed
//! where an inventory item id is expected. `Display` prefixes the kind (`rental_3f2a...`),
//! which keeps log lines and error messages self-describing.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! uuid_ids {
    ($($entity:ident => $prefix:literal),* $(,)?) => {
        paste::paste! {
            $(
                #[doc = concat!("Type-safe identifier for ", stringify!($entity), " records.")]
                #[derive(
                    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
                )]
                #[serde(transparent)]
                pub struct [<$entity Id>](pub Uuid);

                impl [<$entity Id>] {
                    /// A fresh random id.
                    pub fn new() -> Self {
                        Self(Uuid::new_v4())
                    }
                }

                impl Default for [<$entity Id>] {
                    fn default() -> Self {
                        Self::new()
                    }
                }

                impl From<Uuid> for [<$entity Id>] {
                    fn from(id: Uuid) -> Self {
                        Self(id)
                    }
                }

                impl fmt::Display for [<$entity Id>] {
                    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                        write!(f, concat!($prefix, "_{}"), self.0)
                    }
                }
            )*
        }
    };
}

uuid_ids! {
    InventoryItem => "item",
    Rental => "rental",
    Pendency => "pendency",
    Product => "product",
    Customer => "customer",
    Color => "color",
    Size => "size",
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_kind_prefix() {
        let raw = Uuid::nil();
        assert_eq!(
            RentalId::from(raw).to_string(),
            "rental_00000000-0000-0000-0000-000000000000"
        );
        assert!(InventoryItemId::from(raw).to_string().starts_with("item_"));
    }

    #[test]
    fn ids_serialize_as_bare_uuids() {
        let id = CustomerId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.0));
        let back: CustomerId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn fresh_ids_are_distinct() {
        assert_ne!(PendencyId::new(), PendencyId::new());
    }
}
