use crate::model::{ColorId, InventoryItemId, ProductId, SizeId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Availability of one physical unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InventoryStatus {
    /// On the shelf and claimable by a reservation.
    Available,
    /// Held by a Pending or Active rental.
    Reserved,
    /// Withdrawn from circulation by catalog management.
    Unavailable,
}

impl fmt::Display for InventoryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            InventoryStatus::Available => "Available",
            InventoryStatus::Reserved => "Reserved",
            InventoryStatus::Unavailable => "Unavailable",
        };
        f.write_str(label)
    }
}

/// One physical unit of a product variant (color + size).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: InventoryItemId,
    pub product_id: ProductId,
    pub color_id: ColorId,
    pub size_id: SizeId,
    pub status: InventoryStatus,
}

impl InventoryItem {
    /// Whether this unit is the requested variant of `product_id`.
    pub fn is_variant(&self, product_id: ProductId, color_id: ColorId, size_id: SizeId) -> bool {
        self.product_id == product_id && self.color_id == color_id && self.size_id == size_id
    }
}

/// Payload for registering a unit. New units start out `Available`.
#[derive(Debug, Clone)]
pub struct InventoryItemCreate {
    pub product_id: ProductId,
    pub color_id: ColorId,
    pub size_id: SizeId,
}
