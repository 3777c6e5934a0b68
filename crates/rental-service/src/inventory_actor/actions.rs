//! Custom actions for the inventory store.
//!
//! Status changes go through actions rather than updates so the read of the current status
//! and the write of the new one happen inside a single request to the store.

use crate::model::InventoryStatus;

#[derive(Debug, Clone, Copy)]
pub enum InventoryAction {
    /// Compare-and-set: move to `new` only if the unit is currently `expected`.
    TrySetStatus {
        expected: InventoryStatus,
        new: InventoryStatus,
    },
    /// Unconditional status write.
    SetStatus(InventoryStatus),
}

/// Results from InventoryActions - variants match 1:1 with InventoryAction
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InventoryActionResult {
    /// Whether the compare-and-set applied.
    TrySetStatus(bool),
    /// The status before the write.
    SetStatus(InventoryStatus),
}
