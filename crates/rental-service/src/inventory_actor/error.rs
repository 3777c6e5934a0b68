//! Error types for the inventory store.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum InventoryError {
    #[error("Inventory item not found: {0}")]
    NotFound(String),

    /// The unit is held by a rental and cannot be removed.
    #[error("Inventory item {0} is reserved")]
    InUse(String),

    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
