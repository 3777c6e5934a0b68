//! The caller-facing error of every lifecycle operation.

use crate::inventory_actor::InventoryError;
use crate::pendency_actor::PendencyError;
use crate::product_actor::ProductError;
use crate::rental_actor::RentalError;
use thiserror::Error;

/// Why a lifecycle operation was refused or failed.
///
/// Every variant except [`LifecycleError::StorageFailure`] is a business rule the caller can
/// act on; the messages are meant to be shown to them as is.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LifecycleError {
    #[error("No unit of this product is available in the requested color and size")]
    NoAvailableInventory,

    #[error("Invalid pickup code")]
    InvalidCode,

    #[error("This reservation was cancelled")]
    AlreadyCancelled,

    #[error("Operation not allowed: {0}")]
    InvalidState(String),

    #[error("The rental has a pendency and cannot be deleted")]
    HasPendency,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("The customer has an unresolved pendency")]
    PendencyBlocksReservation,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Storage failure: {0}")]
    StorageFailure(String),
}

impl LifecycleError {
    /// HTTP status an API layer should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            LifecycleError::StorageFailure(_) => 500,
            _ => 400,
        }
    }
}

impl From<InventoryError> for LifecycleError {
    fn from(e: InventoryError) -> Self {
        match e {
            InventoryError::NotFound(id) => LifecycleError::NotFound(id),
            InventoryError::InUse(id) => LifecycleError::InvalidState(format!("{} is reserved", id)),
            InventoryError::ActorCommunicationError(msg) => LifecycleError::StorageFailure(msg),
        }
    }
}

impl From<RentalError> for LifecycleError {
    fn from(e: RentalError) -> Self {
        match e {
            RentalError::NotFound(id) => LifecycleError::NotFound(id),
            RentalError::AlreadyCancelled(_) => LifecycleError::AlreadyCancelled,
            RentalError::InvalidState { status, expected } => LifecycleError::InvalidState(
                format!("rental is {}, expected {}", status, expected),
            ),
            RentalError::CodeCollision(existing) => {
                LifecycleError::StorageFailure(format!("pickup code held by {}", existing))
            }
            RentalError::HasPendency(_) => LifecycleError::HasPendency,
            RentalError::InvalidRequest(msg) => LifecycleError::InvalidRequest(msg),
            RentalError::ActorCommunicationError(msg) => LifecycleError::StorageFailure(msg),
        }
    }
}

impl From<PendencyError> for LifecycleError {
    fn from(e: PendencyError) -> Self {
        match e {
            PendencyError::NotFound(id) => LifecycleError::NotFound(id),
            PendencyError::AlreadyResolved(id) => {
                LifecycleError::InvalidState(format!("{} is already resolved", id))
            }
            PendencyError::AlreadyRaised(id) => {
                LifecycleError::InvalidState(format!("the rental is already charged by {}", id))
            }
            PendencyError::InvalidRequest(msg) => LifecycleError::InvalidRequest(msg),
            PendencyError::ActorCommunicationError(msg) => LifecycleError::StorageFailure(msg),
        }
    }
}

impl From<ProductError> for LifecycleError {
    fn from(e: ProductError) -> Self {
        match e {
            ProductError::NotFound(id) => LifecycleError::NotFound(id),
            ProductError::InvalidRate(_) | ProductError::EmptyName => {
                LifecycleError::InvalidRequest(e.to_string())
            }
            ProductError::ActorCommunicationError(msg) => LifecycleError::StorageFailure(msg),
        }
    }
}
