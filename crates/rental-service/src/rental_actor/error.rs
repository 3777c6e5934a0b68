//! Error types for the rental store.

use crate::model::RentalStatus;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum RentalError {
    #[error("Rental not found: {0}")]
    NotFound(String),

    #[error("Reservation {0} was cancelled")]
    AlreadyCancelled(String),

    #[error("Rental is {status}, expected {expected}")]
    InvalidState {
        status: RentalStatus,
        expected: RentalStatus,
    },

    /// A live rental already holds the pickup code.
    #[error("Pickup code collides with live rental {0}")]
    CodeCollision(String),

    #[error("Rental {0} has a pendency")]
    HasPendency(String),

    #[error("Invalid rental: {0}")]
    InvalidRequest(String),

    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
