//! Error types for the pendency ledger.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum PendencyError {
    #[error("Pendency not found: {0}")]
    NotFound(String),

    #[error("Pendency {0} is already resolved")]
    AlreadyResolved(String),

    /// The rental already has a pendency; carries its id.
    #[error("Rental already has pendency {0}")]
    AlreadyRaised(String),

    #[error("Invalid pendency: {0}")]
    InvalidRequest(String),

    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
