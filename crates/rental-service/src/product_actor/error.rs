//! Error types for the product catalog store.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProductError {
    #[error("Product not found: {0}")]
    NotFound(String),

    #[error("Invalid hourly rate: {0}")]
    InvalidRate(f64),

    #[error("Product name must not be empty")]
    EmptyName,

    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
