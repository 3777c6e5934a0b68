//! # Product Actor
//!
//! The minimal catalog the lifecycle needs: products and their hourly rates. Full catalog
//! management (categories, suppliers, images) lives outside this service.

pub mod entity;
pub mod error;

pub use error::*;

use crate::clients::ProductClient;
use crate::model::{Product, ProductId};
use store_actor::ResourceActor;

/// Creates an empty product actor and its client.
pub fn new(capacity: usize) -> (ResourceActor<Product>, ProductClient) {
    restore(capacity, Vec::new())
}

/// Creates a product actor seeded with `products`.
pub fn restore(capacity: usize, products: Vec<Product>) -> (ResourceActor<Product>, ProductClient) {
    let (actor, generic_client) = ResourceActor::with_records(capacity, ProductId::new, products);
    (actor, ProductClient::new(generic_client))
}
