//! # Inventory Actor
//!
//! Owns every physical unit and its availability.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](store_actor::ActorEntity) implementation for
//!   [`InventoryItem`]
//! - [`error`] - [`InventoryError`]
//! - [`actions`] - [`InventoryAction`] status writes, including the compare-and-set that
//!   makes claiming a unit race-free
//! - [`new()`] / [`restore()`] - factories returning the actor and its
//!   [`InventoryClient`]
//!
//! Two reservations racing for the last unit both find it `Available`, but only the first
//! `TrySetStatus { expected: Available, new: Reserved }` to reach the actor applies; the
//! second sees `false` and looks for another unit.

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::clients::InventoryClient;
use crate::model::{InventoryItem, InventoryItemId};
use store_actor::ResourceActor;

/// Creates an empty inventory actor and its client.
pub fn new(capacity: usize) -> (ResourceActor<InventoryItem>, InventoryClient) {
    restore(capacity, Vec::new())
}

/// Creates an inventory actor seeded with `items`.
pub fn restore(
    capacity: usize,
    items: Vec<InventoryItem>,
) -> (ResourceActor<InventoryItem>, InventoryClient) {
    let (actor, generic_client) = ResourceActor::with_records(capacity, InventoryItemId::new, items);
    (actor, InventoryClient::new(generic_client))
}
