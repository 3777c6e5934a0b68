//! # Rental Actor
//!
//! Owns every rental record and applies the lifecycle transitions.
//!
//! - [`entity`] - [`ActorEntity`](store_actor::ActorEntity) implementation for [`Rental`]
//! - [`error`] - [`RentalError`]
//! - [`actions`] - [`RentalAction`] transitions and their [`RentalActionResult`]
//!
//! Pickup-code uniqueness is enforced here as well: a new rental whose code matches a live
//! rental is rejected on create, which the client reports as
//! [`RentalError::CodeCollision`].
//!
//! The actor must be started with a [`PendencyClient`](crate::clients::PendencyClient)
//! as context:
//!
//! ```rust,ignore
//! let (rental_actor, rental_client) = rental_actor::new(32);
//! tokio::spawn(rental_actor.run(pendency_client.clone()));
//! ```

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::clients::RentalClient;
use crate::model::{Rental, RentalId};
use store_actor::ResourceActor;

/// Creates an empty rental actor and its client.
pub fn new(capacity: usize) -> (ResourceActor<Rental>, RentalClient) {
    restore(capacity, Vec::new())
}

/// Creates a rental actor seeded with `rentals`.
pub fn restore(capacity: usize, rentals: Vec<Rental>) -> (ResourceActor<Rental>, RentalClient) {
    let (actor, generic_client) = ResourceActor::with_records(capacity, RentalId::new, rentals);
    (actor, RentalClient::new(generic_client))
}
