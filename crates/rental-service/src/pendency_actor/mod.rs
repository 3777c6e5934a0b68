//! # Pendency Actor
//!
//! The ledger of debts raised by late returns. Pendencies are created alongside a
//! `CompletedLate` return and only ever change by being resolved.

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::clients::PendencyClient;
use crate::model::{Pendency, PendencyId};
use store_actor::ResourceActor;

/// Creates an empty pendency actor and its client.
pub fn new(capacity: usize) -> (ResourceActor<Pendency>, PendencyClient) {
    restore(capacity, Vec::new())
}

/// Creates a pendency actor seeded with `pendencies`.
pub fn restore(
    capacity: usize,
    pendencies: Vec<Pendency>,
) -> (ResourceActor<Pendency>, PendencyClient) {
    let (actor, generic_client) =
        ResourceActor::with_records(capacity, PendencyId::new, pendencies);
    (actor, PendencyClient::new(generic_client))
}
