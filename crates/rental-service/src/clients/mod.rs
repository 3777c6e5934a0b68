//! # Store Clients
//!
//! Typed wrappers around each store's [`ResourceClient`](store_actor::ResourceClient). They
//! turn generic requests into domain operations (`claim_available`, `confirm_pickup`,
//! `has_unresolved`) and translate [`FrameworkError`](store_actor::FrameworkError)s into the
//! store's own error type: a boxed entity error is unwrapped back to the domain error it
//! carries, everything else becomes `ActorCommunicationError`.
//!
//! All clients are cheap to clone and implement [`ActorClient`](store_actor::ActorClient),
//! which supplies `get`, `delete` and `find`.

mod inventory_client;
mod pendency_client;
mod product_client;
mod rental_client;

pub use inventory_client::InventoryClient;
pub use pendency_client::PendencyClient;
pub use product_client::ProductClient;
pub use rental_client::RentalClient;
