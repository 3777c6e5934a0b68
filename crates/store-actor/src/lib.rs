//! # Store Actor
//!
//! Building blocks for in-memory record stores that are owned by a single Tokio task and
//! reached only through message passing.
//!
//! Each record type gets its own [`ResourceActor`]. The actor keeps its records in a plain
//! `HashMap` and handles one request at a time, so a compare-and-set on a field, or a
//! uniqueness check on insert, is linearizable without locks. Clients ([`ResourceClient`])
//! are cheap to clone and can be handed to any number of tasks.
//!
//! ## Layers
//!
//! 1. **Entity** ([`ActorEntity`]) - the record, its payloads, hooks and actions
//! 2. **Runtime** ([`ResourceActor`]) - the request loop that owns the store
//! 3. **Interface** ([`ResourceClient`], [`ActorClient`]) - typed request/response calls
//!
//! ## Requests
//!
//! | Request | Effect |
//! |---|---|
//! | `create` | builds a record from its payload, runs `on_create`, rejects conflicts |
//! | `get` | clone of one record, or `None` |
//! | `update` | runs `on_update` on a draft, commits on success |
//! | `delete` | runs `on_delete`, which may veto, then removes |
//! | `perform_action` | runs `handle_action` on a draft, commits on success |
//! | `query` | clones of every record matching a [`Filter`] |
//!
//! ## Context Injection
//!
//! Dependencies are passed to [`ResourceActor::run`] rather than to the constructor, so a
//! store may depend on a client of a store created after it:
//!
//! ```rust
//! use store_actor::{ActorEntity, ResourceActor, ResourceClient};
//! use async_trait::async_trait;
//!
//! #[derive(Clone, Debug)] struct Shelf { id: u32 }
//! #[derive(Debug)] struct ShelfCreate;
//! #[derive(Debug, thiserror::Error)] #[error("shelf")] struct ShelfError;
//!
//! #[async_trait]
//! impl ActorEntity for Shelf {
//!     type Id = u32; type Create = ShelfCreate; type Update = (); type Action = ();
//!     type ActionResult = (); type Context = (); type Error = ShelfError;
//!     fn id(&self) -> &u32 { &self.id }
//!     fn from_create_params(id: u32, _: ShelfCreate) -> Result<Self, ShelfError> { Ok(Self { id }) }
//!     async fn on_update(&mut self, _: (), _: &()) -> Result<(), ShelfError> { Ok(()) }
//!     async fn handle_action(&mut self, _: (), _: &()) -> Result<(), ShelfError> { Ok(()) }
//! }
//!
//! #[derive(Clone, Debug)] struct Crate { id: u32, shelf: u32 }
//! #[derive(Debug)] struct CrateCreate { shelf: u32 }
//! #[derive(Debug, thiserror::Error)] #[error("no such shelf")] struct CrateError;
//!
//! #[async_trait]
//! impl ActorEntity for Crate {
//!     type Id = u32; type Create = CrateCreate; type Update = (); type Action = ();
//!     type ActionResult = (); type Context = ResourceClient<Shelf>; type Error = CrateError;
//!     fn id(&self) -> &u32 { &self.id }
//!     fn from_create_params(id: u32, p: CrateCreate) -> Result<Self, CrateError> {
//!         Ok(Self { id, shelf: p.shelf })
//!     }
//!     async fn on_create(&mut self, shelves: &ResourceClient<Shelf>) -> Result<(), CrateError> {
//!         match shelves.get(self.shelf).await {
//!             Ok(Some(_)) => Ok(()),
//!             _ => Err(CrateError),
//!         }
//!     }
//!     async fn on_update(&mut self, _: (), _: &ResourceClient<Shelf>) -> Result<(), CrateError> { Ok(()) }
//!     async fn handle_action(&mut self, _: (), _: &ResourceClient<Shelf>) -> Result<(), CrateError> { Ok(()) }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut next_shelf = 0;
//!     let mut next_crate = 100;
//!     let (shelf_actor, shelves) = ResourceActor::<Shelf>::new(10, move || { next_shelf += 1; next_shelf });
//!     let (crate_actor, crates) = ResourceActor::<Crate>::new(10, move || { next_crate += 1; next_crate });
//!
//!     tokio::spawn(shelf_actor.run(()));
//!     tokio::spawn(crate_actor.run(shelves.clone()));
//!
//!     let shelf = shelves.create(ShelfCreate).await.unwrap();
//!     assert!(crates.create(CrateCreate { shelf }).await.is_ok());
//!     assert!(crates.create(CrateCreate { shelf: 99 }).await.is_err());
//! }
//! ```
//!
//! ## Testing
//!
//! [`mock::MockClient`] answers a real [`ResourceClient`] from scripted replies, so code
//! layered on top of a store can be tested without running one. See the [`mock`] module.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod filter;
pub mod message;
pub mod mock;
pub mod tracing;

pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use filter::Filter;
pub use message::{ResourceRequest, Response};
