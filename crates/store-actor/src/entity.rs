//! # ActorEntity Trait
//!
//! The `ActorEntity` trait is the contract every stored record (inventory item, rental,
//! pendency, product, ...) implements to be owned by a [`ResourceActor`](crate::ResourceActor).
//! It fixes the associated types for ids, create/update payloads, actions, context and errors,
//! and provides the lifecycle hooks the actor calls while it processes requests.
//!
//! Because the actor handles one request at a time, everything a hook does to `self` is
//! atomic with respect to every other request sent to the same store. Conditional updates
//! (compare-and-set on a status field, cancel-if-still-pending) belong in
//! [`ActorEntity::handle_action`] for that reason.
//!
//! # Provided Methods
//! - [`ActorEntity::on_create`]
//! - [`ActorEntity::on_delete`]
//! - [`ActorEntity::conflicts_with`]
//!
//! The defaults accept everything.

use async_trait::async_trait;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any record must implement to be managed by a `ResourceActor`.
///
/// # Async & Context
/// Hooks are `#[async_trait]` so they can call other stores. The `Context` type is injected
/// into every hook by [`ResourceActor::run`](crate::ResourceActor::run), which lets a store
/// depend on clients that were created after it ("late binding").
#[async_trait]
pub trait ActorEntity: Clone + Send + Sync + 'static {
    /// The unique identifier for this record.
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug;

    /// The data required to create a new record.
    type Create: Send + Sync + Debug;

    /// The data required to update an existing record.
    type Update: Send + Sync + Debug;

    /// Record-specific operations (e.g. a status compare-and-set).
    type Action: Send + Sync + Debug;

    /// The result type returned by custom actions.
    type ActionResult: Send + Sync + Debug;

    /// The runtime context (dependencies) injected into the actor.
    /// Use `()` if no dependencies are needed.
    type Context: Send + Sync;

    /// One error enum per store, shared by every hook and action.
    type Error: std::error::Error + Send + Sync + 'static;

    /// The id the record is stored under.
    fn id(&self) -> &Self::Id;

    /// Construct the full record from a freshly generated id and the payload.
    /// This is called synchronously before `on_create`.
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    /// Whether `self` may not coexist with `other` in the same store.
    ///
    /// Checked by the actor against every stored record before a new record is inserted,
    /// inside the same request, so a unique key can never be issued twice.
    fn conflicts_with(&self, _other: &Self) -> bool {
        false
    }

    // --- Lifecycle Hooks (Async) ---

    /// Called after the record is built and before it is stored.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called when an update request is received.
    async fn on_update(
        &mut self,
        update: Self::Update,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error>;

    /// Called immediately before the record is removed. Returning an error vetoes the delete.
    async fn on_delete(&self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    // --- Action Handler (Async) ---

    /// Handle a record-specific action.
    async fn handle_action(
        &mut self,
        action: Self::Action,
        _ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;
}
