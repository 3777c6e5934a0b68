//! # Generic Messages
//!
//! The request type exchanged between a `ResourceClient` and its `ResourceActor`.

use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::filter::Filter;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Message sent to a store actor.
///
/// The variants are the CRUD lifecycle of a record (Create, Get, Update, Delete), a custom
/// `Action` for record-specific transitions, and a `Query` that returns every record
/// matching a [`Filter`]. Everything is typed through the associated types of
/// [`ActorEntity`], so an inventory payload can never reach the rental store.
#[derive(Debug)]
pub enum ResourceRequest<T: ActorEntity> {
    Create {
        params: T::Create,
        respond_to: Response<T::Id>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    Update {
        id: T::Id,
        update: T::Update,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<()>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
    Query {
        filter: Filter<T>,
        respond_to: Response<Vec<T>>,
    },
}
