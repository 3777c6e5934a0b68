//! # ActorClient Trait
//!
//! Common surface for store-specific clients: `get`, `delete` and `find` come for free once a
//! wrapper exposes its inner [`ResourceClient`] and says how to translate framework errors.
use crate::{ActorEntity, Filter, FrameworkError, ResourceClient};
use async_trait::async_trait;

/// Trait for store-specific clients to inherit the standard read/delete operations.
///
/// # Example
///
/// ```rust
/// use store_actor::{ActorClient, ActorEntity, Filter, FrameworkError, ResourceClient};
/// use async_trait::async_trait;
///
/// #[derive(Clone, Debug)] struct Bin { id: u32, full: bool }
/// #[derive(Debug)] struct BinCreate;
/// #[derive(Debug, thiserror::Error)] #[error("{0}")] struct BinError(String);
///
/// #[async_trait]
/// impl ActorEntity for Bin {
///     type Id = u32; type Create = BinCreate; type Update = (); type Action = ();
///     type ActionResult = (); type Context = (); type Error = BinError;
///     fn id(&self) -> &u32 { &self.id }
///     fn from_create_params(id: u32, _: BinCreate) -> Result<Self, BinError> {
///         Ok(Self { id, full: false })
///     }
///     async fn on_update(&mut self, _: (), _: &()) -> Result<(), BinError> { Ok(()) }
///     async fn handle_action(&mut self, _: (), _: &()) -> Result<(), BinError> { Ok(()) }
/// }
///
/// struct BinClient { inner: ResourceClient<Bin> }
///
/// #[async_trait]
/// impl ActorClient<Bin> for BinClient {
///     type Error = BinError;
///     fn inner(&self) -> &ResourceClient<Bin> { &self.inner }
///     fn map_error(e: FrameworkError) -> BinError { BinError(e.to_string()) }
/// }
///
/// async fn usage(client: BinClient) {
///     let _ = client.get(1).await;
///     let _ = client.find(Filter::new("full", |b: &Bin| b.full)).await;
///     let _ = client.delete(1).await;
/// }
/// ```
#[async_trait]
pub trait ActorClient<T: ActorEntity>: Send + Sync {
    /// The store-specific error type.
    type Error: Send + Sync;

    /// Access the inner generic ResourceClient.
    fn inner(&self) -> &ResourceClient<T>;

    /// Map framework errors to the store-specific error type.
    fn map_error(e: FrameworkError) -> Self::Error;

    /// Fetch a record by id.
    #[tracing::instrument(skip(self))]
    async fn get(&self, id: T::Id) -> Result<Option<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().get(id).await.map_err(Self::map_error)
    }

    /// Delete a record by id.
    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: T::Id) -> Result<(), Self::Error> {
        tracing::debug!("Sending request");
        self.inner().delete(id).await.map_err(Self::map_error)
    }

    /// Every record matching `filter`.
    #[tracing::instrument(skip(self))]
    async fn find(&self, filter: Filter<T>) -> Result<Vec<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().query(filter).await.map_err(Self::map_error)
    }
}
