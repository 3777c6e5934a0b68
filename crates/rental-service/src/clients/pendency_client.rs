//! # Pendency Client
//!
//! Gate checks and bookkeeping on the pendency ledger.

use crate::model::{CustomerId, Pendency, PendencyCreate, PendencyId, RentalId};
use crate::pendency_actor::{PendencyAction, PendencyError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use store_actor::{ActorClient, Filter, FrameworkError, ResourceClient};
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct PendencyClient {
    inner: ResourceClient<Pendency>,
}

#[async_trait]
impl ActorClient<Pendency> for PendencyClient {
    type Error = PendencyError;

    fn inner(&self) -> &ResourceClient<Pendency> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e.downcast_entity::<PendencyError>() {
            Ok(err) => err,
            Err(FrameworkError::NotFound(id)) => PendencyError::NotFound(id),
            Err(FrameworkError::Conflict(existing)) => PendencyError::AlreadyRaised(existing),
            Err(other) => PendencyError::ActorCommunicationError(other.to_string()),
        }
    }
}

impl PendencyClient {
    pub fn new(inner: ResourceClient<Pendency>) -> Self {
        Self { inner }
    }

    /// Raises a pendency and returns it as stored.
    ///
    /// Fails with [`PendencyError::AlreadyRaised`] when the rental already has one.
    #[instrument(skip(self))]
    pub async fn create_pendency(&self, params: PendencyCreate) -> Result<Pendency, PendencyError> {
        debug!("Sending request");
        let id = self.inner.create(params).await.map_err(Self::map_error)?;
        self.get(id)
            .await?
            .ok_or_else(|| PendencyError::NotFound(id.to_string()))
    }

    /// Whether the customer owes anything.
    #[instrument(skip(self))]
    pub async fn has_unresolved(&self, customer_id: CustomerId) -> Result<bool, PendencyError> {
        let open = self
            .find(Filter::new("unresolved by customer", move |p: &Pendency| {
                p.customer_id == customer_id && !p.is_resolved()
            }))
            .await?;
        Ok(!open.is_empty())
    }

    #[instrument(skip(self))]
    pub async fn resolve(
        &self,
        id: PendencyId,
        at: DateTime<Utc>,
    ) -> Result<Pendency, PendencyError> {
        self.inner
            .perform_action(id, PendencyAction::Resolve { at })
            .await
            .map_err(Self::map_error)
    }

    /// Every pendency of a customer, resolved or not.
    #[instrument(skip(self))]
    pub async fn for_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Pendency>, PendencyError> {
        self.find(Filter::new("by customer", move |p: &Pendency| {
            p.customer_id == customer_id
        }))
        .await
    }

    /// The pendency raised for the rental, if any.
    #[instrument(skip(self))]
    pub async fn for_rental(&self, rental_id: RentalId) -> Result<Option<Pendency>, PendencyError> {
        let mut raised = self
            .find(Filter::new("by rental", move |p: &Pendency| {
                p.rental_id == rental_id
            }))
            .await?;
        Ok(raised.pop())
    }

    /// Rentals that already have a pendency.
    #[instrument(skip(self))]
    pub async fn charged_rentals(&self) -> Result<HashSet<RentalId>, PendencyError> {
        let all = self.find(Filter::all()).await?;
        Ok(all.into_iter().map(|p| p.rental_id).collect())
    }

    /// Whether any pendency, resolved or not, refers to the rental.
    #[instrument(skip(self))]
    pub async fn any_for_rental(&self, rental_id: RentalId) -> Result<bool, PendencyError> {
        let referencing = self
            .find(Filter::new("by rental", move |p: &Pendency| {
                p.rental_id == rental_id
            }))
            .await?;
        Ok(!referencing.is_empty())
    }
}
