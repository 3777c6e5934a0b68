//! # Rental Client
//!
//! Lookups by pickup code and the lifecycle transitions of the rental store.

use crate::config::RentalPolicy;
use crate::model::{CustomerId, PickupCode, Rental, RentalCreate, RentalId, RentalStatus};
use crate::rental_actor::{RentalAction, RentalActionResult, RentalError, ReturnAssessment};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::cmp::Reverse;
use store_actor::{ActorClient, Filter, FrameworkError, ResourceClient};
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct RentalClient {
    inner: ResourceClient<Rental>,
}

#[async_trait]
impl ActorClient<Rental> for RentalClient {
    type Error = RentalError;

    fn inner(&self) -> &ResourceClient<Rental> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e.downcast_entity::<RentalError>() {
            Ok(err) => err,
            Err(FrameworkError::NotFound(id)) => RentalError::NotFound(id),
            Err(FrameworkError::Conflict(existing)) => RentalError::CodeCollision(existing),
            Err(other) => RentalError::ActorCommunicationError(other.to_string()),
        }
    }
}

/// Newest reservation first.
fn newest_first(mut rentals: Vec<Rental>) -> Vec<Rental> {
    rentals.sort_by_key(|rental| Reverse(rental.reserved_at));
    rentals
}

impl RentalClient {
    pub fn new(inner: ResourceClient<Rental>) -> Self {
        Self { inner }
    }

    /// Records a new Pending rental.
    ///
    /// Fails with [`RentalError::CodeCollision`] when a live rental already holds the code.
    #[instrument(skip(self))]
    pub async fn create_rental(&self, params: RentalCreate) -> Result<RentalId, RentalError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    /// The rental a pickup code refers to.
    ///
    /// Codes are only unique among live rentals, so when a code was reused the live rental
    /// wins, then the most recent reservation.
    #[instrument(skip(self))]
    pub async fn find_by_code(&self, code: &PickupCode) -> Result<Option<Rental>, RentalError> {
        let wanted = code.clone();
        let matches = self
            .find(Filter::new("by code", move |rental: &Rental| rental.code == wanted))
            .await?;
        Ok(matches
            .into_iter()
            .max_by_key(|rental| (rental.status.is_live(), rental.reserved_at)))
    }

    #[instrument(skip(self))]
    pub async fn confirm_pickup(
        &self,
        id: RentalId,
        at: DateTime<Utc>,
    ) -> Result<Rental, RentalError> {
        match self.act(id, RentalAction::ConfirmPickup { at }).await? {
            RentalActionResult::ConfirmPickup(rental) => Ok(rental),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn confirm_return(
        &self,
        id: RentalId,
        at: DateTime<Utc>,
        policy: RentalPolicy,
    ) -> Result<ReturnAssessment, RentalError> {
        match self.act(id, RentalAction::ConfirmReturn { at, policy }).await? {
            RentalActionResult::ConfirmReturn(assessment) => Ok(assessment),
            other => Err(unexpected(other)),
        }
    }

    /// Cancels the rental if it is still Pending, returning it; `None` if it had moved on.
    #[instrument(skip(self))]
    pub async fn cancel_if_pending(
        &self,
        id: RentalId,
        at: DateTime<Utc>,
    ) -> Result<Option<Rental>, RentalError> {
        match self.act(id, RentalAction::CancelIfPending { at }).await? {
            RentalActionResult::CancelIfPending(cancelled) => Ok(cancelled),
            other => Err(unexpected(other)),
        }
    }

    /// All rentals, newest first, optionally restricted to one status.
    #[instrument(skip(self))]
    pub async fn list(&self, status: Option<RentalStatus>) -> Result<Vec<Rental>, RentalError> {
        let filter = match status {
            Some(status) => Filter::new("by status", move |rental: &Rental| {
                rental.status == status
            }),
            None => Filter::all(),
        };
        self.find(filter).await.map(newest_first)
    }

    /// A customer's rentals, newest first.
    #[instrument(skip(self))]
    pub async fn for_customer(&self, customer_id: CustomerId) -> Result<Vec<Rental>, RentalError> {
        self.find(Filter::new("by customer", move |rental: &Rental| {
            rental.customer_id == customer_id
        }))
        .await
        .map(newest_first)
    }

    /// Pending and Active rentals.
    #[instrument(skip(self))]
    pub async fn live(&self) -> Result<Vec<Rental>, RentalError> {
        self.find(Filter::new("live", |rental: &Rental| rental.status.is_live()))
            .await
    }

    /// Pending rentals whose hold has run out at `now`.
    #[instrument(skip(self))]
    pub async fn expired(&self, now: DateTime<Utc>) -> Result<Vec<Rental>, RentalError> {
        self.find(Filter::new("expired", move |rental: &Rental| {
            rental.is_expired(now)
        }))
        .await
    }

    async fn act(
        &self,
        id: RentalId,
        action: RentalAction,
    ) -> Result<RentalActionResult, RentalError> {
        self.inner
            .perform_action(id, action)
            .await
            .map_err(Self::map_error)
    }
}

fn unexpected(result: RentalActionResult) -> RentalError {
    RentalError::ActorCommunicationError(format!("unexpected action result {:?}", result))
}
