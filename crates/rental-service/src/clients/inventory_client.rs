//! # Inventory Client
//!
//! Availability queries and the compare-and-set claim used by reservations.

use crate::inventory_actor::{InventoryAction, InventoryActionResult, InventoryError};
use crate::model::{
    ColorId, InventoryItem, InventoryItemCreate, InventoryItemId, InventoryStatus, ProductId,
    SizeId,
};
use async_trait::async_trait;
use rand::seq::SliceRandom;
use store_actor::{ActorClient, Filter, FrameworkError, ResourceClient};
use tracing::{debug, instrument, warn};

#[derive(Clone)]
pub struct InventoryClient {
    inner: ResourceClient<InventoryItem>,
}

#[async_trait]
impl ActorClient<InventoryItem> for InventoryClient {
    type Error = InventoryError;

    fn inner(&self) -> &ResourceClient<InventoryItem> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e.downcast_entity::<InventoryError>() {
            Ok(err) => err,
            Err(FrameworkError::NotFound(id)) => InventoryError::NotFound(id),
            Err(other) => InventoryError::ActorCommunicationError(other.to_string()),
        }
    }
}

impl InventoryClient {
    pub fn new(inner: ResourceClient<InventoryItem>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn create_item(
        &self,
        params: InventoryItemCreate,
    ) -> Result<InventoryItemId, InventoryError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    /// Some `Available` unit of the variant, if there is one.
    #[instrument(skip(self))]
    pub async fn find_available_item(
        &self,
        product_id: ProductId,
        color_id: ColorId,
        size_id: SizeId,
    ) -> Result<Option<InventoryItem>, InventoryError> {
        let candidates = self
            .find(Filter::new("available variant", move |item: &InventoryItem| {
                item.status == InventoryStatus::Available
                    && item.is_variant(product_id, color_id, size_id)
            }))
            .await?;
        Ok(pick_one(candidates))
    }

    /// Moves the unit to `new` only if it is currently `expected`. Returns whether it moved.
    #[instrument(skip(self))]
    pub async fn try_set_status(
        &self,
        id: InventoryItemId,
        expected: InventoryStatus,
        new: InventoryStatus,
    ) -> Result<bool, InventoryError> {
        match self
            .inner
            .perform_action(id, InventoryAction::TrySetStatus { expected, new })
            .await
            .map_err(Self::map_error)?
        {
            InventoryActionResult::TrySetStatus(applied) => Ok(applied),
            other => Err(unexpected(other)),
        }
    }

    /// Writes `new` regardless of the current status. Returns the previous status.
    #[instrument(skip(self))]
    pub async fn set_status(
        &self,
        id: InventoryItemId,
        new: InventoryStatus,
    ) -> Result<InventoryStatus, InventoryError> {
        match self
            .inner
            .perform_action(id, InventoryAction::SetStatus(new))
            .await
            .map_err(Self::map_error)?
        {
            InventoryActionResult::SetStatus(previous) => Ok(previous),
            other => Err(unexpected(other)),
        }
    }

    /// Finds an `Available` unit of the variant and reserves it.
    ///
    /// Each attempt draws a random candidate so concurrent reservations spread over the
    /// free units instead of all racing for the same one. A lost compare-and-set means
    /// another reservation took that unit, so the loop keeps going while candidates remain;
    /// `max_attempts` only bounds pathological contention. `None` means no unit of the
    /// variant is `Available`, or the bound was hit.
    #[instrument(skip(self))]
    pub async fn claim_available(
        &self,
        product_id: ProductId,
        color_id: ColorId,
        size_id: SizeId,
        max_attempts: u32,
    ) -> Result<Option<InventoryItem>, InventoryError> {
        for attempt in 1..=max_attempts {
            let Some(mut item) = self
                .find_available_item(product_id, color_id, size_id)
                .await?
            else {
                return Ok(None);
            };
            match self
                .try_set_status(item.id, InventoryStatus::Available, InventoryStatus::Reserved)
                .await
            {
                Ok(true) => {
                    item.status = InventoryStatus::Reserved;
                    return Ok(Some(item));
                }
                Ok(false) | Err(InventoryError::NotFound(_)) => {
                    debug!(attempt, item_id = %item.id, "Lost claim race");
                }
                Err(e) => return Err(e),
            }
        }
        warn!(max_attempts, "Gave up claiming under contention");
        Ok(None)
    }

    /// Number of `Available` units of a product, across all variants.
    #[instrument(skip(self))]
    pub async fn available_quantity(&self, product_id: ProductId) -> Result<usize, InventoryError> {
        let available = self
            .find(Filter::new("available units", move |item: &InventoryItem| {
                item.product_id == product_id && item.status == InventoryStatus::Available
            }))
            .await?;
        Ok(available.len())
    }

    /// Every unit currently in `status`.
    #[instrument(skip(self))]
    pub async fn with_status(
        &self,
        status: InventoryStatus,
    ) -> Result<Vec<InventoryItem>, InventoryError> {
        self.find(Filter::new("by status", move |item: &InventoryItem| {
            item.status == status
        }))
        .await
    }
}

fn pick_one(candidates: Vec<InventoryItem>) -> Option<InventoryItem> {
    candidates.choose(&mut rand::thread_rng()).cloned()
}

fn unexpected(result: InventoryActionResult) -> InventoryError {
    InventoryError::ActorCommunicationError(format!("unexpected action result {:?}", result))
}
