//! # Rental Lifecycle Manager
//!
//! [`RentalManager`] drives a rental through reserve, pickup and return (or expiry), and
//! owns every rule that spans more than one store:
//!
//! - a customer with an unresolved pendency cannot reserve,
//! - a unit is claimed with a compare-and-set, never a read-then-write,
//! - a claimed unit is handed back if the rental cannot be recorded,
//! - a late return raises a pendency for the rental's customer.
//!
//! The manager holds no state of its own beyond clients, a clock and the policy. It is
//! cheap to clone, and concurrent operations only ever wait on store requests.
//!
//! ```text
//!         reserve()               confirm_pickup()            confirm_return() [on time]
//! (none) ----------> PENDING ----------------------> ACTIVE --------------------------> COMPLETED
//!                       |                              |
//!                       | expiry                       | confirm_return() [late]
//!                       v                              v
//!                   CANCELLED                   COMPLETED_LATE (+ pendency)
//! ```

mod error;
mod expiry;
mod outcome;
mod recovery;

pub use error::*;
pub use outcome::*;

use crate::clients::{InventoryClient, PendencyClient, ProductClient, RentalClient};
use crate::clock::Clock;
use crate::config::RentalPolicy;
use crate::model::{
    rental_price, ColorId, CustomerId, InventoryItemCreate, InventoryItemId, InventoryStatus,
    Lateness, Pendency, PendencyCreate, PendencyId, PickupCode, Product, ProductCreate, ProductId,
    ProductUpdate, Rental, RentalCreate, RentalId, RentalStatus, SizeId,
};
use crate::pendency_actor::PendencyError;
use crate::rental_actor::RentalError;
use std::cmp::Reverse;
use std::sync::Arc;
use store_actor::ActorClient;
use tokio::sync::watch;
use tracing::{debug, error, info, instrument, warn};

/// The four stores the lifecycle works against.
#[derive(Clone)]
pub struct Stores {
    pub inventory: InventoryClient,
    pub rentals: RentalClient,
    pub pendencies: PendencyClient,
    pub products: ProductClient,
}

/// Entry point for every rental operation.
#[derive(Clone)]
pub struct RentalManager {
    stores: Stores,
    clock: Arc<dyn Clock>,
    policy: RentalPolicy,
    /// Flips to `true` when the system shuts down; stops pending expiry timers.
    shutdown: watch::Receiver<bool>,
}

impl RentalManager {
    pub fn new(
        stores: Stores,
        clock: Arc<dyn Clock>,
        policy: RentalPolicy,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            stores,
            clock,
            policy,
            shutdown,
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Reserves one unit of the requested variant and returns its pickup code.
    ///
    /// The reservation is held for the policy's hold time; an expiry timer cancels it if it
    /// has not been picked up by then.
    #[instrument(skip(self, request), fields(customer_id = %request.customer_id, product_id = %request.product_id))]
    pub async fn reserve(&self, request: ReserveRequest) -> Result<Reservation, LifecycleError> {
        if request.duration_minutes == 0 {
            return Err(LifecycleError::InvalidRequest(
                "duration must be positive".to_string(),
            ));
        }
        if self
            .stores
            .pendencies
            .has_unresolved(request.customer_id)
            .await?
        {
            return Err(LifecycleError::PendencyBlocksReservation);
        }
        let hourly_rate = self.stores.products.hourly_rate(request.product_id).await?;

        let item = self
            .stores
            .inventory
            .claim_available(
                request.product_id,
                request.color_id,
                request.size_id,
                self.policy.max_claim_attempts,
            )
            .await?
            .ok_or(LifecycleError::NoAvailableInventory)?;
        debug!(item_id = %item.id, "Claimed unit");

        match self.record_reservation(&request, item.id, hourly_rate).await {
            Ok(reservation) => {
                self.arm_expiry(reservation.rental_id, self.policy.hold_timer());
                info!(rental_id = %reservation.rental_id, code = %reservation.code, "Reserved");
                Ok(reservation)
            }
            Err(e) => {
                warn!(item_id = %item.id, error = %e, "Rental not recorded, releasing unit");
                if let Err(release) = self
                    .stores
                    .inventory
                    .set_status(item.id, InventoryStatus::Available)
                    .await
                {
                    error!(item_id = %item.id, error = %release, "Unit left reserved");
                }
                Err(e)
            }
        }
    }

    /// Creates the Pending rental, retrying with a fresh code while the code is taken.
    async fn record_reservation(
        &self,
        request: &ReserveRequest,
        item_id: InventoryItemId,
        hourly_rate: f64,
    ) -> Result<Reservation, LifecycleError> {
        let reserved_at = self.clock.now();
        let expires_at = reserved_at + self.policy.hold();
        let price = rental_price(hourly_rate, request.duration_minutes);

        for attempt in 1..=self.policy.max_code_attempts {
            let code = PickupCode::random(self.policy.code_length);
            let params = RentalCreate {
                customer_id: request.customer_id,
                item_id,
                product_id: request.product_id,
                duration_minutes: request.duration_minutes,
                price,
                code: code.clone(),
                reserved_at,
                expires_at,
            };
            match self.stores.rentals.create_rental(params).await {
                Ok(rental_id) => {
                    return Ok(Reservation {
                        rental_id,
                        code,
                        price,
                        expires_at,
                    })
                }
                Err(RentalError::CodeCollision(existing)) => {
                    debug!(attempt, %existing, "Pickup code in use, drawing another");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(LifecycleError::StorageFailure(format!(
            "no free pickup code after {} attempts",
            self.policy.max_code_attempts
        )))
    }

    /// Hands the unit to the customer: Pending -> Active.
    #[instrument(skip(self))]
    pub async fn confirm_pickup(&self, code: &str) -> Result<Rental, LifecycleError> {
        let rental = self.rental_by_code(code).await?;
        let rental = self
            .stores
            .rentals
            .confirm_pickup(rental.id, self.clock.now())
            .await?;
        info!(rental_id = %rental.id, "Picked up");
        Ok(rental)
    }

    /// Takes the unit back: Active -> Completed, or CompletedLate with a pendency.
    ///
    /// The pendency is charged to the customer who reserved, never to `current_customer`.
    /// The two differ when someone returns the unit on the reserving customer's behalf,
    /// and the debt still follows the rental.
    ///
    /// The lateness is stored on the rental by the same request that completes it. If the
    /// pendency cannot be raised afterwards the call fails with `StorageFailure`, and
    /// [`RentalManager::raise_missing_pendencies`] charges the rental later from the stored
    /// lateness. The unit is handed back either way.
    #[instrument(skip(self))]
    pub async fn confirm_return(
        &self,
        code: &str,
        current_customer: CustomerId,
    ) -> Result<ReturnOutcome, LifecycleError> {
        let rental = self.rental_by_code(code).await?;
        if rental.customer_id != current_customer {
            debug!(owner = %rental.customer_id, "Returned on behalf of the reserving customer");
        }

        let assessment = self
            .stores
            .rentals
            .confirm_return(rental.id, self.clock.now(), self.policy)
            .await?;
        let rental = assessment.rental;

        let raised = match assessment.lateness {
            Some(lateness) => self.raise_pendency(&rental, lateness).await.map(Some),
            None => Ok(None),
        };
        if let Err(e) = &raised {
            error!(rental_id = %rental.id, error = %e, "Pendency not raised, left to recovery");
        }
        let released = self
            .stores
            .inventory
            .set_status(rental.item_id, InventoryStatus::Available)
            .await;

        let pendency = raised?;
        released?;
        info!(rental_id = %rental.id, status = %rental.status, "Returned");
        Ok(match pendency {
            Some(pendency) => ReturnOutcome::late(pendency),
            None => ReturnOutcome::on_time(rental),
        })
    }

    /// Charges a late rental to the customer who reserved it.
    ///
    /// A rental is charged at most once: when the ledger already holds its pendency, that
    /// one is returned.
    pub(crate) async fn raise_pendency(
        &self,
        rental: &Rental,
        lateness: Lateness,
    ) -> Result<Pendency, LifecycleError> {
        let params = PendencyCreate {
            customer_id: rental.customer_id,
            rental_id: rental.id,
            delay_minutes: lateness.delay_minutes,
            value: lateness.value,
            created_at: rental.closed_at.unwrap_or_else(|| self.clock.now()),
        };
        match self.stores.pendencies.create_pendency(params).await {
            Ok(pendency) => {
                info!(
                    rental_id = %rental.id,
                    delay_minutes = lateness.delay_minutes,
                    value = lateness.value,
                    "Pendency raised"
                );
                Ok(pendency)
            }
            Err(PendencyError::AlreadyRaised(existing)) => {
                debug!(rental_id = %rental.id, %existing, "Pendency already raised");
                self.stores
                    .pendencies
                    .for_rental(rental.id)
                    .await?
                    .ok_or_else(|| LifecycleError::NotFound(existing))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Settles a pendency, lifting the reservation block if it was the customer's last.
    #[instrument(skip(self))]
    pub async fn resolve_pendency(&self, id: PendencyId) -> Result<Pendency, LifecycleError> {
        match self.stores.pendencies.resolve(id, self.clock.now()).await {
            Ok(pendency) => {
                info!(pendency_id = %id, "Resolved");
                Ok(pendency)
            }
            Err(PendencyError::NotFound(_)) | Err(PendencyError::AlreadyResolved(_)) => Err(
                LifecycleError::NotFound(format!("no unresolved pendency {}", id)),
            ),
            Err(e) => Err(e.into()),
        }
    }

    /// Removes a rental that was returned on time and never raised a pendency.
    #[instrument(skip(self))]
    pub async fn delete_rental(&self, id: RentalId) -> Result<(), LifecycleError> {
        self.stores.rentals.delete(id).await?;
        info!(rental_id = %id, "Deleted");
        Ok(())
    }

    async fn rental_by_code(&self, code: &str) -> Result<Rental, LifecycleError> {
        self.stores
            .rentals
            .find_by_code(&PickupCode::new(code))
            .await?
            .ok_or(LifecycleError::InvalidCode)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub async fn rental(&self, id: RentalId) -> Result<Rental, LifecycleError> {
        self.stores
            .rentals
            .get(id)
            .await?
            .ok_or_else(|| LifecycleError::NotFound(id.to_string()))
    }

    /// All rentals, newest first, optionally only those in `status`.
    pub async fn list_rentals(
        &self,
        status: Option<RentalStatus>,
    ) -> Result<Vec<Rental>, LifecycleError> {
        Ok(self.stores.rentals.list(status).await?)
    }

    pub async fn customer_rentals(
        &self,
        customer_id: CustomerId,
    ) -> Result<CustomerRentals, LifecycleError> {
        let rentals = self.stores.rentals.for_customer(customer_id).await?;
        let (active, completed): (Vec<_>, Vec<_>) = rentals
            .into_iter()
            .filter(|r| r.status == RentalStatus::Active || r.status.is_returned())
            .partition(|r| r.status == RentalStatus::Active);
        Ok(CustomerRentals { active, completed })
    }

    pub async fn customer_pendencies(
        &self,
        customer_id: CustomerId,
    ) -> Result<CustomerPendencies, LifecycleError> {
        let pendencies = self.stores.pendencies.for_customer(customer_id).await?;
        let (mut completed, mut active): (Vec<_>, Vec<_>) =
            pendencies.into_iter().partition(Pendency::is_resolved);
        active.sort_by_key(|p| Reverse(p.created_at));
        completed.sort_by_key(|p| Reverse(p.resolved_at));
        Ok(CustomerPendencies { active, completed })
    }

    /// Units of the product that can be reserved right now.
    pub async fn available_quantity(&self, product_id: ProductId) -> Result<usize, LifecycleError> {
        self.product(product_id).await?;
        Ok(self.stores.inventory.available_quantity(product_id).await?)
    }

    pub async fn product(&self, id: ProductId) -> Result<Product, LifecycleError> {
        self.stores
            .products
            .get(id)
            .await?
            .ok_or_else(|| LifecycleError::NotFound(id.to_string()))
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    #[instrument(skip(self))]
    pub async fn register_product(
        &self,
        name: &str,
        hourly_rate: f64,
    ) -> Result<ProductId, LifecycleError> {
        let id = self
            .stores
            .products
            .create_product(ProductCreate {
                name: name.to_string(),
                hourly_rate,
            })
            .await?;
        info!(product_id = %id, "Product registered");
        Ok(id)
    }

    /// Changes the rate of future reservations; existing rentals keep their price.
    #[instrument(skip(self))]
    pub async fn update_product_rate(
        &self,
        id: ProductId,
        hourly_rate: f64,
    ) -> Result<Product, LifecycleError> {
        let update = ProductUpdate {
            hourly_rate: Some(hourly_rate),
            ..Default::default()
        };
        Ok(self.stores.products.update_product(id, update).await?)
    }

    #[instrument(skip(self))]
    pub async fn register_item(
        &self,
        product_id: ProductId,
        color_id: ColorId,
        size_id: SizeId,
    ) -> Result<InventoryItemId, LifecycleError> {
        self.product(product_id).await?;
        let id = self
            .stores
            .inventory
            .create_item(InventoryItemCreate {
                product_id,
                color_id,
                size_id,
            })
            .await?;
        info!(item_id = %id, "Unit registered");
        Ok(id)
    }

    /// Takes an available unit out of circulation.
    #[instrument(skip(self))]
    pub async fn withdraw_item(&self, id: InventoryItemId) -> Result<(), LifecycleError> {
        self.move_item(id, InventoryStatus::Available, InventoryStatus::Unavailable)
            .await
    }

    /// Puts a withdrawn unit back into circulation.
    #[instrument(skip(self))]
    pub async fn reinstate_item(&self, id: InventoryItemId) -> Result<(), LifecycleError> {
        self.move_item(id, InventoryStatus::Unavailable, InventoryStatus::Available)
            .await
    }

    async fn move_item(
        &self,
        id: InventoryItemId,
        from: InventoryStatus,
        to: InventoryStatus,
    ) -> Result<(), LifecycleError> {
        if self.stores.inventory.try_set_status(id, from, to).await? {
            info!(item_id = %id, status = %to, "Unit status changed");
            Ok(())
        } else {
            Err(LifecycleError::InvalidState(format!("{} is not {}", id, from)))
        }
    }
}
