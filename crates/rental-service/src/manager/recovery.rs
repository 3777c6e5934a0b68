//! Repairs for work a stopped process or a failed store request left half done.
//!
//! Every step of the lifecycle is one atomic store request, but an operation spans
//! several stores. These passes bring the stores back in line from what was committed.

use super::{LifecycleError, RentalManager};
use crate::model::{InventoryItemId, InventoryStatus, RentalStatus};
use std::collections::HashSet;
use tracing::{info, instrument, warn};

impl RentalManager {
    /// Releases units left `Reserved` without a live rental holding them.
    ///
    /// This happens when a process stops between claiming a unit and recording its rental.
    /// Meant for start-up, before requests are served: a reservation in flight would look
    /// like an orphan.
    #[instrument(skip(self))]
    pub async fn release_orphans(&self) -> Result<usize, LifecycleError> {
        let held: HashSet<InventoryItemId> = self
            .stores
            .rentals
            .live()
            .await?
            .into_iter()
            .map(|rental| rental.item_id)
            .collect();
        let reserved = self
            .stores
            .inventory
            .with_status(InventoryStatus::Reserved)
            .await?;

        let mut released = 0;
        for item in reserved.into_iter().filter(|item| !held.contains(&item.id)) {
            if self
                .stores
                .inventory
                .try_set_status(item.id, InventoryStatus::Reserved, InventoryStatus::Available)
                .await?
            {
                warn!(item_id = %item.id, "Released orphaned reservation");
                released += 1;
            }
        }
        Ok(released)
    }

    /// Raises the pendency of every CompletedLate rental the ledger has no record of.
    ///
    /// The charge comes from the lateness stored on the rental, or is reassessed from its
    /// pickup and close times for records written without one. Safe to run while requests
    /// are served: the ledger refuses a second pendency for the same rental.
    #[instrument(skip(self))]
    pub async fn raise_missing_pendencies(&self) -> Result<usize, LifecycleError> {
        let late = self
            .stores
            .rentals
            .list(Some(RentalStatus::CompletedLate))
            .await?;
        if late.is_empty() {
            return Ok(0);
        }
        let charged = self.stores.pendencies.charged_rentals().await?;

        let mut raised = 0;
        for rental in late.into_iter().filter(|r| !charged.contains(&r.id)) {
            let lateness = rental.lateness.or_else(|| {
                rental
                    .closed_at
                    .and_then(|at| rental.assess_return(at, &self.policy))
            });
            let Some(lateness) = lateness else {
                warn!(rental_id = %rental.id, "Late rental without a measurable delay");
                continue;
            };
            let pendency = self.raise_pendency(&rental, lateness).await?;
            warn!(rental_id = %rental.id, pendency_id = %pendency.id, "Raised missing pendency");
            raised += 1;
        }
        if raised > 0 {
            info!(raised, "Recovered pendencies");
        }
        Ok(raised)
    }
}
