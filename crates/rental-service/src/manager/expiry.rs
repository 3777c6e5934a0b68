//! Reservation expiry.
//!
//! A reservation is cancelled when its hold runs out before pickup. Two mechanisms cover
//! this, and both go through [`RentalManager::expire`], which re-checks the status inside
//! the rental store so a late timer can never cancel a rental that was picked up:
//!
//! - a one-shot timer armed by `reserve` for exactly the hold time,
//! - [`RentalManager::sweep_expired`], which cancels every Pending rental whose
//!   `expires_at` has passed. It runs at start-up (covering reservations whose timers died
//!   with a previous process) and periodically.

use super::{LifecycleError, RentalManager};
use crate::model::{InventoryStatus, RentalId, RentalStatus};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

impl RentalManager {
    /// Cancels the rental if it is still Pending and puts its unit back on the shelf.
    ///
    /// Returns whether the rental was cancelled; `false` means it had already been picked
    /// up (or otherwise left Pending) and nothing changed.
    #[instrument(skip(self))]
    pub async fn expire(&self, rental_id: RentalId) -> Result<bool, LifecycleError> {
        let Some(rental) = self
            .stores
            .rentals
            .cancel_if_pending(rental_id, self.clock.now())
            .await?
        else {
            return Ok(false);
        };
        self.stores
            .inventory
            .set_status(rental.item_id, InventoryStatus::Available)
            .await?;
        info!(%rental_id, item_id = %rental.item_id, "Reservation expired");
        Ok(true)
    }

    /// Expires every Pending rental whose hold has run out. Returns how many were cancelled.
    #[instrument(skip(self))]
    pub async fn sweep_expired(&self) -> Result<usize, LifecycleError> {
        let overdue = self.stores.rentals.expired(self.clock.now()).await?;
        let mut cancelled = 0;
        for rental in overdue {
            if self.expire(rental.id).await? {
                cancelled += 1;
            }
        }
        if cancelled > 0 {
            info!(cancelled, "Swept expired reservations");
        }
        Ok(cancelled)
    }

    /// Arms expiry timers for Pending rentals restored from a snapshot.
    ///
    /// Each timer fires when the rental's own `expires_at` is reached, or immediately if it
    /// already has.
    pub async fn rearm_pending(&self) -> Result<usize, LifecycleError> {
        let pending = self.stores.rentals.list(Some(RentalStatus::Pending)).await?;
        let now = self.clock.now();
        for rental in &pending {
            let remaining = (rental.expires_at - now).to_std().unwrap_or(Duration::ZERO);
            self.arm_expiry(rental.id, remaining);
        }
        Ok(pending.len())
    }

    /// Spawns the one-shot timer that expires `rental_id` after `after`.
    ///
    /// The timer is not cancelled on pickup; [`RentalManager::expire`] is a no-op by then. It
    /// is dropped when the system shuts down.
    pub(crate) fn arm_expiry(&self, rental_id: RentalId, after: Duration) {
        let manager = self.clone();
        let mut shutdown = self.shutdown.clone();
        tokio::spawn(async move {
            let stopped = *shutdown.borrow();
            if stopped {
                return;
            }
            tokio::select! {
                _ = tokio::time::sleep(after) => {
                    if let Err(e) = manager.expire(rental_id).await {
                        warn!(%rental_id, error = %e, "Expiry failed, leaving it to the sweeper");
                    }
                }
                _ = shutdown.changed() => {
                    debug!(%rental_id, "Expiry timer dropped on shutdown");
                }
            }
        });
    }
}
