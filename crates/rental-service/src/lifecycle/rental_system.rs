use crate::clients::{InventoryClient, PendencyClient, ProductClient, RentalClient};
use crate::clock::{Clock, SystemClock};
use crate::config::RentalConfig;
use crate::manager::{LifecycleError, RentalManager, Stores};
use crate::snapshot::Snapshot;
use std::sync::Arc;
use std::time::Duration;
use store_actor::{ActorClient, Filter};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// The running rental service: four store actors, the lifecycle manager, and the expiry
/// sweeper.
///
/// # Architecture
///
/// - **Product actor**: hourly rates
/// - **Inventory actor**: unit availability
/// - **Pendency actor**: the debt ledger
/// - **Rental actor**: rental records; depends on the pendency ledger for deletes
///
/// # Example
///
/// ```ignore
/// let system = RentalSystem::new(RentalConfig::DEFAULT);
///
/// let reservation = system.manager.reserve(request).await?;
/// system.manager.confirm_pickup(reservation.code.as_str()).await?;
///
/// system.shutdown().await?;
/// ```
pub struct RentalSystem {
    pub manager: RentalManager,
    pub inventory_client: InventoryClient,
    pub rental_client: RentalClient,
    pub pendency_client: PendencyClient,
    pub product_client: ProductClient,

    shutdown: watch::Sender<bool>,
    sweeper: Option<JoinHandle<()>>,
    /// Task handles for all running actors (used for graceful shutdown)
    handles: Vec<JoinHandle<()>>,
}

impl RentalSystem {
    /// Starts an empty system on the system clock.
    pub fn new(config: RentalConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Starts an empty system on the given clock.
    pub fn with_clock(config: RentalConfig, clock: Arc<dyn Clock>) -> Self {
        Self::spawn(config, clock, Snapshot::default())
    }

    /// Starts a system from a snapshot and recovers it.
    ///
    /// Before the system is returned: reservations whose hold ran out are cancelled, late
    /// returns without a pendency are charged, units reserved without a live rental are
    /// released, and expiry timers are re-armed for the remaining Pending rentals.
    pub async fn restore(
        config: RentalConfig,
        clock: Arc<dyn Clock>,
        snapshot: Snapshot,
    ) -> Result<Self, LifecycleError> {
        let system = Self::spawn(config, clock, snapshot);

        let expired = system.manager.sweep_expired().await?;
        let charged = system.manager.raise_missing_pendencies().await?;
        let orphans = system.manager.release_orphans().await?;
        let pending = system.manager.rearm_pending().await?;
        info!(expired, charged, orphans, pending, "Recovered from snapshot");

        Ok(system)
    }

    fn spawn(config: RentalConfig, clock: Arc<dyn Clock>, snapshot: Snapshot) -> Self {
        let capacity = config.channel_capacity;

        // 1. Create actors (no dependencies)
        let (product_actor, product_client) =
            crate::product_actor::restore(capacity, snapshot.products);
        let (inventory_actor, inventory_client) =
            crate::inventory_actor::restore(capacity, snapshot.items);
        let (pendency_actor, pendency_client) =
            crate::pendency_actor::restore(capacity, snapshot.pendencies);
        let (rental_actor, rental_client) =
            crate::rental_actor::restore(capacity, snapshot.rentals);

        // 2. Start actors with injected context
        let handles = vec![
            tokio::spawn(product_actor.run(())),
            tokio::spawn(inventory_actor.run(())),
            tokio::spawn(pendency_actor.run(())),
            tokio::spawn(rental_actor.run(pendency_client.clone())),
        ];

        // 3. Wire the manager
        let (shutdown, shutdown_rx) = watch::channel(false);
        let stores = Stores {
            inventory: inventory_client.clone(),
            rentals: rental_client.clone(),
            pendencies: pendency_client.clone(),
            products: product_client.clone(),
        };
        let manager = RentalManager::new(stores, clock, config.policy, shutdown_rx.clone());

        let sweeper = config
            .sweep_interval
            .map(|period| tokio::spawn(run_sweeper(manager.clone(), period, shutdown_rx)));

        Self {
            manager,
            inventory_client,
            rental_client,
            pendency_client,
            product_client,
            shutdown,
            sweeper,
            handles,
        }
    }

    /// Copies every record out of the stores.
    pub async fn snapshot(&self) -> Result<Snapshot, LifecycleError> {
        Ok(Snapshot {
            products: self.product_client.find(Filter::all()).await?,
            items: self.inventory_client.find(Filter::all()).await?,
            rentals: self.rental_client.find(Filter::all()).await?,
            pendencies: self.pendency_client.find(Filter::all()).await?,
        })
    }

    /// Gracefully shuts down the entire system.
    ///
    /// 1. Signals shutdown: pending expiry timers and the sweeper stop
    /// 2. Drops all clients, which closes the actors' channels
    /// 3. Waits for all actor tasks to complete
    ///
    /// Returns an error if any task panicked.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down rental system...");

        // The receivers may all be gone already (no sweeper, no timers).
        let _ = self.shutdown.send(true);
        if let Some(sweeper) = self.sweeper {
            sweeper
                .await
                .map_err(|e| format!("Sweeper task failed: {}", e))?;
        }

        drop(self.manager);
        drop(self.inventory_client);
        drop(self.rental_client);
        drop(self.pendency_client);
        drop(self.product_client);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {}", e));
            }
        }

        info!("Rental system shutdown complete");
        Ok(())
    }
}

/// Sweeps expired reservations and uncharged late returns every `period` until shutdown.
async fn run_sweeper(manager: RentalManager, period: Duration, mut shutdown: watch::Receiver<bool>) {
    let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(e) = manager.sweep_expired().await {
                    warn!(error = %e, "Expiry sweep failed");
                }
                if let Err(e) = manager.raise_missing_pendencies().await {
                    warn!(error = %e, "Pendency recovery failed");
                }
            }
            _ = shutdown.changed() => break,
        }
    }
    info!("Expiry sweeper stopped");
}
