//! # Rental Service
//!
//! Runs one rental through the whole lifecycle against an in-memory system:
//!
//! 1. Load configuration from `RENTAL_*` variables and restore the snapshot, if any.
//! 2. Register a product and a unit.
//! 3. Reserve, pick up and return it.
//! 4. Save the snapshot and shut down.
//!
//! Set `RUST_LOG=info` (or `debug`) to watch the stores at work.

use rental_service::clock::SystemClock;
use rental_service::config::RentalConfig;
use rental_service::lifecycle::RentalSystem;
use rental_service::manager::ReserveRequest;
use rental_service::model::{ColorId, CustomerId, SizeId};
use rental_service::snapshot::Snapshot;
use std::sync::Arc;
use store_actor::tracing::setup_tracing;
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    // Setup tracing once for the entire application
    setup_tracing();

    let config = RentalConfig::from_env().map_err(|e| e.to_string())?;
    let snapshot = match &config.snapshot_path {
        Some(path) => Snapshot::load_or_default(path).map_err(|e| e.to_string())?,
        None => Snapshot::default(),
    };
    info!(
        products = snapshot.products.len(),
        rentals = snapshot.rentals.len(),
        "Starting rental service"
    );

    let system = RentalSystem::restore(config.clone(), Arc::new(SystemClock), snapshot)
        .await
        .map_err(|e| e.to_string())?;
    let manager = system.manager.clone();

    let (color_id, size_id) = (ColorId::new(), SizeId::new());
    let product_id = async {
        let product_id = manager.register_product("Hammer drill", 12.0).await?;
        manager.register_item(product_id, color_id, size_id).await?;
        Ok::<_, rental_service::manager::LifecycleError>(product_id)
    }
    .instrument(tracing::info_span!("catalog"))
    .await
    .map_err(|e| e.to_string())?;

    let customer_id = CustomerId::new();
    let rental_flow = async {
        let reservation = manager
            .reserve(ReserveRequest {
                customer_id,
                product_id,
                color_id,
                size_id,
                duration_minutes: 90,
            })
            .await?;
        info!(code = %reservation.code, price = reservation.price, "Reservation made");

        manager.confirm_pickup(reservation.code.as_str()).await?;
        manager
            .confirm_return(reservation.code.as_str(), customer_id)
            .await
    }
    .instrument(tracing::info_span!("rental_flow"))
    .await;

    match rental_flow {
        Ok(outcome) => info!(has_pendency = outcome.has_pendency, "Rental returned"),
        Err(e) => error!(error = %e, status = e.status_code(), "Rental flow failed"),
    }

    if let Some(path) = &config.snapshot_path {
        let snapshot = system.snapshot().await.map_err(|e| e.to_string())?;
        snapshot.save(path).map_err(|e| e.to_string())?;
        info!(path = %path.display(), "Snapshot saved");
    }

    drop(manager);
    system.shutdown().await?;

    info!("Application completed successfully");
    Ok(())
}
