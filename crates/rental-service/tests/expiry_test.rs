//! Reservation expiry, the start-up sweep and recovery of half-finished work.

use rental_service::clock::{Clock, ManualClock};
use rental_service::config::RentalConfig;
use rental_service::lifecycle::RentalSystem;
use rental_service::manager::{LifecycleError, RentalManager, ReserveRequest};
use rental_service::model::{
    ColorId, CustomerId, InventoryItem, InventoryItemId, InventoryStatus, Lateness, PickupCode,
    Product, ProductId, Rental, RentalCreate, RentalId, RentalStatus, SizeId,
};
use rental_service::snapshot::Snapshot;
use std::sync::Arc;
use std::time::Duration;
use store_actor::tracing::setup_test_tracing;
use store_actor::ActorClient;

async fn single_unit(manager: &RentalManager) -> (ReserveRequest, InventoryItemId) {
    let product_id = manager.register_product("Tile cutter", 8.0).await.unwrap();
    let (color_id, size_id) = (ColorId::new(), SizeId::new());
    let item_id = manager
        .register_item(product_id, color_id, size_id)
        .await
        .unwrap();
    let request = ReserveRequest {
        customer_id: CustomerId::new(),
        product_id,
        color_id,
        size_id,
        duration_minutes: 120,
    };
    (request, item_id)
}

fn no_sweeper() -> RentalConfig {
    setup_test_tracing();
    RentalConfig {
        sweep_interval: None,
        ..RentalConfig::DEFAULT
    }
}

#[tokio::test(start_paused = true)]
async fn test_unclaimed_reservation_expires_after_hold() {
    let system = RentalSystem::new(RentalConfig::DEFAULT);
    let manager = system.manager.clone();
    let (request, item_id) = single_unit(&manager).await;
    let product_id = request.product_id;

    let reservation = manager.reserve(request).await.unwrap();

    tokio::time::sleep(Duration::from_secs(59 * 60)).await;
    let rental = manager.rental(reservation.rental_id).await.unwrap();
    assert_eq!(rental.status, RentalStatus::Pending);

    tokio::time::sleep(Duration::from_secs(2 * 60)).await;
    let rental = manager.rental(reservation.rental_id).await.unwrap();
    assert_eq!(rental.status, RentalStatus::Cancelled);
    assert!(rental.closed_at.is_some());

    let unit = system.inventory_client.get(item_id).await.unwrap().unwrap();
    assert_eq!(unit.status, InventoryStatus::Available);
    assert_eq!(manager.available_quantity(product_id).await.unwrap(), 1);

    assert_eq!(
        manager
            .confirm_pickup(reservation.code.as_str())
            .await
            .unwrap_err(),
        LifecycleError::AlreadyCancelled
    );

    drop(manager);
    system.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_pickup_before_hold_disarms_expiry() {
    let system = RentalSystem::new(RentalConfig::DEFAULT);
    let manager = system.manager.clone();
    let (request, item_id) = single_unit(&manager).await;

    let reservation = manager.reserve(request).await.unwrap();
    tokio::time::sleep(Duration::from_secs(30 * 60)).await;
    manager.confirm_pickup(reservation.code.as_str()).await.unwrap();

    tokio::time::sleep(Duration::from_secs(60 * 60)).await;
    let rental = manager.rental(reservation.rental_id).await.unwrap();
    assert_eq!(rental.status, RentalStatus::Active);

    let unit = system.inventory_client.get(item_id).await.unwrap().unwrap();
    assert_eq!(unit.status, InventoryStatus::Reserved);

    // Expiring a picked-up rental is a no-op
    assert!(!manager.expire(reservation.rental_id).await.unwrap());

    drop(manager);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_restore_cancels_reservations_that_ran_out() {
    let clock = ManualClock::starting_now();
    let system = RentalSystem::with_clock(no_sweeper(), Arc::new(clock.clone()));
    let manager = system.manager.clone();
    let (request, stale_item) = single_unit(&manager).await;
    let stale = manager.reserve(request).await.unwrap();
    let (request, held_item) = single_unit(&manager).await;
    let held = manager.reserve(request).await.unwrap();
    manager.confirm_pickup(held.code.as_str()).await.unwrap();

    let snapshot = system.snapshot().await.unwrap();
    drop(manager);
    system.shutdown().await.unwrap();

    clock.advance_minutes(61);
    let restored = RentalSystem::restore(no_sweeper(), Arc::new(clock.clone()), snapshot)
        .await
        .unwrap();
    let manager = restored.manager.clone();

    let rental = manager.rental(stale.rental_id).await.unwrap();
    assert_eq!(rental.status, RentalStatus::Cancelled);
    assert_eq!(rental.closed_at, Some(clock.now()));
    let unit = restored.inventory_client.get(stale_item).await.unwrap().unwrap();
    assert_eq!(unit.status, InventoryStatus::Available);

    // The picked-up rental and its unit are untouched
    let rental = manager.rental(held.rental_id).await.unwrap();
    assert_eq!(rental.status, RentalStatus::Active);
    let unit = restored.inventory_client.get(held_item).await.unwrap().unwrap();
    assert_eq!(unit.status, InventoryStatus::Reserved);

    assert_eq!(
        manager.confirm_pickup(stale.code.as_str()).await.unwrap_err(),
        LifecycleError::AlreadyCancelled
    );

    drop(manager);
    restored.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_restore_rearms_remaining_holds() {
    let clock = ManualClock::starting_now();
    let system = RentalSystem::with_clock(no_sweeper(), Arc::new(clock.clone()));
    let (request, item_id) = single_unit(&system.manager).await;
    let reservation = system.manager.reserve(request).await.unwrap();
    let snapshot = system.snapshot().await.unwrap();
    system.shutdown().await.unwrap();

    // Down for half the hold
    clock.advance_minutes(30);
    let restored = RentalSystem::restore(no_sweeper(), Arc::new(clock.clone()), snapshot)
        .await
        .unwrap();
    let rental = restored.manager.rental(reservation.rental_id).await.unwrap();
    assert_eq!(rental.status, RentalStatus::Pending);

    tokio::time::sleep(Duration::from_secs(31 * 60)).await;
    let rental = restored.manager.rental(reservation.rental_id).await.unwrap();
    assert_eq!(rental.status, RentalStatus::Cancelled);
    let unit = restored.inventory_client.get(item_id).await.unwrap().unwrap();
    assert_eq!(unit.status, InventoryStatus::Available);

    restored.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_restore_releases_orphaned_units() {
    let product = Product::new(ProductId::new(), "Ladder", 2.5);
    let orphan = InventoryItem {
        id: InventoryItemId::new(),
        product_id: product.id,
        color_id: ColorId::new(),
        size_id: SizeId::new(),
        status: InventoryStatus::Reserved,
    };
    let withdrawn = InventoryItem {
        id: InventoryItemId::new(),
        status: InventoryStatus::Unavailable,
        ..orphan.clone()
    };
    let snapshot = Snapshot {
        products: vec![product.clone()],
        items: vec![orphan.clone(), withdrawn.clone()],
        ..Snapshot::default()
    };

    let system = RentalSystem::restore(
        no_sweeper(),
        Arc::new(ManualClock::starting_now()),
        snapshot,
    )
    .await
    .unwrap();

    let unit = system.inventory_client.get(orphan.id).await.unwrap().unwrap();
    assert_eq!(unit.status, InventoryStatus::Available);
    let unit = system.inventory_client.get(withdrawn.id).await.unwrap().unwrap();
    assert_eq!(unit.status, InventoryStatus::Unavailable);
    assert_eq!(system.manager.available_quantity(product.id).await.unwrap(), 1);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_sweep_only_touches_overdue_pending_rentals() {
    let clock = ManualClock::starting_now();
    let system = RentalSystem::with_clock(no_sweeper(), Arc::new(clock.clone()));
    let manager = system.manager.clone();

    let (request, _) = single_unit(&manager).await;
    let first = manager.reserve(request).await.unwrap();
    clock.advance_minutes(45);
    let (request, _) = single_unit(&manager).await;
    let second = manager.reserve(request).await.unwrap();

    assert_eq!(manager.sweep_expired().await.unwrap(), 0);
    clock.advance_minutes(20);
    assert_eq!(manager.sweep_expired().await.unwrap(), 1);
    assert_eq!(manager.sweep_expired().await.unwrap(), 0);

    let first = manager.rental(first.rental_id).await.unwrap();
    assert_eq!(first.status, RentalStatus::Cancelled);
    let second = manager.rental(second.rental_id).await.unwrap();
    assert_eq!(second.status, RentalStatus::Pending);

    drop(manager);
    system.shutdown().await.unwrap();
}

/// A rental returned late whose pendency never reached the ledger, with its unit still held.
fn uncharged_late_return(
    product: &Product,
    reserved_at: chrono::DateTime<chrono::Utc>,
    lateness: Option<Lateness>,
) -> (Rental, InventoryItem) {
    let item = InventoryItem {
        id: InventoryItemId::new(),
        product_id: product.id,
        color_id: ColorId::new(),
        size_id: SizeId::new(),
        status: InventoryStatus::Reserved,
    };
    let mut rental = Rental::from_create(
        RentalId::new(),
        RentalCreate {
            customer_id: CustomerId::new(),
            item_id: item.id,
            product_id: product.id,
            duration_minutes: 60,
            price: product.hourly_rate,
            code: PickupCode::random(6),
            reserved_at,
            expires_at: reserved_at + chrono::Duration::minutes(60),
        },
    );
    let picked_up_at = reserved_at + chrono::Duration::minutes(5);
    rental.status = RentalStatus::CompletedLate;
    rental.picked_up_at = Some(picked_up_at);
    rental.closed_at = Some(picked_up_at + chrono::Duration::minutes(71));
    rental.lateness = lateness;
    (rental, item)
}

#[tokio::test]
async fn test_restore_charges_late_returns_missing_a_pendency() {
    let clock = ManualClock::starting_now();
    let reserved_at = clock.now() - chrono::Duration::hours(3);
    let product = Product::new(ProductId::new(), "Jackhammer", 6.0);
    let (recorded, recorded_item) = uncharged_late_return(
        &product,
        reserved_at,
        Some(Lateness {
            delay_minutes: 11,
            value: 275.0,
        }),
    );
    // Written before lateness was stored with the transition
    let (legacy, legacy_item) = uncharged_late_return(&product, reserved_at, None);
    let snapshot = Snapshot {
        products: vec![product.clone()],
        items: vec![recorded_item.clone(), legacy_item.clone()],
        rentals: vec![recorded.clone(), legacy.clone()],
        ..Snapshot::default()
    };

    let system = RentalSystem::restore(no_sweeper(), Arc::new(clock.clone()), snapshot)
        .await
        .unwrap();
    let manager = system.manager.clone();

    for rental in [&recorded, &legacy] {
        let pendencies = manager.customer_pendencies(rental.customer_id).await.unwrap();
        assert_eq!(pendencies.active.len(), 1);
        let pendency = &pendencies.active[0];
        assert_eq!(pendency.rental_id, rental.id);
        assert_eq!(pendency.delay_minutes, 11);
        assert_eq!(pendency.value, 275.0);
        assert_eq!(Some(pendency.created_at), rental.closed_at);

        let unit = system.inventory_client.get(rental.item_id).await.unwrap().unwrap();
        assert_eq!(unit.status, InventoryStatus::Available);
    }

    // The charge now blocks the customer who reserved
    let blocked = manager
        .reserve(ReserveRequest {
            customer_id: recorded.customer_id,
            product_id: product.id,
            color_id: recorded_item.color_id,
            size_id: recorded_item.size_id,
            duration_minutes: 60,
        })
        .await
        .unwrap_err();
    assert_eq!(blocked, LifecycleError::PendencyBlocksReservation);

    // A second pass finds nothing left to charge
    assert_eq!(manager.raise_missing_pendencies().await.unwrap(), 0);

    drop(manager);
    system.shutdown().await.unwrap();
}
