//! Lifecycle manager against mocked stores: failure paths a live store never produces.

use chrono::{Duration, Utc};
use rental_service::clients::{InventoryClient, PendencyClient, ProductClient, RentalClient};
use rental_service::clock::ManualClock;
use rental_service::config::RentalPolicy;
use rental_service::inventory_actor::InventoryActionResult;
use rental_service::manager::{LifecycleError, RentalManager, ReserveRequest, Stores};
use rental_service::model::{
    ColorId, CustomerId, InventoryItem, InventoryItemId, InventoryStatus, Lateness, Pendency,
    PendencyId, PickupCode, Product, ProductId, Rental, RentalCreate, RentalId, RentalStatus,
    SizeId,
};
use rental_service::rental_actor::{RentalActionResult, ReturnAssessment};
use std::sync::Arc;
use store_actor::mock::MockClient;
use store_actor::FrameworkError;
use tokio::sync::watch;

struct Mocks {
    inventory: MockClient<InventoryItem>,
    rentals: MockClient<Rental>,
    pendencies: MockClient<Pendency>,
    products: MockClient<Product>,
}

impl Mocks {
    fn new() -> Self {
        Self {
            inventory: MockClient::new(),
            rentals: MockClient::new(),
            pendencies: MockClient::new(),
            products: MockClient::new(),
        }
    }

    /// Manager wired to the mocks. The returned sender keeps expiry timers armed.
    fn manager(&self) -> (RentalManager, watch::Sender<bool>) {
        let stores = Stores {
            inventory: InventoryClient::new(self.inventory.client()),
            rentals: RentalClient::new(self.rentals.client()),
            pendencies: PendencyClient::new(self.pendencies.client()),
            products: ProductClient::new(self.products.client()),
        };
        let (shutdown, shutdown_rx) = watch::channel(false);
        let manager = RentalManager::new(
            stores,
            Arc::new(ManualClock::starting_now()),
            RentalPolicy::DEFAULT,
            shutdown_rx,
        );
        (manager, shutdown)
    }

    fn verify(&self) {
        self.inventory.verify();
        self.rentals.verify();
        self.pendencies.verify();
        self.products.verify();
    }
}

fn request() -> ReserveRequest {
    ReserveRequest {
        customer_id: CustomerId::new(),
        product_id: ProductId::new(),
        color_id: ColorId::new(),
        size_id: SizeId::new(),
        duration_minutes: 90,
    }
}

fn unit_for(request: &ReserveRequest) -> InventoryItem {
    InventoryItem {
        id: InventoryItemId::new(),
        product_id: request.product_id,
        color_id: request.color_id,
        size_id: request.size_id,
        status: InventoryStatus::Available,
    }
}

/// Scripts the happy path up to and including the unit claim.
fn script_claim(mocks: &mut Mocks, request: &ReserveRequest) -> InventoryItem {
    let unit = unit_for(request);
    mocks.pendencies.expect_query().return_ok(vec![]);
    mocks
        .products
        .expect_get()
        .return_ok(Some(Product::new(request.product_id, "Drill", 4.0)));
    mocks.inventory.expect_query().return_ok(vec![unit.clone()]);
    mocks
        .inventory
        .expect_action()
        .return_ok(InventoryActionResult::TrySetStatus(true));
    unit
}

#[tokio::test]
async fn test_unreachable_ledger_is_a_storage_failure() {
    let mut mocks = Mocks::new();
    mocks
        .pendencies
        .expect_query()
        .return_err(FrameworkError::ActorClosed);
    let (manager, _shutdown) = mocks.manager();

    let err = manager.reserve(request()).await.unwrap_err();
    assert!(matches!(err, LifecycleError::StorageFailure(_)));
    assert_eq!(err.status_code(), 500);
    mocks.verify();
}

#[tokio::test]
async fn test_unresolved_pendency_blocks_before_any_claim() {
    let mut mocks = Mocks::new();
    let request = request();
    mocks.pendencies.expect_query().return_ok(vec![Pendency {
        id: PendencyId::new(),
        customer_id: request.customer_id,
        rental_id: RentalId::new(),
        delay_minutes: 3,
        value: 75.0,
        created_at: Utc::now(),
        resolved_at: None,
    }]);
    let (manager, _shutdown) = mocks.manager();

    assert_eq!(
        manager.reserve(request).await.unwrap_err(),
        LifecycleError::PendencyBlocksReservation
    );
    // Neither the catalog nor the inventory was consulted
    mocks.verify();
}

#[tokio::test]
async fn test_claimed_unit_is_released_when_rental_cannot_be_recorded() {
    let mut mocks = Mocks::new();
    let request = request();
    script_claim(&mut mocks, &request);
    mocks
        .rentals
        .expect_create()
        .return_err(FrameworkError::ActorClosed);
    // Compensation: the unit goes back to Available
    mocks
        .inventory
        .expect_action()
        .return_ok(InventoryActionResult::SetStatus(InventoryStatus::Reserved));
    let (manager, _shutdown) = mocks.manager();

    let err = manager.reserve(request).await.unwrap_err();
    assert!(matches!(err, LifecycleError::StorageFailure(_)));
    mocks.verify();
}

#[tokio::test]
async fn test_code_collision_draws_a_new_code() {
    let mut mocks = Mocks::new();
    let request = request();
    script_claim(&mut mocks, &request);
    mocks
        .rentals
        .expect_create()
        .return_err(FrameworkError::Conflict("rental_taken".to_string()));
    let rental_id = RentalId::new();
    mocks.rentals.expect_create().return_ok(rental_id);
    let (manager, _shutdown) = mocks.manager();

    let reservation = manager.reserve(request).await.unwrap();
    assert_eq!(reservation.rental_id, rental_id);
    assert_eq!(reservation.price, 6.0);
    mocks.verify();
}

#[tokio::test]
async fn test_lost_claim_race_tries_the_next_unit() {
    let mut mocks = Mocks::new();
    let request = request();
    let first = unit_for(&request);
    let second = unit_for(&request);
    mocks.pendencies.expect_query().return_ok(vec![]);
    mocks
        .products
        .expect_get()
        .return_ok(Some(Product::new(request.product_id, "Drill", 4.0)));
    mocks.inventory.expect_query().return_ok(vec![first]);
    mocks
        .inventory
        .expect_action()
        .return_ok(InventoryActionResult::TrySetStatus(false));
    mocks.inventory.expect_query().return_ok(vec![second]);
    mocks
        .inventory
        .expect_action()
        .return_ok(InventoryActionResult::TrySetStatus(true));
    mocks.rentals.expect_create().return_ok(RentalId::new());
    let (manager, _shutdown) = mocks.manager();

    assert!(manager.reserve(request).await.is_ok());
    mocks.verify();
}

#[tokio::test]
async fn test_no_unit_left_after_race() {
    let mut mocks = Mocks::new();
    let request = request();
    mocks.pendencies.expect_query().return_ok(vec![]);
    mocks
        .products
        .expect_get()
        .return_ok(Some(Product::new(request.product_id, "Drill", 4.0)));
    mocks.inventory.expect_query().return_ok(vec![]);
    let (manager, _shutdown) = mocks.manager();

    assert_eq!(
        manager.reserve(request).await.unwrap_err(),
        LifecycleError::NoAvailableInventory
    );
    mocks.verify();
}

/// A rental picked up 71 minutes ago on a 60-minute booking, as stored after its return.
fn late_return() -> (Rental, Rental, Lateness) {
    let picked_up_at = Utc::now() - Duration::minutes(71);
    let mut active = Rental::from_create(
        RentalId::new(),
        RentalCreate {
            customer_id: CustomerId::new(),
            item_id: InventoryItemId::new(),
            product_id: ProductId::new(),
            duration_minutes: 60,
            price: 4.0,
            code: PickupCode::new("LATE01"),
            reserved_at: picked_up_at - Duration::minutes(5),
            expires_at: picked_up_at + Duration::minutes(55),
        },
    );
    active.status = RentalStatus::Active;
    active.picked_up_at = Some(picked_up_at);

    let lateness = Lateness {
        delay_minutes: 11,
        value: 275.0,
    };
    let mut closed = active.clone();
    closed.status = RentalStatus::CompletedLate;
    closed.closed_at = Some(picked_up_at + Duration::minutes(71));
    closed.lateness = Some(lateness);
    (active, closed, lateness)
}

fn pendency_for(rental: &Rental, lateness: Lateness) -> Pendency {
    Pendency {
        id: PendencyId::new(),
        customer_id: rental.customer_id,
        rental_id: rental.id,
        delay_minutes: lateness.delay_minutes,
        value: lateness.value,
        created_at: rental.closed_at.unwrap_or_else(Utc::now),
        resolved_at: None,
    }
}

#[tokio::test]
async fn test_unreachable_ledger_on_late_return_is_recovered() {
    let mut mocks = Mocks::new();
    let (active, closed, lateness) = late_return();
    mocks.rentals.expect_query().return_ok(vec![active.clone()]);
    mocks
        .rentals
        .expect_action()
        .return_ok(RentalActionResult::ConfirmReturn(ReturnAssessment {
            rental: closed.clone(),
            lateness: Some(lateness),
        }));
    mocks
        .pendencies
        .expect_create()
        .return_err(FrameworkError::ActorClosed);
    // The unit is handed back even though the charge failed
    mocks
        .inventory
        .expect_action()
        .return_ok(InventoryActionResult::SetStatus(InventoryStatus::Reserved));
    let (manager, _shutdown) = mocks.manager();

    let err = manager
        .confirm_return(active.code.as_str(), active.customer_id)
        .await
        .unwrap_err();
    assert!(matches!(err, LifecycleError::StorageFailure(_)));
    mocks.verify();

    // The stored rental still carries the lateness, so the next pass charges it
    let pendency = pendency_for(&closed, lateness);
    mocks.rentals.expect_query().return_ok(vec![closed.clone()]);
    mocks.pendencies.expect_query().return_ok(vec![]);
    mocks.pendencies.expect_create().return_ok(pendency.id);
    mocks.pendencies.expect_get().return_ok(Some(pendency));

    assert_eq!(manager.raise_missing_pendencies().await.unwrap(), 1);
    mocks.verify();
}

#[tokio::test]
async fn test_return_reuses_pendency_already_on_the_ledger() {
    let mut mocks = Mocks::new();
    let (active, closed, lateness) = late_return();
    let existing = pendency_for(&closed, lateness);
    mocks.rentals.expect_query().return_ok(vec![active.clone()]);
    mocks
        .rentals
        .expect_action()
        .return_ok(RentalActionResult::ConfirmReturn(ReturnAssessment {
            rental: closed.clone(),
            lateness: Some(lateness),
        }));
    mocks
        .pendencies
        .expect_create()
        .return_err(FrameworkError::Conflict(existing.id.to_string()));
    mocks.pendencies.expect_query().return_ok(vec![existing.clone()]);
    mocks
        .inventory
        .expect_action()
        .return_ok(InventoryActionResult::SetStatus(InventoryStatus::Reserved));
    let (manager, _shutdown) = mocks.manager();

    let outcome = manager
        .confirm_return(active.code.as_str(), active.customer_id)
        .await
        .unwrap();
    assert!(outcome.has_pendency);
    assert_eq!(outcome.pendency(), Some(&existing));
    mocks.verify();
}

#[tokio::test]
async fn test_charged_late_rentals_are_left_alone() {
    let mut mocks = Mocks::new();
    let (_, closed, lateness) = late_return();
    mocks.rentals.expect_query().return_ok(vec![closed.clone()]);
    mocks
        .pendencies
        .expect_query()
        .return_ok(vec![pendency_for(&closed, lateness)]);
    let (manager, _shutdown) = mocks.manager();

    assert_eq!(manager.raise_missing_pendencies().await.unwrap(), 0);
    mocks.verify();
}
