//! The rental store as a real actor, with the pendency ledger it consults on delete mocked.

use chrono::{Duration, Utc};
use rental_service::clients::PendencyClient;
use rental_service::config::RentalPolicy;
use rental_service::model::{
    CustomerId, InventoryItemId, Pendency, PendencyId, PickupCode, ProductId, RentalCreate,
    RentalStatus,
};
use rental_service::rental_actor::{self, RentalError};
use store_actor::mock::MockClient;
use store_actor::{ActorClient, FrameworkError};

fn params(code: &str) -> RentalCreate {
    let now = Utc::now();
    RentalCreate {
        customer_id: CustomerId::new(),
        item_id: InventoryItemId::new(),
        product_id: ProductId::new(),
        duration_minutes: 60,
        price: 10.0,
        code: PickupCode::new(code),
        reserved_at: now,
        expires_at: now + Duration::minutes(60),
    }
}

#[tokio::test]
async fn test_delete_checks_ledger_then_status() {
    let mut ledger = MockClient::<Pendency>::new();
    let (actor, rentals) = rental_actor::new(10);
    tokio::spawn(actor.run(PendencyClient::new(ledger.client())));

    let create = params("ZXC987");
    let id = rentals.create_rental(create.clone()).await.unwrap();

    // Pending: no pendency, but not completed
    ledger.expect_query().return_ok(vec![]);
    assert!(matches!(
        rentals.delete(id).await,
        Err(RentalError::InvalidState {
            status: RentalStatus::Pending,
            ..
        })
    ));

    let now = Utc::now();
    rentals.confirm_pickup(id, now).await.unwrap();
    let late = now + Duration::minutes(200);
    let assessment = rentals
        .confirm_return(id, late, RentalPolicy::DEFAULT)
        .await
        .unwrap();
    assert_eq!(assessment.rental.status, RentalStatus::CompletedLate);

    // The ledger references the rental
    ledger.expect_query().return_ok(vec![Pendency {
        id: PendencyId::new(),
        customer_id: create.customer_id,
        rental_id: id,
        delay_minutes: 140,
        value: 3500.0,
        created_at: late,
        resolved_at: None,
    }]);
    assert_eq!(
        rentals.delete(id).await.unwrap_err(),
        RentalError::HasPendency(id.to_string())
    );

    // The ledger is unreachable
    ledger.expect_query().return_err(FrameworkError::ActorClosed);
    assert!(matches!(
        rentals.delete(id).await,
        Err(RentalError::ActorCommunicationError(_))
    ));

    // Every failed delete left the rental in place
    assert!(rentals.get(id).await.unwrap().is_some());
    ledger.verify();
}

#[tokio::test]
async fn test_completed_rental_is_deleted() {
    let mut ledger = MockClient::<Pendency>::new();
    let (actor, rentals) = rental_actor::new(10);
    tokio::spawn(actor.run(PendencyClient::new(ledger.client())));

    let id = rentals.create_rental(params("ASD456")).await.unwrap();
    let now = Utc::now();
    rentals.confirm_pickup(id, now).await.unwrap();
    let assessment = rentals
        .confirm_return(id, now + Duration::minutes(65), RentalPolicy::DEFAULT)
        .await
        .unwrap();
    assert!(assessment.lateness.is_none());

    ledger.expect_query().return_ok(vec![]);
    rentals.delete(id).await.unwrap();
    assert!(rentals.get(id).await.unwrap().is_none());
    assert_eq!(
        rentals.delete(id).await.unwrap_err(),
        RentalError::NotFound(id.to_string())
    );
    ledger.verify();
}

#[tokio::test]
async fn test_codes_are_reusable_once_the_holder_is_closed() {
    let ledger = MockClient::<Pendency>::new();
    let (actor, rentals) = rental_actor::new(10);
    tokio::spawn(actor.run(PendencyClient::new(ledger.client())));

    let first = rentals.create_rental(params("QWE123")).await.unwrap();
    assert!(matches!(
        rentals.create_rental(params("qwe123")).await,
        Err(RentalError::CodeCollision(_))
    ));

    let cancelled = rentals.cancel_if_pending(first, Utc::now()).await.unwrap();
    assert_eq!(cancelled.map(|r| r.status), Some(RentalStatus::Cancelled));

    let second = rentals.create_rental(params("QWE123")).await.unwrap();
    assert_ne!(first, second);

    // The live holder wins the lookup over the cancelled one
    let found = rentals
        .find_by_code(&PickupCode::new("qwe123"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, second);

    assert_eq!(
        rentals.confirm_pickup(first, Utc::now()).await.unwrap_err(),
        RentalError::AlreadyCancelled("QWE123".to_string())
    );
}

#[tokio::test]
async fn test_invalid_rental_is_rejected() {
    let ledger = MockClient::<Pendency>::new();
    let (actor, rentals) = rental_actor::new(10);
    tokio::spawn(actor.run(PendencyClient::new(ledger.client())));

    let mut create = params("POI000");
    create.duration_minutes = 0;
    assert!(matches!(
        rentals.create_rental(create).await,
        Err(RentalError::InvalidRequest(_))
    ));
    assert!(rentals.list(None).await.unwrap().is_empty());
}
