//! Service-level tests for the counter, occupancy, and cascade invariants.

use std::sync::Arc;

use crewline::config::Config;
use crewline::db::{PassengerDraft, Store, TripDraft};
use crewline::services::{
    PassengerError, PassengerService, SeaOrmPassengerService, SeaOrmSiteService,
    SeaOrmTripService, SiteError, SiteService, TripError, TripService,
};
use tokio::sync::RwLock;

async fn test_store() -> Store {
    // A single pooled connection keeps every query on the same in-memory db.
    Store::with_pool_options("sqlite::memory:", 1, 1)
        .await
        .expect("Failed to open in-memory store")
}

async fn make_trip(service: &SeaOrmTripService, count: Option<i32>) -> i32 {
    let trip = service
        .create(TripDraft {
            passenger_id: 1,
            origin: "Ogle".to_string(),
            destination: "NSC".to_string(),
            trip_date: "2025-04-02".to_string(),
            number_of_passengers: count,
        })
        .await
        .expect("Failed to create trip");
    trip.id
}

#[tokio::test]
async fn decrement_refuses_to_go_below_one() {
    let store = test_store().await;
    let service = SeaOrmTripService::new(store);

    let id = make_trip(&service, Some(1)).await;

    let err = service.decrement_passengers(id).await.unwrap_err();
    assert!(matches!(err, TripError::InvalidState(_)));

    // the stored value is untouched
    let trip = service.get(id).await.unwrap();
    assert_eq!(trip.number_of_passengers, Some(1));
}

#[tokio::test]
async fn decrement_subtracts_one_above_the_floor() {
    let store = test_store().await;
    let service = SeaOrmTripService::new(store);

    for n in 2..=5 {
        let id = make_trip(&service, Some(n)).await;
        let trip = service.decrement_passengers(id).await.unwrap();
        assert_eq!(trip.number_of_passengers, Some(n - 1));
    }
}

#[tokio::test]
async fn increment_then_decrement_is_identity() {
    let store = test_store().await;
    let service = SeaOrmTripService::new(store);

    let id = make_trip(&service, Some(3)).await;

    let trip = service.increment_passengers(id).await.unwrap();
    assert_eq!(trip.number_of_passengers, Some(4));

    let trip = service.decrement_passengers(id).await.unwrap();
    assert_eq!(trip.number_of_passengers, Some(3));
}

#[tokio::test]
async fn increment_requires_an_existing_count() {
    let store = test_store().await;
    let service = SeaOrmTripService::new(store);

    let id = make_trip(&service, None).await;

    let err = service.increment_passengers(id).await.unwrap_err();
    assert!(matches!(err, TripError::InvalidState(_)));

    let err = service.increment_passengers(9999).await.unwrap_err();
    assert!(matches!(err, TripError::NotFound(9999)));
}

#[tokio::test]
async fn set_validates_and_overwrites() {
    let store = test_store().await;
    let service = SeaOrmTripService::new(store);

    let id = make_trip(&service, Some(2)).await;

    assert!(matches!(
        service.set_passengers(id, 0).await.unwrap_err(),
        TripError::InvalidInput(_)
    ));
    assert!(matches!(
        service.set_passengers(id, -1).await.unwrap_err(),
        TripError::InvalidInput(_)
    ));

    let trip = service.set_passengers(id, 3).await.unwrap();
    assert_eq!(trip.number_of_passengers, Some(3));

    let trip = service.get(id).await.unwrap();
    assert_eq!(trip.number_of_passengers, Some(3));

    assert!(matches!(
        service.set_passengers(9999, 3).await.unwrap_err(),
        TripError::NotFound(9999)
    ));
}

#[tokio::test]
async fn concurrent_increments_lose_nothing() {
    let store = test_store().await;
    let service = Arc::new(SeaOrmTripService::new(store));

    let id = make_trip(&service, Some(1)).await;

    let mut handles = Vec::new();
    for _ in 0..10 {
        let service = Arc::clone(&service);
        handles.push(tokio::spawn(async move {
            service.increment_passengers(id).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let trip = service.get(id).await.unwrap();
    assert_eq!(trip.number_of_passengers, Some(11));
}

fn site_config(names: &[&str], default_max: i32) -> Arc<RwLock<Config>> {
    let mut config = Config::default();
    config.sites.names = names.iter().map(|s| (*s).to_string()).collect();
    config.sites.default_maximum_pob = default_max;
    Arc::new(RwLock::new(config))
}

#[tokio::test]
async fn initialize_is_idempotent() {
    let store = test_store().await;
    let service = SeaOrmSiteService::new(store, site_config(&["A", "B"], 200));

    let sites = service.initialize().await.unwrap();
    assert_eq!(sites.len(), 2);
    for site in &sites {
        assert_eq!(site.current_pob, 0);
        assert_eq!(site.maximum_pob, 200);
    }

    // seed one site with a live headcount, then re-run initialize
    service.set_pob("A", 17).await.unwrap();

    let sites = service.initialize().await.unwrap();
    assert_eq!(sites.len(), 2);
    let a = sites.iter().find(|s| s.site_name == "A").unwrap();
    assert_eq!(a.current_pob, 17);
}

#[tokio::test]
async fn set_pob_upserts_and_validates() {
    let store = test_store().await;
    let service = SeaOrmSiteService::new(store.clone(), site_config(&[], 200));

    // unknown site is created with the default maximum
    let site = service.set_pob("A", 5).await.unwrap();
    assert_eq!(site.current_pob, 5);
    assert_eq!(site.maximum_pob, 200);

    let err = service.set_pob("A", -1).await.unwrap_err();
    assert!(matches!(err, SiteError::InvalidInput(_)));

    // the rejected update left the stored value alone
    let site = store.get_site_by_name("A").await.unwrap().unwrap();
    assert_eq!(site.current_pob, 5);

    // zero is a valid occupancy
    let site = service.set_pob("A", 0).await.unwrap();
    assert_eq!(site.current_pob, 0);
}

#[tokio::test]
async fn set_pob_does_not_cap_at_maximum() {
    let store = test_store().await;
    let service = SeaOrmSiteService::new(store, site_config(&[], 200));

    // the maximum is advisory; manual overrides above it are accepted
    let site = service.set_pob("A", 250).await.unwrap();
    assert_eq!(site.current_pob, 250);
    assert_eq!(site.maximum_pob, 200);
}

#[tokio::test]
async fn sites_list_orders_by_name() {
    let store = test_store().await;
    let service = SeaOrmSiteService::new(store, site_config(&["STC", "NBD", "Ogle"], 200));

    service.initialize().await.unwrap();
    let sites = service.list().await.unwrap();

    let names: Vec<&str> = sites.iter().map(|s| s.site_name.as_str()).collect();
    assert_eq!(names, vec!["NBD", "Ogle", "STC"]);
}

#[tokio::test]
async fn cascade_delete_removes_passenger_and_trips() {
    let store = test_store().await;
    let passengers = SeaOrmPassengerService::new(store.clone());
    let trips = SeaOrmTripService::new(store);

    let passenger = passengers
        .create(PassengerDraft {
            first_name: "Cass".to_string(),
            last_name: "Kade".to_string(),
            job_role: Some("Welder".to_string()),
        })
        .await
        .unwrap();

    let mut trip_ids = Vec::new();
    for _ in 0..3 {
        let trip = trips
            .create(TripDraft {
                passenger_id: passenger.id,
                origin: "Ogle".to_string(),
                destination: "NDT".to_string(),
                trip_date: "2025-04-02".to_string(),
                number_of_passengers: None,
            })
            .await
            .unwrap();
        trip_ids.push(trip.id);
    }

    let summary = passengers.delete_cascade(passenger.id).await.unwrap();
    assert_eq!(summary.trips_deleted, 3);

    for trip_id in trip_ids {
        assert!(matches!(
            trips.get(trip_id).await.unwrap_err(),
            TripError::NotFound(_)
        ));
    }
    assert!(matches!(
        passengers.get(passenger.id).await.unwrap_err(),
        PassengerError::NotFound(_)
    ));

    // already gone: a retry reports not found rather than succeeding twice
    assert!(matches!(
        passengers.delete_cascade(passenger.id).await.unwrap_err(),
        PassengerError::NotFound(_)
    ));
}

#[tokio::test]
async fn cascade_delete_with_no_trips_reports_zero() {
    let store = test_store().await;
    let passengers = SeaOrmPassengerService::new(store);

    let passenger = passengers
        .create(PassengerDraft {
            first_name: "Solo".to_string(),
            last_name: "Traveller".to_string(),
            job_role: None,
        })
        .await
        .unwrap();

    let summary = passengers.delete_cascade(passenger.id).await.unwrap();
    assert_eq!(summary.trips_deleted, 0);
}

#[tokio::test]
async fn orphaned_trips_stay_resolvable_until_cascade() {
    let store = test_store().await;
    let passengers = SeaOrmPassengerService::new(store.clone());
    let trips = SeaOrmTripService::new(store);

    // A trip referencing a passenger id that was never created: the weak
    // reference makes this representable, and the trip stays readable.
    let trip = trips
        .create(TripDraft {
            passenger_id: 424_242,
            origin: "Ogle".to_string(),
            destination: "STC".to_string(),
            trip_date: "2025-04-02".to_string(),
            number_of_passengers: None,
        })
        .await
        .unwrap();

    assert_eq!(trips.get(trip.id).await.unwrap().passenger_id, 424_242);

    // Cascade delete of the missing passenger reports NotFound and leaves
    // the orphan alone; cleanup stays an explicit trip delete.
    assert!(matches!(
        passengers.delete_cascade(424_242).await.unwrap_err(),
        PassengerError::NotFound(_)
    ));
    assert!(trips.get(trip.id).await.is_ok());

    trips.delete(trip.id).await.unwrap();
    assert!(matches!(
        trips.get(trip.id).await.unwrap_err(),
        TripError::NotFound(_)
    ));
}

#[tokio::test]
async fn trip_validation_rejects_blank_fields() {
    let store = test_store().await;
    let service = SeaOrmTripService::new(store);

    let err = service
        .create(TripDraft {
            passenger_id: 1,
            origin: " ".to_string(),
            destination: "NSC".to_string(),
            trip_date: "2025-04-02".to_string(),
            number_of_passengers: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, TripError::InvalidInput(_)));

    let err = service
        .create(TripDraft {
            passenger_id: 1,
            origin: "Ogle".to_string(),
            destination: "NSC".to_string(),
            trip_date: "2025-04-02".to_string(),
            number_of_passengers: Some(0),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, TripError::InvalidInput(_)));
}
