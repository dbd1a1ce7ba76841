//! End-to-end assignment against the in-memory store.

mod common;

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;

use common::{at, city, customer, order, restaurant, seeded_store, service, service_with};
use walt_dispatch::config::ServiceConfig;
use walt_dispatch::models::{City, Customer, Restaurant};
use walt_dispatch::repository::Store;
use walt_dispatch::services::availability::WindowPolicy;
use walt_dispatch::services::distance::FixedDistance;
use walt_dispatch::services::validation::OrderRequest;
use walt_dispatch::AssignmentError;

fn signed() -> ServiceConfig {
    ServiceConfig {
        window_policy: WindowPolicy::Signed,
        ..ServiceConfig::default()
    }
}

#[tokio::test]
async fn test_basics() {
    let store = seeded_store().await;
    assert_eq!(store.list_cities().await.unwrap().len(), 4);

    let beer_sheva = city(&store, "Beer-Sheva").await;
    assert_eq!(store.find_drivers_by_city(beer_sheva.id).await.unwrap().len(), 2);

    let tlv = city(&store, "Tel-Aviv").await;
    assert_eq!(store.find_drivers_by_city(tlv.id).await.unwrap().len(), 4);
}

#[tokio::test]
async fn test_sanity() {
    let store = seeded_store().await;
    let service = service(&store, ServiceConfig::default());

    let tlv = city(&store, "Tel-Aviv").await;
    let beethoven = customer(&store, "Beethoven").await;
    let vegan = restaurant(&store, "vegan").await;
    let delivery_time = Utc::now();

    let delivery = service
        .create_order_and_assign_driver(OrderRequest::new(
            beethoven.clone(),
            vegan.clone(),
            delivery_time,
        ))
        .await
        .unwrap();

    assert_eq!(delivery.customer.id, beethoven.id);
    assert_eq!(delivery.restaurant.id, vegan.id);
    assert_eq!(delivery.delivery_time, delivery_time);
    assert_eq!(delivery.driver.city.id, tlv.id);
    assert!((0.0..20.0).contains(&delivery.distance));
    assert_eq!(store.delivery_count(), 1);
    assert_eq!(
        store.find_driver_deliveries(delivery.driver.id).await.unwrap(),
        vec![delivery]
    );
}

#[tokio::test]
async fn test_customer_has_different_city_than_restaurant() {
    let store = seeded_store().await;
    let service = service(&store, ServiceConfig::default());

    let result = service
        .create_order_and_assign_driver(order(&store, "Beethoven", "meat", Utc::now()).await)
        .await;

    let err = result.unwrap_err();
    assert!(matches!(err, AssignmentError::CityMismatch));
    assert_eq!(
        err.to_string(),
        "Customer's city and Restaurant's city must be the same"
    );
    assert_eq!(store.delivery_count(), 0);
}

#[tokio::test]
async fn test_missing_arguments() {
    let store = seeded_store().await;
    let service = service(&store, ServiceConfig::default());
    let complete = order(&store, "Mozart", "meat", Utc::now()).await;

    for request in [
        OrderRequest { customer: None, ..complete.clone() },
        OrderRequest { restaurant: None, ..complete.clone() },
        OrderRequest { delivery_time: None, ..complete.clone() },
    ] {
        let err = service.create_order_and_assign_driver(request).await.unwrap_err();
        assert!(matches!(err, AssignmentError::InvalidArgument(_)));
        assert!(!err.is_retryable());
    }
    assert_eq!(store.delivery_count(), 0);
}

#[tokio::test]
async fn test_no_available_driver() {
    for config in [ServiceConfig::default(), signed()] {
        let store = seeded_store().await;
        let service = service(&store, config);
        let d1 = Utc::now();

        let mut assigned = Vec::new();
        for _ in 0..3 {
            let delivery = service
                .create_order_and_assign_driver(order(&store, "Mozart", "meat", d1).await)
                .await
                .unwrap();
            assigned.push(delivery.driver.name);
        }
        assigned.sort();
        assert_eq!(assigned, vec!["David", "Neta", "Robert"]);

        let err = service
            .create_order_and_assign_driver(order(&store, "Mozart", "meat", d1).await)
            .await
            .unwrap_err();
        assert!(matches!(err, AssignmentError::NoAvailableDriver));
        assert_eq!(err.to_string(), "No available drivers were found");
        assert!(err.is_retryable());
        assert_eq!(store.delivery_count(), 3);
    }
}

#[tokio::test]
async fn test_city_without_drivers() {
    let store = seeded_store().await;
    let eilat = store.save_city(City::new("Eilat")).await.unwrap();
    let diver = store
        .save_customer(Customer::new("Diver", &eilat, "Red sea diver"))
        .await
        .unwrap();
    let fish = store
        .save_restaurant(Restaurant::new("fish", &eilat, "Fresh fish"))
        .await
        .unwrap();

    let err = service(&store, ServiceConfig::default())
        .create_order_and_assign_driver(OrderRequest::new(diver, fish, Utc::now()))
        .await
        .unwrap_err();
    assert!(matches!(err, AssignmentError::NoAvailableDriver));
}

#[tokio::test]
async fn test_least_busy_rotation() {
    for config in [ServiceConfig::default(), signed()] {
        let store = seeded_store().await;
        let service = service(&store, config);

        // Four drivers at 08:00, then two more slots three hours apart.
        let times = [at(8, 0), at(8, 0), at(8, 0), at(8, 0), at(11, 0), at(14, 0)];
        let mut names = Vec::new();
        for time in times {
            let delivery = service
                .create_order_and_assign_driver(order(&store, "Bach", "cafe", time).await)
                .await
                .unwrap();
            names.push(delivery.driver.name);
        }

        assert_eq!(
            names,
            vec!["Mary", "Patricia", "Daniel", "Linda", "Mary", "Patricia"]
        );
    }
}

#[tokio::test]
async fn test_selected_driver_is_never_busier_than_an_available_one() {
    let store = seeded_store().await;
    let service = service(&store, ServiceConfig::default());
    let tlv = city(&store, "Tel-Aviv").await;

    for hour in (0..22).step_by(2) {
        let before: Vec<(i64, usize)> = {
            let mut counts = Vec::new();
            for driver in store.find_drivers_by_city(tlv.id).await.unwrap() {
                counts.push((driver.id, store.count_driver_deliveries(driver.id).await.unwrap()));
            }
            counts
        };

        let request = order(&store, "Rachmaninoff", "chinese", at(hour, 0)).await;
        let delivery = service.create_order_and_assign_driver(request).await.unwrap();

        let chosen = before
            .iter()
            .find(|(id, _)| *id == delivery.driver.id)
            .map(|(_, count)| *count)
            .unwrap();
        assert!(before.iter().all(|(_, count)| chosen <= *count));
    }
}

#[tokio::test]
async fn test_window_boundary() {
    let store = seeded_store().await;
    let service = service(&store, ServiceConfig::default());

    for _ in 0..3 {
        service
            .create_order_and_assign_driver(order(&store, "Sheldon", "meat", at(12, 0)).await)
            .await
            .unwrap();
    }

    let too_close = service
        .create_order_and_assign_driver(order(&store, "Sheldon", "meat", at(12, 59)).await)
        .await;
    assert!(matches!(too_close, Err(AssignmentError::NoAvailableDriver)));

    let one_hour_later = service
        .create_order_and_assign_driver(order(&store, "Sheldon", "meat", at(13, 0)).await)
        .await;
    assert!(one_hour_later.is_ok());
}

#[tokio::test]
async fn test_earlier_request_depends_on_window_policy() {
    // Every Jerusalem driver is booked at noon; a request for 07:00 is five hours earlier.
    for (config, expect_free) in [(ServiceConfig::default(), true), (signed(), false)] {
        let store = seeded_store().await;
        let service = service(&store, config);
        for _ in 0..3 {
            service
                .create_order_and_assign_driver(order(&store, "Cooper", "meat", at(12, 0)).await)
                .await
                .unwrap();
        }

        let early = service
            .create_order_and_assign_driver(order(&store, "Cooper", "meat", at(7, 0)).await)
            .await;
        if expect_free {
            assert!(early.is_ok(), "symmetric window must allow a delivery five hours earlier");
        } else {
            assert!(matches!(early, Err(AssignmentError::NoAvailableDriver)));
        }
    }
}

#[tokio::test]
async fn test_custom_window_length() {
    let store = seeded_store().await;
    let config = ServiceConfig {
        availability_window: Duration::from_secs(15 * 60),
        ..ServiceConfig::default()
    };
    let service = service(&store, config);

    for _ in 0..3 {
        service
            .create_order_and_assign_driver(order(&store, "Mozart", "meat", at(12, 0)).await)
            .await
            .unwrap();
    }
    let delivery = service
        .create_order_and_assign_driver(order(&store, "Mozart", "meat", at(12, 20)).await)
        .await
        .unwrap();
    assert_eq!(delivery.driver.name, "Robert");
}

#[tokio::test]
async fn test_injected_distance_estimator() {
    let store = seeded_store().await;
    let service = service_with(&store, ServiceConfig::default(), Arc::new(FixedDistance(7.25)));

    let delivery = service
        .create_order_and_assign_driver(order(&store, "Chopin", "vegan", Utc::now()).await)
        .await;
    assert!(matches!(delivery, Err(AssignmentError::CityMismatch)));

    let delivery = service
        .create_order_and_assign_driver(order(&store, "Bach", "vegan", Utc::now()).await)
        .await
        .unwrap();
    assert_eq!(delivery.distance, 7.25);
}

#[tokio::test]
async fn test_negative_or_nan_estimates_are_rejected() {
    for bad in [-5.0, f64::NAN] {
        let store = seeded_store().await;
        let service = service_with(&store, ServiceConfig::default(), Arc::new(FixedDistance(bad)));

        let err = service
            .create_order_and_assign_driver(order(&store, "Bach", "vegan", at(9, 0)).await)
            .await
            .unwrap_err();
        assert!(matches!(err, AssignmentError::InvalidDistance(_)));
        assert_eq!(store.delivery_count(), 0);
        assert!(service.rank_drivers().await.unwrap().is_empty());
    }
}
