#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;

use walt_dispatch::config::ServiceConfig;
use walt_dispatch::models::{City, Customer, Driver, Restaurant};
use walt_dispatch::repository::{InMemoryStore, Store};
use walt_dispatch::services::distance::DistanceEstimator;
use walt_dispatch::services::validation::OrderRequest;
use walt_dispatch::AssignmentService;

/// Four cities with their drivers, customers and restaurants.
pub async fn seeded_store() -> Arc<InMemoryStore> {
    let store = Arc::new(InMemoryStore::new());

    let jerusalem = store.save_city(City::new("Jerusalem")).await.unwrap();
    let tlv = store.save_city(City::new("Tel-Aviv")).await.unwrap();
    let bash = store.save_city(City::new("Beer-Sheva")).await.unwrap();
    let haifa = store.save_city(City::new("Haifa")).await.unwrap();

    let drivers = [
        ("Mary", &tlv),
        ("Patricia", &tlv),
        ("Jennifer", &haifa),
        ("James", &bash),
        ("John", &bash),
        ("Robert", &jerusalem),
        ("David", &jerusalem),
        ("Daniel", &tlv),
        ("Noa", &haifa),
        ("Ofri", &haifa),
        ("Neta", &jerusalem),
        ("Linda", &tlv),
    ];
    for (name, city) in drivers {
        store.save_driver(Driver::new(name, city)).await.unwrap();
    }

    let customers = [
        ("Beethoven", &tlv, "Ludwig van Beethoven"),
        ("Mozart", &jerusalem, "Wolfgang Amadeus Mozart"),
        ("Chopin", &haifa, "Frederic Francois Chopin"),
        ("Rachmaninoff", &tlv, "Sergei Rachmaninoff"),
        ("Bach", &tlv, "Sebastian Bach. Johann"),
        ("Sheldon", &jerusalem, "Wolfgang Sheldon"),
        ("Cooper", &jerusalem, "Wolfgang Cooper"),
    ];
    for (name, city, description) in customers {
        store
            .save_customer(Customer::new(name, city, description))
            .await
            .unwrap();
    }

    let restaurants = [
        ("meat", &jerusalem, "All meat restaurant"),
        ("vegan", &tlv, "Only vegan"),
        ("cafe", &tlv, "Coffee shop"),
        ("chinese", &tlv, "chinese restaurant"),
        ("restaurant", &tlv, "mexican restaurant"),
    ];
    for (name, city, description) in restaurants {
        store
            .save_restaurant(Restaurant::new(name, city, description))
            .await
            .unwrap();
    }

    store
}

pub fn service(store: &Arc<InMemoryStore>, config: ServiceConfig) -> AssignmentService {
    AssignmentService::new(store.clone(), config)
}

pub fn service_with(
    store: &Arc<InMemoryStore>,
    config: ServiceConfig,
    estimator: Arc<dyn DistanceEstimator>,
) -> AssignmentService {
    AssignmentService::with_estimator(store.clone(), config, estimator)
}

pub async fn city(store: &InMemoryStore, name: &str) -> City {
    store.find_city_by_name(name).await.unwrap().unwrap()
}

pub async fn customer(store: &InMemoryStore, name: &str) -> Customer {
    store.find_customer_by_name(name).await.unwrap().unwrap()
}

pub async fn restaurant(store: &InMemoryStore, name: &str) -> Restaurant {
    store.find_restaurant_by_name(name).await.unwrap().unwrap()
}

pub async fn order(
    store: &InMemoryStore,
    customer_name: &str,
    restaurant_name: &str,
    at: DateTime<Utc>,
) -> OrderRequest {
    OrderRequest::new(
        customer(store, customer_name).await,
        restaurant(store, restaurant_name).await,
        at,
    )
}

/// Fixed reference instant so window arithmetic in tests is exact.
pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, hour, minute, 0).unwrap()
}
