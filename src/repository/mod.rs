//! Storage seam for the assignment service.
//!
//! The service only depends on [`Store`]. Two backends ship with the crate:
//! [`memory::InMemoryStore`] and [`postgres::PgStore`].

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::models::{
    City, CityId, Customer, CustomerId, Delivery, Driver, DriverDistance, DriverId,
    NewDelivery, Restaurant, RestaurantId,
};

pub use memory::InMemoryStore;
pub use postgres::PgStore;

pub type StoreResult<T> = Result<T, StoreError>;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Store: Send + Sync {
    // Reference data

    async fn save_city(&self, city: City) -> StoreResult<City>;

    async fn save_customer(&self, customer: Customer) -> StoreResult<Customer>;

    async fn save_restaurant(&self, restaurant: Restaurant) -> StoreResult<Restaurant>;

    async fn save_driver(&self, driver: Driver) -> StoreResult<Driver>;

    async fn list_cities(&self) -> StoreResult<Vec<City>>;

    async fn find_city(&self, id: CityId) -> StoreResult<Option<City>>;

    async fn find_city_by_name(&self, name: &str) -> StoreResult<Option<City>>;

    async fn find_customer(&self, id: CustomerId) -> StoreResult<Option<Customer>>;

    async fn find_customer_by_name(&self, name: &str) -> StoreResult<Option<Customer>>;

    async fn find_restaurant(&self, id: RestaurantId) -> StoreResult<Option<Restaurant>>;

    async fn find_restaurant_by_name(&self, name: &str) -> StoreResult<Option<Restaurant>>;

    async fn find_driver_by_name(&self, name: &str) -> StoreResult<Option<Driver>>;

    // Assignment

    /// Drivers of a city, in ascending id order.
    async fn find_drivers_by_city(&self, city_id: CityId) -> StoreResult<Vec<Driver>>;

    async fn find_driver_deliveries(&self, driver_id: DriverId) -> StoreResult<Vec<Delivery>>;

    async fn count_driver_deliveries(&self, driver_id: DriverId) -> StoreResult<usize>;

    async fn save_delivery(&self, delivery: NewDelivery) -> StoreResult<Delivery>;

    // Ranking

    /// Summed distance per driver, highest first. Drivers without deliveries are absent.
    async fn aggregate_distance_by_driver(&self) -> StoreResult<Vec<DriverDistance>>;

    async fn aggregate_distance_by_driver_in_city(
        &self,
        city_id: CityId,
    ) -> StoreResult<Vec<DriverDistance>>;
}
