use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

use super::{Store, StoreResult};
use crate::error::StoreError;
use crate::models::{
    City, CityId, Customer, CustomerId, Delivery, Driver, DriverDistance, DriverId,
    NewDelivery, Restaurant, RestaurantId,
};

/// Store backed by process memory.
///
/// Tables are plain vectors kept in insertion order, so ids are ascending within each
/// table and `find_drivers_by_city` needs no sort.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

#[derive(Default)]
struct Tables {
    next_id: i64,
    cities: Vec<City>,
    customers: Vec<Customer>,
    restaurants: Vec<Restaurant>,
    drivers: Vec<Driver>,
    deliveries: Vec<Delivery>,
}

impl Tables {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn require_city(&self, city: &City) -> StoreResult<()> {
        if self.cities.iter().any(|c| c.id == city.id) {
            Ok(())
        } else {
            Err(StoreError::NotFound { entity: "City", id: city.id })
        }
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delivery_count(&self) -> usize {
        self.tables.read().deliveries.len()
    }
}

fn rank(
    deliveries: &[Delivery],
    drivers: &[Driver],
    city_id: Option<CityId>,
) -> Vec<DriverDistance> {
    let mut totals: HashMap<DriverId, f64> = HashMap::new();
    for delivery in deliveries {
        if city_id.map_or(true, |id| delivery.driver.city.id == id) {
            *totals.entry(delivery.driver.id).or_insert(0.0) += delivery.distance;
        }
    }

    let mut ranking: Vec<DriverDistance> = drivers
        .iter()
        .filter_map(|driver| {
            totals.get(&driver.id).map(|total| DriverDistance {
                driver: driver.clone(),
                total_distance: *total,
            })
        })
        .collect();

    ranking.sort_by(|a, b| {
        b.total_distance
            .total_cmp(&a.total_distance)
            .then_with(|| a.driver.id.cmp(&b.driver.id))
    });
    ranking
}

#[async_trait]
impl Store for InMemoryStore {
    async fn save_city(&self, mut city: City) -> StoreResult<City> {
        let mut tables = self.tables.write();
        if tables.cities.iter().any(|c| c.name == city.name) {
            return Err(StoreError::Constraint(format!(
                "city name already exists: {}",
                city.name
            )));
        }
        city.id = tables.allocate_id();
        tables.cities.push(city.clone());
        Ok(city)
    }

    async fn save_customer(&self, mut customer: Customer) -> StoreResult<Customer> {
        let mut tables = self.tables.write();
        tables.require_city(&customer.city)?;
        customer.id = tables.allocate_id();
        tables.customers.push(customer.clone());
        Ok(customer)
    }

    async fn save_restaurant(&self, mut restaurant: Restaurant) -> StoreResult<Restaurant> {
        let mut tables = self.tables.write();
        tables.require_city(&restaurant.city)?;
        restaurant.id = tables.allocate_id();
        tables.restaurants.push(restaurant.clone());
        Ok(restaurant)
    }

    async fn save_driver(&self, mut driver: Driver) -> StoreResult<Driver> {
        let mut tables = self.tables.write();
        tables.require_city(&driver.city)?;
        driver.id = tables.allocate_id();
        tables.drivers.push(driver.clone());
        Ok(driver)
    }

    async fn list_cities(&self) -> StoreResult<Vec<City>> {
        Ok(self.tables.read().cities.clone())
    }

    async fn find_city(&self, id: CityId) -> StoreResult<Option<City>> {
        Ok(self.tables.read().cities.iter().find(|c| c.id == id).cloned())
    }

    async fn find_city_by_name(&self, name: &str) -> StoreResult<Option<City>> {
        Ok(self.tables.read().cities.iter().find(|c| c.name == name).cloned())
    }

    async fn find_customer(&self, id: CustomerId) -> StoreResult<Option<Customer>> {
        Ok(self.tables.read().customers.iter().find(|c| c.id == id).cloned())
    }

    async fn find_customer_by_name(&self, name: &str) -> StoreResult<Option<Customer>> {
        Ok(self.tables.read().customers.iter().find(|c| c.name == name).cloned())
    }

    async fn find_restaurant(&self, id: RestaurantId) -> StoreResult<Option<Restaurant>> {
        Ok(self.tables.read().restaurants.iter().find(|r| r.id == id).cloned())
    }

    async fn find_restaurant_by_name(&self, name: &str) -> StoreResult<Option<Restaurant>> {
        Ok(self.tables.read().restaurants.iter().find(|r| r.name == name).cloned())
    }

    async fn find_driver_by_name(&self, name: &str) -> StoreResult<Option<Driver>> {
        Ok(self.tables.read().drivers.iter().find(|d| d.name == name).cloned())
    }

    async fn find_drivers_by_city(&self, city_id: CityId) -> StoreResult<Vec<Driver>> {
        Ok(self
            .tables
            .read()
            .drivers
            .iter()
            .filter(|d| d.city.id == city_id)
            .cloned()
            .collect())
    }

    async fn find_driver_deliveries(&self, driver_id: DriverId) -> StoreResult<Vec<Delivery>> {
        Ok(self
            .tables
            .read()
            .deliveries
            .iter()
            .filter(|d| d.driver.id == driver_id)
            .cloned()
            .collect())
    }

    async fn count_driver_deliveries(&self, driver_id: DriverId) -> StoreResult<usize> {
        Ok(self
            .tables
            .read()
            .deliveries
            .iter()
            .filter(|d| d.driver.id == driver_id)
            .count())
    }

    async fn save_delivery(&self, delivery: NewDelivery) -> StoreResult<Delivery> {
        if !(delivery.distance.is_finite() && delivery.distance >= 0.0) {
            return Err(StoreError::Constraint(format!(
                "distance must be finite and non-negative: {}",
                delivery.distance
            )));
        }
        let mut tables = self.tables.write();
        if !tables.drivers.iter().any(|d| d.id == delivery.driver.id) {
            return Err(StoreError::NotFound { entity: "Driver", id: delivery.driver.id });
        }
        if !tables.customers.iter().any(|c| c.id == delivery.customer.id) {
            return Err(StoreError::NotFound { entity: "Customer", id: delivery.customer.id });
        }
        if !tables.restaurants.iter().any(|r| r.id == delivery.restaurant.id) {
            return Err(StoreError::NotFound {
                entity: "Restaurant",
                id: delivery.restaurant.id,
            });
        }
        let id = tables.allocate_id();
        let saved = delivery.into_persisted(id);
        tables.deliveries.push(saved.clone());
        Ok(saved)
    }

    async fn aggregate_distance_by_driver(&self) -> StoreResult<Vec<DriverDistance>> {
        let tables = self.tables.read();
        Ok(rank(&tables.deliveries, &tables.drivers, None))
    }

    async fn aggregate_distance_by_driver_in_city(
        &self,
        city_id: CityId,
    ) -> StoreResult<Vec<DriverDistance>> {
        let tables = self.tables.read();
        Ok(rank(&tables.deliveries, &tables.drivers, Some(city_id)))
    }
}
