//! Driver assignment and ranking.
//!
//! Assignment reads the city's drivers and their deliveries, then writes one new delivery.
//! Nothing makes that read-then-write atomic against the store, so two concurrent
//! requests for the same city can both see the same least-busy driver and both assign to
//! it. Set [`ServiceConfig::serialize_per_city`] to hold a per-city lock across the span;
//! requests for different cities still run in parallel.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::availability::WindowPolicy;
use super::distance::{DistanceEstimator, RandomDistance};
use super::lock_manager::CityLockManager;
use super::validation::{validate_order, OrderRequest};
use crate::config::ServiceConfig;
use crate::error::{AssignmentError, Result};
use crate::models::{City, Delivery, Driver, DriverDistance, NewDelivery};
use crate::repository::Store;

pub struct AssignmentService {
    store: Arc<dyn Store>,
    distance: Arc<dyn DistanceEstimator>,
    config: ServiceConfig,
    locks: CityLockManager,
}

impl AssignmentService {
    pub fn new(store: Arc<dyn Store>, config: ServiceConfig) -> Self {
        Self::with_estimator(store, config, Arc::new(RandomDistance::default()))
    }

    pub fn with_estimator(
        store: Arc<dyn Store>,
        config: ServiceConfig,
        distance: Arc<dyn DistanceEstimator>,
    ) -> Self {
        Self {
            store,
            distance,
            config,
            locks: CityLockManager::new(),
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Picks the least busy driver of the order's city who is free at the requested time
    /// and records the delivery.
    ///
    /// Among equally busy drivers the first one in the city's driver list wins.
    pub async fn create_order_and_assign_driver(&self, request: OrderRequest) -> Result<Delivery> {
        let order = validate_order(request).map_err(|e| {
            warn!(error = %e, "Order rejected");
            e
        })?;
        let city = &order.customer.city;

        let _guard = if self.config.serialize_per_city {
            Some(self.locks.lock(city.id).await)
        } else {
            None
        };

        let candidates = self.store.find_drivers_by_city(city.id).await?;
        let candidate_count = candidates.len();
        let available = self.available_drivers(candidates, order.delivery_time).await?;
        let available_count = available.len();

        let Some((driver, busy)) = self.least_busy(available).await? else {
            warn!(
                city_id = city.id,
                candidates = candidate_count,
                delivery_time = %order.delivery_time,
                "No available driver"
            );
            return Err(AssignmentError::NoAvailableDriver);
        };

        let distance = self.distance.estimate(&order.restaurant, &order.customer);
        if !(distance.is_finite() && distance >= 0.0) {
            warn!(driver_id = driver.id, distance, "Distance estimate rejected");
            return Err(AssignmentError::InvalidDistance(distance));
        }
        let delivery = self
            .store
            .save_delivery(NewDelivery {
                driver,
                restaurant: order.restaurant,
                customer: order.customer,
                delivery_time: order.delivery_time,
                distance,
            })
            .await?;

        info!(
            delivery_id = delivery.id,
            driver_id = delivery.driver.id,
            city_id = delivery.driver.city.id,
            available = available_count,
            prior_deliveries = busy,
            distance = delivery.distance,
            "Driver assigned"
        );
        Ok(delivery)
    }

    /// All drivers with at least one delivery, by total distance, highest first.
    pub async fn rank_drivers(&self) -> Result<Vec<DriverDistance>> {
        let ranking = self.store.aggregate_distance_by_driver().await?;
        debug!(drivers = ranking.len(), "Driver ranking computed");
        Ok(ranking)
    }

    pub async fn rank_drivers_by_city(&self, city: &City) -> Result<Vec<DriverDistance>> {
        let ranking = self
            .store
            .aggregate_distance_by_driver_in_city(city.id)
            .await?;
        debug!(city_id = city.id, drivers = ranking.len(), "City driver ranking computed");
        Ok(ranking)
    }

    async fn available_drivers(
        &self,
        candidates: Vec<Driver>,
        delivery_time: DateTime<Utc>,
    ) -> Result<Vec<Driver>> {
        let policy: WindowPolicy = self.config.window_policy;
        let mut available = Vec::with_capacity(candidates.len());
        for driver in candidates {
            let deliveries = self.store.find_driver_deliveries(driver.id).await?;
            let free =
                policy.is_available(delivery_time, &deliveries, self.config.availability_window);
            debug!(
                driver_id = driver.id,
                existing = deliveries.len(),
                free,
                "Availability checked"
            );
            if free {
                available.push(driver);
            }
        }
        Ok(available)
    }

    /// First driver with the fewest deliveries, with its count. `None` when `drivers` is empty.
    async fn least_busy(&self, drivers: Vec<Driver>) -> Result<Option<(Driver, usize)>> {
        let mut best: Option<(Driver, usize)> = None;
        for driver in drivers {
            let count = self.store.count_driver_deliveries(driver.id).await?;
            if best.as_ref().map_or(true, |(_, min)| count < *min) {
                best = Some((driver, count));
            }
        }
        Ok(best)
    }
}
