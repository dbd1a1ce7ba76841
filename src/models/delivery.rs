use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{customer::Customer, driver::Driver, restaurant::Restaurant};

pub type DeliveryId = i64;

/// A delivery that has been assigned but not yet persisted.
#[derive(Clone, Debug, PartialEq)]
pub struct NewDelivery {
    pub driver: Driver,
    pub restaurant: Restaurant,
    pub customer: Customer,
    pub delivery_time: DateTime<Utc>,
    pub distance: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Delivery {
    pub id: DeliveryId,
    pub driver: Driver,
    pub restaurant: Restaurant,
    pub customer: Customer,
    pub delivery_time: DateTime<Utc>,
    pub distance: f64,
}

impl NewDelivery {
    /// Attach the identity the store assigned on insert.
    pub fn into_persisted(self, id: DeliveryId) -> Delivery {
        Delivery {
            id,
            driver: self.driver,
            restaurant: self.restaurant,
            customer: self.customer,
            delivery_time: self.delivery_time,
            distance: self.distance,
        }
    }
}

/// Ranking row: a driver and the summed distance of all its deliveries.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DriverDistance {
    pub driver: Driver,
    pub total_distance: f64,
}
