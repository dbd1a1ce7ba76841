pub mod city;
pub mod customer;
pub mod delivery;
pub mod driver;
pub mod restaurant;

pub use city::{City, CityId};
pub use customer::{Customer, CustomerId};
pub use delivery::{Delivery, DeliveryId, DriverDistance, NewDelivery};
pub use driver::{Driver, DriverId};
pub use restaurant::{Restaurant, RestaurantId};
