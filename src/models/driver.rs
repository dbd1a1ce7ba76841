use serde::{Deserialize, Serialize};

use super::city::City;

pub type DriverId = i64;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    pub id: DriverId,
    pub name: String,
    pub city: City,
}

impl Driver {
    pub fn new(name: &str, city: &City) -> Self {
        Self {
            id: 0,
            name: name.to_string(),
            city: city.clone(),
        }
    }
}
