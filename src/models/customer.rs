use serde::{Deserialize, Serialize};

use super::city::City;

pub type CustomerId = i64;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub city: City,
    pub description: String,
}

impl Customer {
    pub fn new(name: &str, city: &City, description: &str) -> Self {
        Self {
            id: 0,
            name: name.to_string(),
            city: city.clone(),
            description: description.to_string(),
        }
    }
}
