use serde::{Deserialize, Serialize};

pub type CityId = i64;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct City {
    pub id: CityId,
    pub name: String,
}

impl City {
    /// Unsaved city. The store assigns the id.
    pub fn new(name: &str) -> Self {
        Self {
            id: 0,
            name: name.to_string(),
        }
    }
}
