//! Order request validation. Runs before the store is touched.

use chrono::{DateTime, Utc};

use crate::error::{AssignmentError, Result};
use crate::models::{Customer, Restaurant};

/// Inputs to an assignment. Fields are optional because callers on the wire may omit them.
#[derive(Debug, Clone, Default)]
pub struct OrderRequest {
    pub customer: Option<Customer>,
    pub restaurant: Option<Restaurant>,
    pub delivery_time: Option<DateTime<Utc>>,
}

impl OrderRequest {
    pub fn new(customer: Customer, restaurant: Restaurant, delivery_time: DateTime<Utc>) -> Self {
        Self {
            customer: Some(customer),
            restaurant: Some(restaurant),
            delivery_time: Some(delivery_time),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ValidatedOrder {
    pub customer: Customer,
    pub restaurant: Restaurant,
    pub delivery_time: DateTime<Utc>,
}

pub fn validate_order(request: OrderRequest) -> Result<ValidatedOrder> {
    let (Some(customer), Some(restaurant), Some(delivery_time)) =
        (request.customer, request.restaurant, request.delivery_time)
    else {
        return Err(AssignmentError::missing_argument());
    };

    if customer.name.trim().is_empty() {
        return Err(AssignmentError::InvalidArgument(
            "Customer name must not be empty".to_string(),
        ));
    }
    if restaurant.name.trim().is_empty() {
        return Err(AssignmentError::InvalidArgument(
            "Restaurant name must not be empty".to_string(),
        ));
    }

    if customer.city.id != restaurant.city.id {
        return Err(AssignmentError::CityMismatch);
    }

    Ok(ValidatedOrder {
        customer,
        restaurant,
        delivery_time,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::City;

    fn city(id: i64, name: &str) -> City {
        City { id, name: name.to_string() }
    }

    fn request(customer_city: &City, restaurant_city: &City) -> OrderRequest {
        OrderRequest::new(
            Customer::new("Mozart", customer_city, "Wolfgang Amadeus Mozart"),
            Restaurant::new("meat", restaurant_city, "All meat restaurant"),
            Utc::now(),
        )
    }

    #[test]
    fn test_each_missing_field_is_invalid() {
        let jerusalem = city(1, "Jerusalem");
        let full = request(&jerusalem, &jerusalem);

        let cases = [
            OrderRequest { customer: None, ..full.clone() },
            OrderRequest { restaurant: None, ..full.clone() },
            OrderRequest { delivery_time: None, ..full.clone() },
            OrderRequest::default(),
        ];
        for case in cases {
            let err = validate_order(case).unwrap_err();
            assert!(matches!(err, AssignmentError::InvalidArgument(_)));
            assert_eq!(err.to_string(), "None of the arguments can be null");
        }
    }

    #[test]
    fn test_blank_names_are_invalid() {
        let jerusalem = city(1, "Jerusalem");
        let mut blank_customer = request(&jerusalem, &jerusalem);
        if let Some(customer) = blank_customer.customer.as_mut() {
            customer.name = "   ".to_string();
        }
        assert!(matches!(
            validate_order(blank_customer),
            Err(AssignmentError::InvalidArgument(_))
        ));

        let mut blank_restaurant = request(&jerusalem, &jerusalem);
        if let Some(restaurant) = blank_restaurant.restaurant.as_mut() {
            restaurant.name = String::new();
        }
        assert!(matches!(
            validate_order(blank_restaurant),
            Err(AssignmentError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_city_mismatch() {
        let result = validate_order(request(&city(1, "Jerusalem"), &city(2, "Tel-Aviv")));
        assert!(matches!(result, Err(AssignmentError::CityMismatch)));
    }

    #[test]
    fn test_cities_compare_by_identity() {
        // Same id, different spelling of the name: still the same city.
        let same_city = request(&city(1, "Jerusalem"), &city(1, "jerusalem"));
        let order = validate_order(same_city).unwrap();
        assert_eq!(order.customer.name, "Mozart");
        assert_eq!(order.restaurant.name, "meat");
    }
}
