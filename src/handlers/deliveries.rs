use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;

use super::AppError;
use crate::error::AssignmentError;
use crate::models::{CustomerId, Delivery, RestaurantId};
use crate::services::validation::OrderRequest;
use crate::services::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateDeliveryRequest {
    pub customer_id: Option<CustomerId>,
    pub restaurant_id: Option<RestaurantId>,
    pub delivery_time: Option<DateTime<Utc>>,
}

pub async fn create_delivery(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CreateDeliveryRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Delivery>), AppError> {
    let Json(request) = body.map_err(|rejection| {
        AppError::from(AssignmentError::InvalidArgument(rejection.body_text()))
    })?;

    // Reject incomplete requests before any lookup.
    let (Some(customer_id), Some(restaurant_id), Some(delivery_time)) =
        (request.customer_id, request.restaurant_id, request.delivery_time)
    else {
        return Err(AssignmentError::missing_argument().into());
    };

    let customer = state
        .store
        .find_customer(customer_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Customer not found: {}", customer_id)))?;
    let restaurant = state
        .store
        .find_restaurant(restaurant_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Restaurant not found: {}", restaurant_id)))?;

    let delivery = state
        .assignment
        .create_order_and_assign_driver(OrderRequest::new(customer, restaurant, delivery_time))
        .await?;

    Ok((StatusCode::CREATED, Json(delivery)))
}
