use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use super::AppError;
use crate::models::{CityId, DriverDistance};
use crate::services::AppState;

pub async fn rank_drivers(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<DriverDistance>>, AppError> {
    Ok(Json(state.assignment.rank_drivers().await?))
}

pub async fn rank_drivers_by_city(
    State(state): State<Arc<AppState>>,
    Path(city_id): Path<CityId>,
) -> Result<Json<Vec<DriverDistance>>, AppError> {
    let city = state
        .store
        .find_city(city_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("City not found: {}", city_id)))?;
    Ok(Json(state.assignment.rank_drivers_by_city(&city).await?))
}
