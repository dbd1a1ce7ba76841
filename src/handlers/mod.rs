pub mod deliveries;
pub mod health;
pub mod rankings;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::error::{AssignmentError, StoreError};
use crate::services::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/deliveries", post(deliveries::create_delivery))
        .route("/api/rankings", get(rankings::rank_drivers))
        .route("/api/rankings/:city_id", get(rankings::rank_drivers_by_city))
        .route("/health", get(health::health_check))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

#[derive(Debug)]
pub enum AppError {
    Assignment(AssignmentError),
    NotFound(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Assignment(err) => match err {
                AssignmentError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
                AssignmentError::CityMismatch => StatusCode::UNPROCESSABLE_ENTITY,
                AssignmentError::NoAvailableDriver => StatusCode::CONFLICT,
                AssignmentError::InvalidDistance(_) | AssignmentError::Store(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Assignment(err) => err.to_string(),
            AppError::NotFound(msg) => msg.clone(),
        };
        if status.is_server_error() {
            tracing::error!(error = %message, "Request failed");
        }
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<AssignmentError> for AppError {
    fn from(err: AssignmentError) -> Self {
        AppError::Assignment(err)
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Assignment(err.into())
    }
}
