use thiserror::Error;

pub const MISSING_ARGUMENT: &str = "None of the arguments can be null";
pub const CITY_MISMATCH: &str = "Customer's city and Restaurant's city must be the same";
pub const NO_AVAILABLE_DRIVER: &str = "No available drivers were found";

/// Failures raised by a [`Store`](crate::repository::Store) backend.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

#[derive(Error, Debug)]
pub enum AssignmentError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("{}", CITY_MISMATCH)]
    CityMismatch,

    #[error("{}", NO_AVAILABLE_DRIVER)]
    NoAvailableDriver,

    /// The distance estimator produced a negative or non-finite value.
    #[error("Estimated distance must be finite and non-negative, got {0}")]
    InvalidDistance(f64),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AssignmentError {
    pub fn missing_argument() -> Self {
        Self::InvalidArgument(MISSING_ARGUMENT.to_string())
    }

    /// Only a lack of free drivers can clear up without the caller changing the request.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::NoAvailableDriver)
    }
}

pub type Result<T> = std::result::Result<T, AssignmentError>;
