pub mod audit;
pub mod front_desk;
pub mod identity;
pub mod occupancy;
pub mod registry;
pub mod repository;
pub mod stays;
pub mod validation;
pub mod views;

use inn_shared::StayStatus;
use validation::FieldErrors;

/// Failures raised by a data source implementation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Unique constraint violated on {field}")]
    UniqueViolation { field: &'static str },
    #[error("Accommodation already has a checked-in stay")]
    AccommodationOccupied,
    #[error("Record not found: {0}")]
    NotFound(String),
    #[error("Backend failure: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),
    #[error("Duplicate value for {field}")]
    Duplicate { field: &'static str },
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Invalid stay transition from {from} to {to}")]
    InvalidTransition { from: StayStatus, to: StayStatus },
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation { field } => CoreError::Duplicate { field },
            StoreError::AccommodationOccupied => {
                CoreError::Conflict("accommodation is already occupied".to_string())
            }
            StoreError::NotFound(what) => CoreError::NotFound(what),
            other => CoreError::Store(other),
        }
    }
}

impl From<FieldErrors> for CoreError {
    fn from(errors: FieldErrors) -> Self {
        CoreError::Validation(errors)
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
