use thiserror::Error;

use shared_database::StoreError;
use shared_models::error::AppError;

#[derive(Debug, Error)]
pub enum PatientError {
    #[error("Patient not found")]
    NotFound,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<PatientError> for AppError {
    fn from(err: PatientError) -> Self {
        match err {
            PatientError::NotFound => AppError::NotFound(err.to_string()),
            PatientError::Store(e) => AppError::Database(e.to_string()),
        }
    }
}
