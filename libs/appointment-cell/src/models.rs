use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_database::StoreError;
use shared_models::appointment::{AppointmentView, InvalidApprovalStatus};
use shared_models::error::AppError;

/// `GET /patients?status=done|pending&search=`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatientListQuery {
    pub status: Option<String>,
    pub search: Option<String>,
}

impl PatientListQuery {
    /// `done` and `pending` narrow on completion; anything else lists all.
    pub fn surgery_done(&self) -> Option<bool> {
        match self.status.as_deref() {
            Some("done") => Some(true),
            Some("pending") => Some(false),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SurgeryStatusQuery {
    pub done: Option<String>,
}

impl SurgeryStatusQuery {
    pub fn done(&self) -> Result<bool, LifecycleError> {
        match self.done.as_deref() {
            Some("true") => Ok(true),
            Some("false") => Ok(false),
            _ => Err(LifecycleError::InvalidValue(
                "done must be true or false".to_string(),
            )),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentsRequest {
    #[serde(default)]
    pub comments: String,
}

/// The status stays a string until the service parses it, so an unknown
/// value is reported as an invalid value rather than a body rejection.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalRequest {
    pub approved_for_surgery: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionRequest {
    pub surgery_done: Option<bool>,
    pub surgery_done_by: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PatientResponse {
    pub message: String,
    pub patient: AppointmentView,
}

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Hospital access required")]
    NotHospital,

    #[error("Patient not found")]
    NotFound,

    #[error("Invalid approval status")]
    InvalidApproval(#[from] InvalidApprovalStatus),

    #[error("{0}")]
    InvalidValue(String),

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<LifecycleError> for AppError {
    fn from(err: LifecycleError) -> Self {
        match err {
            LifecycleError::NotHospital => AppError::Forbidden(err.to_string()),
            LifecycleError::NotFound => AppError::NotFound(err.to_string()),
            LifecycleError::InvalidApproval(_) | LifecycleError::InvalidValue(_) => {
                AppError::InvalidValue(err.to_string())
            }
            LifecycleError::Validation(msg) => AppError::ValidationError(msg),
            LifecycleError::Store(e) => AppError::Database(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn status_query_maps_to_completion_flag() {
        let query = |s: &str| PatientListQuery {
            status: Some(s.to_string()),
            search: None,
        };
        assert_eq!(query("done").surgery_done(), Some(true));
        assert_eq!(query("pending").surgery_done(), Some(false));
        assert_eq!(query("all").surgery_done(), None);
        assert_eq!(PatientListQuery::default().surgery_done(), None);
    }

    #[test]
    fn done_flag_must_be_boolean() {
        let query = SurgeryStatusQuery {
            done: Some("yes".into()),
        };
        assert_matches!(query.done(), Err(LifecycleError::InvalidValue(_)));
        assert_matches!(SurgeryStatusQuery::default().done(), Err(LifecycleError::InvalidValue(_)));
    }
}
