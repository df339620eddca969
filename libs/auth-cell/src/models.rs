use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_database::StoreError;
use shared_models::error::{AppError, FieldError};
use shared_models::hospital::{GeoPoint, HospitalSummary};
use shared_models::user::UserProfile;
use shared_utils::jwt::TokenError;
use shared_utils::validation::FieldErrors;

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MIN_ESTABLISH_YEAR: i64 = 1800;

/// User and admin signup. A `role` field in the payload is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignupRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl SignupRequest {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = FieldErrors::new();
        errors.require_text("name", self.name.as_deref(), "Name is required");
        errors.require_email("email", self.email.as_deref());
        errors.require_min_len(
            "password",
            self.password.as_deref(),
            MIN_PASSWORD_LEN,
            "Password must be at least 6 characters",
        );
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = FieldErrors::new();
        errors.require_email("email", self.email.as_deref());
        if self.password.as_deref().map_or(true, str::is_empty) {
            errors.push("password", "Password is required");
        }
        errors.into_result()
    }
}

/// Hospital signup, also used by the admin "create hospital" route.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HospitalSignupRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub district: Option<String>,
    pub landmark: Option<String>,
    pub establish_year: Option<i64>,
    pub opd_charge: Option<Vec<f64>>,
    pub location: Option<GeoPoint>,
}

pub fn validate_establish_year(year: Option<i64>, errors: &mut FieldErrors) {
    let current = i64::from(Utc::now().year());
    if !year.is_some_and(|y| (MIN_ESTABLISH_YEAR..=current).contains(&y)) {
        errors.push("establishYear", "Valid establish year is required");
    }
}

impl HospitalSignupRequest {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = FieldErrors::new();
        errors.require_text("name", self.name.as_deref(), "Hospital name is required");
        errors.require_email("email", self.email.as_deref());
        errors.require_min_len(
            "password",
            self.password.as_deref(),
            MIN_PASSWORD_LEN,
            "Password must be at least 6 characters",
        );
        errors.require_text("state", self.state.as_deref(), "State/UT is required");
        errors.require_text("district", self.district.as_deref(), "District is required");
        validate_establish_year(self.establish_year, &mut errors);
        errors.into_result()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAuthResponse {
    pub token: String,
    pub user: UserProfile,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HospitalAuthResponse {
    pub token: String,
    pub hospital: HospitalSummary,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    DuplicateEmail(String),

    #[error("{0}")]
    InvalidCredentials(String),

    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::DuplicateEmail(msg) => AppError::Conflict(msg),
            AuthError::InvalidCredentials(msg) => AppError::BadRequest(msg),
            AuthError::Validation(errors) => AppError::InvalidFields(errors),
            AuthError::Token(e) => AppError::Internal(e.to_string()),
            AuthError::Hashing(msg) => AppError::Internal(msg),
            AuthError::Store(e) => AppError::Database(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hospital_signup_reports_all_missing_fields() {
        let request = HospitalSignupRequest {
            email: Some("bad".into()),
            establish_year: Some(1700),
            ..Default::default()
        };
        let fields: Vec<String> = request
            .validate()
            .unwrap_err()
            .into_iter()
            .map(|e| e.field)
            .collect();
        assert_eq!(
            fields,
            vec!["name", "email", "password", "state", "district", "establishYear"]
        );
    }

    #[test]
    fn future_establish_year_is_rejected() {
        let mut errors = FieldErrors::new();
        validate_establish_year(Some(i64::from(Utc::now().year()) + 1), &mut errors);
        assert!(!errors.is_empty());

        let mut errors = FieldErrors::new();
        validate_establish_year(Some(1990), &mut errors);
        assert!(errors.is_empty());
    }

    #[test]
    fn login_requires_password() {
        let request = LoginRequest {
            email: Some("a@x.com".into()),
            password: Some(String::new()),
        };
        assert_eq!(request.validate().unwrap_err()[0].field, "password");
    }
}
