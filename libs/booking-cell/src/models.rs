use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use shared_database::StoreError;
use shared_models::appointment::{Appointment, AppointmentKind};
use shared_models::error::{AppError, FieldError};
use shared_models::hospital::{GeoPoint, Hospital, NonSurgeryService, Surgery};
use shared_utils::de::lenient_option;
use shared_utils::validation::{non_empty, FieldErrors};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurgerySearchQuery {
    pub surgery_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub lng: Option<f64>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub max_distance: Option<f64>,
}

impl SurgerySearchQuery {
    /// Caller coordinates, only when both halves are present.
    pub fn origin(&self) -> Option<GeoPoint> {
        Some(GeoPoint {
            lat: self.lat?,
            lng: self.lng?,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthIssueSearchQuery {
    pub health_issue: Option<String>,
}

/// Hospital fields shown in search results.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HospitalCard {
    pub id: Uuid,
    pub name: String,
    pub location: Option<GeoPoint>,
    pub state: String,
    pub district: String,
    pub landmark: Option<String>,
    pub establish_year: i32,
    pub opd_charge: Vec<f64>,
}

impl From<&Hospital> for HospitalCard {
    fn from(h: &Hospital) -> Self {
        Self {
            id: h.id,
            name: h.name.clone(),
            location: h.location,
            state: h.state.clone(),
            district: h.district.clone(),
            landmark: h.landmark.clone(),
            establish_year: h.establish_year,
            opd_charge: h.opd_charge.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SurgerySearchResult {
    #[serde(flatten)]
    pub hospital: HospitalCard,
    /// Only the entries that matched the query.
    pub surgeries: Vec<Surgery>,
    /// Kilometres from the caller; `null` without coordinates on either side.
    pub distance: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSearchResult {
    #[serde(flatten)]
    pub hospital: HospitalCard,
    pub non_surgery_services: Vec<NonSurgeryService>,
}

/// Body of `POST /users/book-appointment`. Numeric fields also arrive as
/// form strings, blank meaning absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub age: Option<u32>,
    pub appointment_type: Option<String>,
    pub surgery_type: Option<String>,
    pub health_issue: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub weight: Option<f64>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub height: Option<f64>,
    pub address: Option<String>,
    pub mobile_no: Option<String>,
    pub email_address: Option<String>,
    pub hospital_id: Option<String>,
}

impl BookingRequest {
    /// Checks required fields and resolves the appointment kind.
    pub fn validate(&self) -> Result<AppointmentKind, Vec<FieldError>> {
        let mut errors = FieldErrors::new();
        errors.require_text("name", self.name.as_deref(), "Name is required");
        if self.age.unwrap_or(0) == 0 {
            errors.push("age", "Age is required");
        }
        errors.require_text("address", self.address.as_deref(), "Address is required");
        errors.require_text("mobileNo", self.mobile_no.as_deref(), "Mobile number is required");
        errors.require_text("hospitalId", self.hospital_id.as_deref(), "Hospital is required");

        let kind = match non_empty(self.appointment_type.as_deref()) {
            Some("surgery") => match non_empty(self.surgery_type.as_deref()) {
                Some(surgery_type) => Some(AppointmentKind::Surgery {
                    surgery_type: surgery_type.to_string(),
                }),
                None => {
                    errors.push("surgeryType", "Surgery type is required for surgery appointment");
                    None
                }
            },
            Some("non-surgery") => match non_empty(self.health_issue.as_deref()) {
                Some(health_issue) => Some(AppointmentKind::NonSurgery {
                    health_issue: health_issue.to_string(),
                }),
                None => {
                    errors.push(
                        "healthIssue",
                        "Health issue is required for non-surgery appointment",
                    );
                    None
                }
            },
            Some(_) => {
                errors.push("appointmentType", "Appointment type must be surgery or non-surgery");
                None
            }
            None => {
                errors.push("appointmentType", "Appointment type is required");
                None
            }
        };

        errors.into_result()?;
        kind.ok_or_else(|| vec![FieldError::new("appointmentType", "Appointment type is required")])
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingResponse {
    pub message: String,
    pub patient: Appointment,
}

#[derive(Debug, Error)]
pub enum BookingError {
    #[error("{0}")]
    MissingQuery(&'static str),

    #[error("User access required")]
    NotUser,

    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("Invalid date")]
    InvalidDate,

    #[error("Hospital not found")]
    HospitalNotFound,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::MissingQuery(msg) => AppError::BadRequest(msg.to_string()),
            BookingError::NotUser => AppError::Forbidden(err.to_string()),
            BookingError::Validation(errors) => AppError::InvalidFields(errors),
            BookingError::InvalidDate => AppError::InvalidValue(err.to_string()),
            BookingError::HospitalNotFound => AppError::NotFound(err.to_string()),
            BookingError::Store(e) => AppError::Database(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn surgery_booking() -> BookingRequest {
        BookingRequest {
            name: Some("Ravi".into()),
            age: Some(54),
            appointment_type: Some("surgery".into()),
            surgery_type: Some("Knee Replacement".into()),
            address: Some("MG Road".into()),
            mobile_no: Some("9876543210".into()),
            hospital_id: Some(Uuid::new_v4().to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn surgery_booking_resolves_kind() {
        assert_matches!(
            surgery_booking().validate(),
            Ok(AppointmentKind::Surgery { surgery_type }) if surgery_type == "Knee Replacement"
        );
    }

    #[test]
    fn kind_needs_its_own_detail_field() {
        let request = BookingRequest {
            appointment_type: Some("non-surgery".into()),
            ..surgery_booking()
        };
        assert_matches!(request.validate(), Err(errors) => {
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].field, "healthIssue");
        });
    }

    #[test]
    fn unknown_kind_and_missing_fields_reported_together() {
        let request = BookingRequest {
            appointment_type: Some("dental".into()),
            age: Some(0),
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
            vec!["name", "age", "address", "mobileNo", "hospitalId", "appointmentType"]
        );
    }

    #[test]
    fn origin_needs_both_coordinates() {
        let query = SurgerySearchQuery {
            lat: Some(9.9),
            ..Default::default()
        };
        assert!(query.origin().is_none());
    }
}
