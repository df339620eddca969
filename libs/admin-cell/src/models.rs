use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use auth_cell::models::{validate_establish_year, AuthError};
use hospital_cell::models::{CatalogError, SurgeryRequest};
use shared_database::StoreError;
use shared_models::appointment::{AppointmentFilter, ApprovalStatus};
use shared_models::error::{AppError, FieldError};
use shared_models::hospital::{GeoPoint, Hospital, PublicHospital, Surgery};
use shared_utils::de::lenient_option;
use shared_utils::validation::{non_empty, normalize_email, parse_date, DayBound, FieldErrors};

/// One surgery in an admin catalog replacement. An `id` keeps the entry's
/// identity; entries without one get a fresh id.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SurgeryEntry {
    pub id: Option<Uuid>,
    #[serde(flatten)]
    pub details: SurgeryRequest,
}

/// Partial profile update. `surgeries`, when present, replaces the whole
/// surgery list; the password is not editable here.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HospitalUpdateRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub district: Option<String>,
    pub landmark: Option<String>,
    pub establish_year: Option<i64>,
    pub opd_charge: Option<Vec<f64>>,
    pub location: Option<GeoPoint>,
    pub surgeries: Option<Vec<SurgeryEntry>>,
}

impl HospitalUpdateRequest {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = FieldErrors::new();
        if non_empty(self.email.as_deref()).is_some() {
            errors.require_email("email", self.email.as_deref());
        }
        if self.establish_year.is_some() {
            validate_establish_year(self.establish_year, &mut errors);
        }
        if let Err(entry_errors) = self.surgery_list() {
            errors.extend(entry_errors);
        }
        errors.into_result()
    }

    /// The replacement surgery list, each entry held to the add-surgery rules.
    /// Field names are prefixed with the entry index, e.g. `surgeries[1].price`.
    pub fn surgery_list(&self) -> Result<Option<Vec<Surgery>>, Vec<FieldError>> {
        let Some(entries) = &self.surgeries else {
            return Ok(None);
        };
        let mut list = Vec::with_capacity(entries.len());
        let mut errors = Vec::new();
        for (index, entry) in entries.iter().enumerate() {
            match entry.details.clone().into_entry() {
                Ok(mut surgery) => {
                    if let Some(id) = entry.id {
                        surgery.id = id;
                    }
                    list.push(surgery);
                }
                Err(CatalogError::MissingFields(missing)) => {
                    errors.extend(missing.into_iter().map(|e| {
                        FieldError::new(format!("surgeries[{}].{}", index, e.field), e.message)
                    }));
                }
                Err(other) => {
                    errors.push(FieldError::new(format!("surgeries[{}]", index), other.to_string()))
                }
            }
        }
        if errors.is_empty() {
            Ok(Some(list))
        } else {
            Err(errors)
        }
    }

    /// Normalised new email, when one was supplied.
    pub fn email(&self) -> Option<String> {
        non_empty(self.email.as_deref()).map(normalize_email)
    }

    /// Copies every supplied field onto `hospital`; blanks count as omitted.
    pub fn apply(&self, hospital: &mut Hospital) {
        let set = |target: &mut String, value: &Option<String>| {
            if let Some(v) = non_empty(value.as_deref()) {
                *target = v.to_string();
            }
        };
        set(&mut hospital.name, &self.name);
        set(&mut hospital.country, &self.country);
        set(&mut hospital.state, &self.state);
        set(&mut hospital.district, &self.district);
        if let Some(email) = self.email() {
            hospital.email = email;
        }
        if let Some(landmark) = non_empty(self.landmark.as_deref()) {
            hospital.landmark = Some(landmark.to_string());
        }
        if let Some(year) = self.establish_year {
            hospital.establish_year = year as i32;
        }
        if let Some(charges) = &self.opd_charge {
            hospital.opd_charge = charges.clone();
        }
        if let Some(location) = self.location {
            hospital.location = Some(location);
        }
        if let Ok(Some(surgeries)) = self.surgery_list() {
            hospital.surgeries = surgeries;
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HospitalStats {
    pub total_patients: u64,
    pub surgeries_done: u64,
    pub approved: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct HospitalDetail {
    #[serde(flatten)]
    pub hospital: PublicHospital,
    pub stats: HospitalStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct HospitalMessage {
    pub message: String,
    pub hospital: PublicHospital,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

fn parse_flag(field: &str, value: Option<&str>) -> Result<Option<bool>, AdminError> {
    match non_empty(value) {
        None => Ok(None),
        Some("true") => Ok(Some(true)),
        Some("false") => Ok(Some(false)),
        Some(_) => Err(AdminError::InvalidValue(format!("{} must be true or false", field))),
    }
}

fn parse_approval(value: Option<&str>) -> Result<Option<ApprovalStatus>, AdminError> {
    non_empty(value)
        .map(|v| {
            v.parse::<ApprovalStatus>()
                .map_err(|_| AdminError::InvalidValue("Invalid approval status".to_string()))
        })
        .transpose()
}

fn parse_bound(
    field: &str,
    value: Option<&str>,
    bound: DayBound,
) -> Result<Option<DateTime<Utc>>, AdminError> {
    non_empty(value)
        .map(|v| parse_date(v, bound).ok_or_else(|| AdminError::InvalidValue(format!("Invalid {}", field))))
        .transpose()
}

/// `GET /admin/patients` query string.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientQuery {
    #[serde(default, deserialize_with = "lenient_option")]
    pub hospital_id: Option<Uuid>,
    pub surgery_done: Option<String>,
    pub approved_for_surgery: Option<String>,
    pub search: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl PatientQuery {
    /// A bare `endDate` day includes the whole day.
    pub fn to_filter(&self) -> Result<AppointmentFilter, AdminError> {
        Ok(AppointmentFilter {
            hospital_id: self.hospital_id,
            booked_by: None,
            surgery_done: parse_flag("surgeryDone", self.surgery_done.as_deref())?,
            approval: parse_approval(self.approved_for_surgery.as_deref())?,
            date_from: parse_bound("startDate", self.start_date.as_deref(), DayBound::Start)?,
            date_to: parse_bound("endDate", self.end_date.as_deref(), DayBound::End)?,
            search: non_empty(self.search.as_deref()).map(String::from),
        })
    }
}

/// `GET /admin/users` query string.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    #[serde(default, deserialize_with = "lenient_option")]
    pub hospital_id: Option<Uuid>,
    pub surgery_done: Option<String>,
    pub approved_for_surgery: Option<String>,
}

impl UserQuery {
    /// `None` when no appointment predicate was given.
    pub fn to_filter(&self) -> Result<Option<AppointmentFilter>, AdminError> {
        let filter = AppointmentFilter {
            hospital_id: self.hospital_id,
            surgery_done: parse_flag("surgeryDone", self.surgery_done.as_deref())?,
            approval: parse_approval(self.approved_for_surgery.as_deref())?,
            ..Default::default()
        };
        Ok((filter != AppointmentFilter::default()).then_some(filter))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_hospitals: u64,
    pub total_users: u64,
    pub total_patients: u64,
    pub surgeries_done: u64,
    pub pending_surgeries: u64,
    pub approved_patients: u64,
    pub rejected_patients: u64,
    pub pending_approvals: u64,
}

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("Hospital not found")]
    HospitalNotFound,

    #[error("Patient not found")]
    PatientNotFound,

    #[error("Hospital already exists")]
    DuplicateEmail,

    #[error("{0}")]
    InvalidValue(String),

    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<AdminError> for AppError {
    fn from(err: AdminError) -> Self {
        match err {
            AdminError::HospitalNotFound | AdminError::PatientNotFound => {
                AppError::NotFound(err.to_string())
            }
            AdminError::DuplicateEmail => AppError::Conflict(err.to_string()),
            AdminError::InvalidValue(msg) => AppError::InvalidValue(msg),
            AdminError::Validation(errors) => AppError::InvalidFields(errors),
            AdminError::Auth(e) => e.into(),
            AdminError::Store(e) => AppError::Database(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn patient_query_builds_filter() {
        let query = PatientQuery {
            surgery_done: Some("false".into()),
            approved_for_surgery: Some("rejected".into()),
            start_date: Some("2024-01-01".into()),
            end_date: Some("2024-01-31".into()),
            search: Some("  ".into()),
            ..Default::default()
        };
        let filter = query.to_filter().unwrap();
        assert_eq!(filter.surgery_done, Some(false));
        assert_eq!(filter.approval, Some(ApprovalStatus::Rejected));
        assert_eq!(filter.date_to.unwrap().to_rfc3339(), "2024-01-31T23:59:59.999+00:00");
        assert!(filter.search.is_none());
    }

    #[test]
    fn bad_query_values_are_rejected() {
        let query = PatientQuery {
            approved_for_surgery: Some("maybe".into()),
            ..Default::default()
        };
        assert_matches!(query.to_filter(), Err(AdminError::InvalidValue(_)));

        let query = PatientQuery {
            start_date: Some("yesterday".into()),
            ..Default::default()
        };
        assert_matches!(query.to_filter(), Err(AdminError::InvalidValue(msg)) if msg == "Invalid startDate");
    }

    #[test]
    fn empty_user_query_means_all_users() {
        assert!(UserQuery::default().to_filter().unwrap().is_none());
        let narrowed = UserQuery {
            surgery_done: Some("true".into()),
            ..Default::default()
        };
        assert!(narrowed.to_filter().unwrap().is_some());
    }

    #[test]
    fn update_ignores_blank_fields() {
        let request = HospitalUpdateRequest {
            name: Some("  ".into()),
            email: Some(" NEW@X.COM ".into()),
            opd_charge: Some(vec![200.0, 400.0]),
            ..Default::default()
        };
        assert!(request.validate().is_ok());
        assert_eq!(request.email().as_deref(), Some("new@x.com"));

        let bad_year = HospitalUpdateRequest {
            establish_year: Some(1700),
            ..Default::default()
        };
        assert!(bad_year.validate().is_err());
    }
}
